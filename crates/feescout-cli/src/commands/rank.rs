use feescout_core::{
    lowest_n_deposits_and_withdraws, Direction, ExchangeCatalog, PriceCache, RankedView, Rankings,
};
use serde::Serialize;

use crate::cli::RankArgs;
use crate::error::CliError;
use crate::output::Table;

use super::{directions, parse_amount, parse_direction_filter, ranked_table, CommandResult};

/// Rankings for one amount, limited to the requested directions.
#[derive(Debug, Serialize)]
pub(super) struct RankData {
    amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    deposits: Option<Vec<RankedView>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    withdraws: Option<Vec<RankedView>>,
}

impl RankData {
    pub(super) fn new(rankings: &Rankings<'_>, filter: Option<Direction>) -> Self {
        let view = rankings.view();
        let keep = |direction: Direction| filter.map_or(true, |wanted| wanted == direction);
        Self {
            amount: view.amount,
            deposits: keep(Direction::Deposit).then_some(view.deposits),
            withdraws: keep(Direction::Withdraw).then_some(view.withdraws),
        }
    }
}

pub(super) fn tables(rankings: &Rankings<'_>, filter: Option<Direction>) -> Vec<Table> {
    directions(filter)
        .into_iter()
        .map(|direction| {
            ranked_table(
                format!("{direction} @ {}", rankings.amount),
                rankings.for_direction(direction),
            )
        })
        .collect()
}

pub fn run(
    args: &RankArgs,
    catalog: &ExchangeCatalog,
    prices: &PriceCache,
) -> Result<CommandResult, CliError> {
    let amount = parse_amount(args.amount)?;
    let filter = parse_direction_filter(args.direction.as_deref())?;

    let rankings = lowest_n_deposits_and_withdraws(catalog, prices, amount, args.top);
    let data = serde_json::to_value(RankData::new(&rankings, filter))?;

    let mut result = CommandResult::ok(data).with_tables(tables(&rankings, filter));
    for direction in directions(filter) {
        if rankings.for_direction(direction).is_empty() {
            result = result.with_warning(format!(
                "no exchange offers a {direction} method for {amount}"
            ));
        }
    }
    Ok(result)
}
