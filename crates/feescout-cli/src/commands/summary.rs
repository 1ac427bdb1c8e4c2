use feescout_core::{summarize, Amount, ExchangeCatalog, PriceCache, DEFAULT_SUMMARY_AMOUNTS};

use crate::cli::SummaryArgs;
use crate::error::CliError;

use super::rank::{tables, RankData};
use super::{parse_amount, parse_direction_filter, CommandResult};

pub fn run(
    args: &SummaryArgs,
    catalog: &ExchangeCatalog,
    prices: &PriceCache,
) -> Result<CommandResult, CliError> {
    let filter = parse_direction_filter(args.direction.as_deref())?;
    let values = if args.amounts.is_empty() {
        DEFAULT_SUMMARY_AMOUNTS.to_vec()
    } else {
        args.amounts.clone()
    };
    let amounts = values
        .into_iter()
        .map(parse_amount)
        .collect::<Result<Vec<Amount>, _>>()?;

    let summary = summarize(catalog, prices, &amounts, args.top);
    let data = summary
        .iter()
        .map(|rankings| RankData::new(rankings, filter))
        .collect::<Vec<_>>();

    Ok(CommandResult::ok(serde_json::to_value(data)?).with_tables(
        summary
            .iter()
            .flat_map(|rankings| tables(rankings, filter)),
    ))
}
