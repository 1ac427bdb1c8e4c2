use feescout_core::{
    compare_method, fee_breakdown, round_to_cents, Amount, CoinSymbol, Direction,
    ExchangeCatalog, PriceCache, RankedResult, RankedView,
};
use serde::Serialize;

use crate::cli::CompareArgs;
use crate::error::CliError;
use crate::output::{percent, Table};

use super::{parse_amount, parse_direction, CommandResult};

#[derive(Debug, Serialize)]
struct CompareData {
    amount: f64,
    direction: Direction,
    method: String,
    coin: CoinSymbol,
    results: Vec<CompareEntry>,
}

/// Ranked view plus the absolute fee in fiat.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CompareEntry {
    #[serde(flatten)]
    view: RankedView,
    total_fee: f64,
}

fn compare_entry(
    result: &RankedResult<'_>,
    prices: &PriceCache,
    direction: Direction,
    amount: Amount,
    coin: &CoinSymbol,
) -> CompareEntry {
    let breakdown = fee_breakdown(
        prices,
        direction,
        result.exchange,
        result.method,
        amount,
        coin,
    );
    CompareEntry {
        view: result.view(),
        total_fee: round_to_cents(breakdown.total),
    }
}

pub fn run(
    args: &CompareArgs,
    coin: &CoinSymbol,
    catalog: &ExchangeCatalog,
    prices: &PriceCache,
) -> Result<CommandResult, CliError> {
    let amount = parse_amount(args.amount)?;
    let direction = parse_direction(&args.direction)?;

    let results = compare_method(catalog, prices, direction, amount, &args.method, coin)
        .iter()
        .map(|result| compare_entry(result, prices, direction, amount, coin))
        .collect::<Vec<_>>();

    let mut table = Table::new(
        format!("{} {direction} in {coin} @ {amount}", args.method),
        vec!["#", "exchange", "method", "fee", "cost"],
    );
    for (position, entry) in results.iter().enumerate() {
        table.push_row(vec![
            (position + 1).to_string(),
            entry.view.exchange_name.clone(),
            entry.view.method_type.clone(),
            percent(entry.view.fee),
            format!("{:.2}", entry.total_fee),
        ]);
    }
    let empty = results.is_empty();

    let data = serde_json::to_value(CompareData {
        amount: amount.value(),
        direction,
        method: args.method.clone(),
        coin: coin.clone(),
        results,
    })?;

    let mut result = CommandResult::ok(data).with_table(table);
    if empty {
        result = result.with_warning(format!(
            "no exchange offers '{}' for a {direction} of {amount}",
            args.method
        ));
    }
    Ok(result)
}
