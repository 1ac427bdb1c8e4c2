use feescout_core::{
    fee_breakdown, round_to_cents, CoinSymbol, Direction, ExchangeCatalog, FeeBreakdown,
    PriceCache, ValidationError,
};
use serde::Serialize;

use crate::cli::FeeArgs;
use crate::error::CliError;
use crate::output::{percent, Table};

use super::{parse_amount, parse_direction, CommandResult};

#[derive(Debug, Serialize)]
struct FeeData {
    exchange: String,
    method: String,
    direction: Direction,
    coin: CoinSymbol,
    amount: f64,
    breakdown: FeeBreakdown,
    /// Total as a percentage of the amount, rounded to cents.
    fee: f64,
    within_limits: bool,
}

pub fn run(
    args: &FeeArgs,
    coin: &CoinSymbol,
    catalog: &ExchangeCatalog,
    prices: &PriceCache,
) -> Result<CommandResult, CliError> {
    let amount = parse_amount(args.amount)?;
    let direction = parse_direction(&args.direction)?;

    let exchange = catalog
        .get(&args.exchange)
        .ok_or_else(|| ValidationError::UnknownExchange {
            name: args.exchange.clone(),
        })?;
    let method = exchange
        .method(direction, &args.method)
        .ok_or_else(|| ValidationError::UnknownMethod {
            exchange: exchange.name.clone(),
            direction: direction.to_string(),
            method: args.method.clone(),
        })?;

    let breakdown = fee_breakdown(prices, direction, exchange, method, amount, coin);
    let fee = round_to_cents(breakdown.percentage_of(amount));
    let within_limits = method.admits(amount);

    let mut table = Table::new(
        format!("{} {} {direction} of {amount} in {coin}", exchange.name, method.kind),
        vec!["component", "amount"],
    );
    for (component, value) in [
        ("method fee", breakdown.method_fee),
        ("trading fee", breakdown.trading_fee),
        ("spread", breakdown.spread),
        ("coin withdraw fee", breakdown.withdraw_fee),
        ("total", breakdown.total),
    ] {
        table.push_row(vec![component.to_owned(), format!("{value:.2}")]);
    }
    table.push_row(vec![String::from("effective"), percent(fee)]);

    let data = serde_json::to_value(FeeData {
        exchange: exchange.name.clone(),
        method: method.kind.clone(),
        direction,
        coin: coin.clone(),
        amount: amount.value(),
        breakdown,
        fee,
        within_limits,
    })?;

    let mut result = CommandResult::ok(data).with_table(table);
    if !within_limits {
        result = result.with_warning(format!(
            "{} accepts {} between {} and {}; {amount} is outside that range",
            exchange.name, method.kind, method.min, method.max
        ));
    }
    Ok(result)
}
