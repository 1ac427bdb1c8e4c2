//! Ranking of exchanges by effective fee.

use std::collections::HashSet;

use serde::Serialize;
use tracing::debug;

use crate::calculator::{calculate_fee, round_to_cents};
use crate::selector::{lowest_fee_method, RankedResult, RankedView};
use crate::{Amount, CoinSymbol, Direction, ExchangeCatalog, PriceCache};

/// Number of results kept per direction by default.
pub const DEFAULT_TOP_N: usize = 3;

/// Amounts shown on the overview page.
pub const DEFAULT_SUMMARY_AMOUNTS: [f64; 5] = [100.0, 500.0, 1_000.0, 5_000.0, 15_000.0];

/// Cheapest deposits and withdraws for one amount, ascending by fee.
#[derive(Debug, Clone, PartialEq)]
pub struct Rankings<'a> {
    pub amount: Amount,
    pub deposits: Vec<RankedResult<'a>>,
    pub withdraws: Vec<RankedResult<'a>>,
}

impl<'a> Rankings<'a> {
    /// The list shown for the buy/sell toggle.
    pub fn for_direction(&self, direction: Direction) -> &[RankedResult<'a>] {
        match direction {
            Direction::Deposit => &self.deposits,
            Direction::Withdraw => &self.withdraws,
        }
    }

    pub fn view(&self) -> RankingsView {
        RankingsView {
            amount: self.amount.value(),
            deposits: self.deposits.iter().map(RankedResult::view).collect(),
            withdraws: self.withdraws.iter().map(RankedResult::view).collect(),
        }
    }
}

/// Serializable form of [`Rankings`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankingsView {
    pub amount: f64,
    pub deposits: Vec<RankedView>,
    pub withdraws: Vec<RankedView>,
}

/// Best method per exchange for one direction, sorted ascending and cut to `n`.
///
/// Exchanges without a method admitting `amount` are left out. Equal fees keep
/// catalog order.
pub fn ranked<'a>(
    catalog: &'a ExchangeCatalog,
    prices: &PriceCache,
    direction: Direction,
    amount: Amount,
    n: usize,
) -> Vec<RankedResult<'a>> {
    let mut results = catalog
        .iter()
        .filter_map(|exchange| {
            lowest_fee_method(
                prices,
                direction,
                exchange,
                exchange.methods(direction),
                amount,
            )
        })
        .collect::<Vec<_>>();

    results.sort_by(|left, right| left.fee.total_cmp(&right.fee));
    debug!(
        %direction,
        %amount,
        eligible = results.len(),
        keep = n,
        "ranked exchanges"
    );
    results.truncate(n);
    results
}

/// Top `n` deposits and withdraws for `amount` across the whole catalog.
pub fn lowest_n_deposits_and_withdraws<'a>(
    catalog: &'a ExchangeCatalog,
    prices: &PriceCache,
    amount: Amount,
    n: usize,
) -> Rankings<'a> {
    Rankings {
        amount,
        deposits: ranked(catalog, prices, Direction::Deposit, amount, n),
        withdraws: ranked(catalog, prices, Direction::Withdraw, amount, n),
    }
}

/// Rankings for several amounts.
pub fn summarize<'a>(
    catalog: &'a ExchangeCatalog,
    prices: &PriceCache,
    amounts: &[Amount],
    n: usize,
) -> Vec<Rankings<'a>> {
    amounts
        .iter()
        .map(|amount| lowest_n_deposits_and_withdraws(catalog, prices, *amount, n))
        .collect()
}

/// Distinct method labels admitting `amount`, in first-seen catalog order.
pub fn available_method_types(
    catalog: &ExchangeCatalog,
    direction: Direction,
    amount: Amount,
) -> Vec<String> {
    let mut seen = HashSet::new();
    catalog
        .iter()
        .flat_map(|exchange| exchange.methods(direction))
        .filter(|method| method.admits(amount))
        .filter(|method| seen.insert(method.kind.as_str()))
        .map(|method| method.kind.clone())
        .collect()
}

/// Every method labelled `method_type` (ASCII case-insensitive) admitting
/// `amount`, priced in `coin`, ascending and not truncated.
pub fn compare_method<'a>(
    catalog: &'a ExchangeCatalog,
    prices: &PriceCache,
    direction: Direction,
    amount: Amount,
    method_type: &str,
    coin: &CoinSymbol,
) -> Vec<RankedResult<'a>> {
    let mut results = catalog
        .iter()
        .flat_map(|exchange| {
            exchange
                .methods(direction)
                .iter()
                .filter(|method| method.admits(amount))
                .filter(|method| method.kind.eq_ignore_ascii_case(method_type))
                .map(move |method| RankedResult {
                    fee: calculate_fee(prices, direction, exchange, method, amount, coin),
                    exchange,
                    method,
                })
        })
        .collect::<Vec<_>>();

    results.sort_by(|left, right| left.fee.total_cmp(&right.fee));
    for result in &mut results {
        result.fee = round_to_cents(result.fee);
    }
    results
}
