//! Effective fee of one (exchange, method, amount, direction) combination.

use serde::Serialize;

use crate::{Amount, CoinSymbol, Direction, ExchangeInfo, PriceCache, TransferMethod};

/// Absolute fee components in fiat.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeeBreakdown {
    pub method_fee: f64,
    pub trading_fee: f64,
    pub spread: f64,
    /// Coin withdraw fee converted to fiat; only charged on deposits.
    pub withdraw_fee: f64,
    pub total: f64,
}

impl FeeBreakdown {
    /// Total as a percentage of the transfer amount, unrounded.
    pub fn percentage_of(&self, amount: Amount) -> f64 {
        self.total / amount.value() * 100.0
    }
}

/// Evaluate every fee contribution for one method.
pub fn fee_breakdown(
    prices: &PriceCache,
    direction: Direction,
    exchange: &ExchangeInfo,
    method: &TransferMethod,
    amount: Amount,
    coin: &CoinSymbol,
) -> FeeBreakdown {
    let method_fee = method.fee.evaluate(amount, None);
    let trading_fee = exchange.trading_fee.evaluate(amount, Some(coin));
    let spread = exchange.real_spread.evaluate(amount, None);
    let withdraw_fee = if direction.is_buy() {
        withdraw_fee_in_fiat(prices, exchange, coin)
    } else {
        0.0
    };

    FeeBreakdown {
        method_fee,
        trading_fee,
        spread,
        withdraw_fee,
        total: method_fee + trading_fee + spread + withdraw_fee,
    }
}

/// Total fee as a percentage of `amount`, unrounded.
pub fn calculate_fee(
    prices: &PriceCache,
    direction: Direction,
    exchange: &ExchangeInfo,
    method: &TransferMethod,
    amount: Amount,
    coin: &CoinSymbol,
) -> f64 {
    fee_breakdown(prices, direction, exchange, method, amount, coin).percentage_of(amount)
}

/// Round to two decimals using the exact binary value of `value`.
///
/// `83.955` is stored just below the half cent and rounds down. Exact halves
/// (odd multiples of 1/8, such as `0.125`) round away from zero.
pub fn round_to_cents(value: f64) -> f64 {
    let eighths = value * 8.0;
    if eighths.fract() == 0.0 && eighths % 2.0 != 0.0 {
        return (value * 100.0).round() / 100.0;
    }
    format!("{value:.2}").parse().unwrap_or(value)
}

/// Missing fee entry, missing price or a non-finite product all count as zero.
fn withdraw_fee_in_fiat(prices: &PriceCache, exchange: &ExchangeInfo, coin: &CoinSymbol) -> f64 {
    match (exchange.withdraw_fee_for(coin), prices.price(coin)) {
        (Some(quantity), Some(price)) => {
            let fiat = quantity * price;
            if fiat.is_finite() {
                fiat
            } else {
                0.0
            }
        }
        _ => 0.0,
    }
}
