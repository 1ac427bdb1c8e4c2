//! Cheapest transfer method per exchange.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::calculator::{calculate_fee, round_to_cents};
use crate::{Amount, CoinSymbol, Direction, ExchangeInfo, PriceCache, TransferMethod};

/// Coin used to price candidates during method selection, whatever coin the
/// user eventually trades.
pub const SELECTION_COIN: &str = "BTC";

/// One exchange/method pair with its fee as a percentage rounded to cents.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankedResult<'a> {
    pub fee: f64,
    pub exchange: &'a ExchangeInfo,
    pub method: &'a TransferMethod,
}

impl RankedResult<'_> {
    pub fn view(&self) -> RankedView {
        RankedView {
            fee: self.fee,
            exchange_name: self.exchange.name.clone(),
            method_type: self.method.kind.clone(),
        }
    }
}

/// Presentation form of a [`RankedResult`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedView {
    pub fee: f64,
    pub exchange_name: String,
    pub method_type: String,
}

/// Pick the cheapest method of `methods` whose range admits `amount`.
///
/// Candidates are priced in BTC terms. A later method replaces the current
/// best only when the stored, already rounded fee is strictly greater than
/// its unrounded fee, so ties keep the first method. Returns `None` when no
/// method admits the amount.
pub fn lowest_fee_method<'a>(
    prices: &PriceCache,
    direction: Direction,
    exchange: &'a ExchangeInfo,
    methods: &'a [TransferMethod],
    amount: Amount,
) -> Option<RankedResult<'a>> {
    let coin = CoinSymbol::btc();

    methods
        .iter()
        .filter(|method| method.admits(amount))
        .fold(None, |best: Option<RankedResult<'a>>, method| {
            let fee = calculate_fee(prices, direction, exchange, method, amount, &coin);
            trace!(
                exchange = %exchange.name,
                method = %method.kind,
                %direction,
                fee,
                "priced candidate method"
            );

            if best.map_or(true, |current| current.fee > fee) {
                Some(RankedResult {
                    fee: round_to_cents(fee),
                    exchange,
                    method,
                })
            } else {
                best
            }
        })
}
