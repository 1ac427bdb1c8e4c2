//! Immutable coin price snapshot consumed by the fee engine.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{CoinSymbol, UtcDateTime, ValidationError};

/// Coin -> fiat price snapshot.
///
/// The engine only reads snapshots; refreshing is the job of a
/// [`PriceSource`](crate::price_source::PriceSource). An empty snapshot is
/// valid and makes every withdraw-fee contribution zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceCache {
    prices: BTreeMap<CoinSymbol, f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    last_updated: Option<UtcDateTime>,
}

impl PriceCache {
    pub fn new(
        prices: BTreeMap<CoinSymbol, f64>,
        last_updated: Option<UtcDateTime>,
    ) -> Result<Self, ValidationError> {
        for (coin, price) in &prices {
            if !price.is_finite() || *price < 0.0 {
                return Err(ValidationError::InvalidPrice {
                    coin: coin.to_string(),
                });
            }
        }

        Ok(Self {
            prices,
            last_updated,
        })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_prices(
        prices: impl IntoIterator<Item = (CoinSymbol, f64)>,
    ) -> Result<Self, ValidationError> {
        Self::new(prices.into_iter().collect(), None)
    }

    pub fn with_last_updated(mut self, last_updated: UtcDateTime) -> Self {
        self.last_updated = Some(last_updated);
        self
    }

    pub fn price(&self, coin: &CoinSymbol) -> Option<f64> {
        self.prices.get(coin).copied()
    }

    pub fn prices(&self) -> &BTreeMap<CoinSymbol, f64> {
        &self.prices
    }

    pub fn last_updated(&self) -> Option<UtcDateTime> {
        self.last_updated
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}
