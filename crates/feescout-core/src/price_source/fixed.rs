use super::{PriceFuture, PriceSource};
use crate::{CoinSymbol, PriceCache};

/// Serves the same snapshot on every fetch; used offline and in tests.
#[derive(Debug, Clone, Default)]
pub struct StaticPriceSource {
    cache: PriceCache,
}

impl StaticPriceSource {
    pub fn new(cache: PriceCache) -> Self {
        Self { cache }
    }

    pub fn empty() -> Self {
        Self::default()
    }
}

impl PriceSource for StaticPriceSource {
    fn name(&self) -> &'static str {
        "static"
    }

    fn fetch<'a>(&'a self, coins: &'a [CoinSymbol]) -> PriceFuture<'a> {
        let _ = coins;
        let cache = self.cache.clone();
        Box::pin(async move { Ok(cache) })
    }
}
