use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use super::{PriceSource, PriceSourceError};
use crate::{CoinSymbol, PriceCache};

/// Holds the latest snapshot produced by a [`PriceSource`].
///
/// Readers get a shared `Arc` to a complete snapshot. A failed refresh leaves
/// the previous snapshot in place.
#[derive(Clone)]
pub struct PriceRefresher {
    source: Arc<dyn PriceSource>,
    coins: Arc<[CoinSymbol]>,
    latest: Arc<RwLock<Option<Arc<PriceCache>>>>,
}

impl PriceRefresher {
    pub fn new(source: Arc<dyn PriceSource>, coins: impl IntoIterator<Item = CoinSymbol>) -> Self {
        Self {
            source,
            coins: coins.into_iter().collect(),
            latest: Arc::new(RwLock::new(None)),
        }
    }

    pub fn source_name(&self) -> &'static str {
        self.source.name()
    }

    pub fn coins(&self) -> &[CoinSymbol] {
        &self.coins
    }

    /// Fetch a new snapshot and publish it.
    pub async fn refresh(&self) -> Result<Arc<PriceCache>, PriceSourceError> {
        let cache = Arc::new(self.source.fetch(&self.coins).await?);
        *self.latest.write().await = Some(Arc::clone(&cache));
        info!(
            source = self.source.name(),
            priced = cache.len(),
            "price snapshot refreshed"
        );
        Ok(cache)
    }

    /// Latest published snapshot, if any refresh has succeeded.
    pub async fn snapshot(&self) -> Option<Arc<PriceCache>> {
        self.latest.read().await.clone()
    }

    /// Refresh every `interval` on the current tokio runtime, starting now.
    pub fn spawn_periodic(&self, interval: Duration) -> JoinHandle<()> {
        let refresher = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if let Err(error) = refresher.refresh().await {
                    warn!(
                        source = refresher.source_name(),
                        code = error.code(),
                        %error,
                        "price refresh failed; keeping previous snapshot"
                    );
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::price_source::{PriceFuture, StaticPriceSource};

    /// Succeeds on the first call, fails afterwards.
    struct FlakySource {
        calls: AtomicUsize,
    }

    impl PriceSource for FlakySource {
        fn name(&self) -> &'static str {
            "flaky"
        }

        fn fetch<'a>(&'a self, _coins: &'a [CoinSymbol]) -> PriceFuture<'a> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            Box::pin(async move {
                if call == 0 {
                    Ok(PriceCache::from_prices([(CoinSymbol::btc(), 100.0)])
                        .expect("valid cache"))
                } else {
                    Err(PriceSourceError::unavailable("upstream down"))
                }
            })
        }
    }

    #[tokio::test]
    async fn snapshot_is_empty_until_first_refresh() {
        let refresher = PriceRefresher::new(Arc::new(StaticPriceSource::empty()), [CoinSymbol::btc()]);

        assert!(refresher.snapshot().await.is_none());
        refresher.refresh().await.expect("static refresh");
        assert!(refresher.snapshot().await.is_some());
    }

    #[tokio::test]
    async fn failed_refresh_keeps_previous_snapshot() {
        let refresher = PriceRefresher::new(
            Arc::new(FlakySource {
                calls: AtomicUsize::new(0),
            }),
            [CoinSymbol::btc()],
        );

        refresher.refresh().await.expect("first refresh");
        let error = refresher.refresh().await.expect_err("second refresh fails");

        assert_eq!(error.code(), "price_source.unavailable");
        let snapshot = refresher.snapshot().await.expect("still present");
        assert_eq!(snapshot.price(&CoinSymbol::btc()), Some(100.0));
    }

    #[tokio::test]
    async fn periodic_refresh_publishes_a_snapshot() {
        let cache = PriceCache::from_prices([(CoinSymbol::eth(), 5.0)]).expect("valid");
        let refresher = PriceRefresher::new(Arc::new(StaticPriceSource::new(cache)), Vec::new());

        let handle = refresher.spawn_periodic(Duration::from_millis(10));
        let mut published = None;
        for _ in 0..100 {
            published = refresher.snapshot().await;
            if published.is_some() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        handle.abort();

        let published = published.expect("refreshed within a second");
        assert_eq!(published.price(&CoinSymbol::eth()), Some(5.0));
    }
}
