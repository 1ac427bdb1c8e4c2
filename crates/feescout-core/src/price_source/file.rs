use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use super::{PriceFuture, PriceSource, PriceSourceError};
use crate::{CoinSymbol, PriceCache, UtcDateTime};

/// Prices read from a JSON file on every fetch.
///
/// Accepts either a flat `{"BTC": 65000.0}` table or the wrapped
/// `{"coinPriceCache": {...}, "lastUpdated": "<RFC3339>"}` document. A file
/// without a timestamp reports its modification time.
#[derive(Debug, Clone)]
pub struct FilePriceSource {
    path: PathBuf,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PriceDocument {
    Wrapped {
        #[serde(rename = "coinPriceCache")]
        coin_price_cache: BTreeMap<String, f64>,
        #[serde(rename = "lastUpdated", default)]
        last_updated: Option<String>,
    },
    Flat(BTreeMap<String, f64>),
}

impl FilePriceSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parse a price document; only `coins` are kept, or everything when empty.
    pub fn parse(input: &str, coins: &[CoinSymbol]) -> Result<PriceCache, PriceSourceError> {
        let document: PriceDocument = serde_json::from_str(input).map_err(|error| {
            PriceSourceError::invalid_response(format!("price file is not a price table: {error}"))
        })?;

        let (table, last_updated) = match document {
            PriceDocument::Wrapped {
                coin_price_cache,
                last_updated,
            } => (coin_price_cache, last_updated),
            PriceDocument::Flat(table) => (table, None),
        };

        let mut prices = BTreeMap::new();
        for (ticker, price) in table {
            let coin = CoinSymbol::parse(&ticker)
                .map_err(|error| PriceSourceError::invalid_response(error.to_string()))?;
            if coins.is_empty() || coins.contains(&coin) {
                prices.insert(coin, price);
            }
        }

        let last_updated = last_updated
            .map(|value| UtcDateTime::parse(&value))
            .transpose()
            .map_err(|error| PriceSourceError::invalid_response(error.to_string()))?;

        PriceCache::new(prices, last_updated)
            .map_err(|error| PriceSourceError::invalid_response(error.to_string()))
    }

    async fn modified_at(&self) -> Option<UtcDateTime> {
        let modified = tokio::fs::metadata(&self.path).await.ok()?.modified().ok()?;
        let seconds = modified
            .duration_since(std::time::UNIX_EPOCH)
            .ok()?
            .as_secs();
        UtcDateTime::from_unix_seconds(i64::try_from(seconds).ok()?).ok()
    }
}

impl PriceSource for FilePriceSource {
    fn name(&self) -> &'static str {
        "file"
    }

    fn fetch<'a>(&'a self, coins: &'a [CoinSymbol]) -> PriceFuture<'a> {
        Box::pin(async move {
            let contents = tokio::fs::read_to_string(&self.path).await.map_err(|error| {
                PriceSourceError::io(format!(
                    "failed to read price file '{}': {error}",
                    self.path.display()
                ))
            })?;

            let mut cache = Self::parse(&contents, coins)?;
            if cache.last_updated().is_none() {
                if let Some(modified) = self.modified_at().await {
                    cache = cache.with_last_updated(modified);
                }
            }

            debug!(path = %self.path.display(), priced = cache.len(), "loaded price file");
            Ok(cache)
        })
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::price_source::PriceSourceErrorKind;

    #[test]
    fn parses_flat_table() {
        let cache = FilePriceSource::parse(r#"{"BTC": 65000.0, "eth": 3000.0}"#, &[])
            .expect("flat table");

        assert_eq!(cache.price(&CoinSymbol::btc()), Some(65_000.0));
        assert_eq!(cache.price(&CoinSymbol::eth()), Some(3_000.0));
        assert!(cache.last_updated().is_none());
    }

    #[test]
    fn parses_wrapped_document_with_timestamp() {
        let cache = FilePriceSource::parse(
            r#"{"coinPriceCache": {"BTC": 1.5}, "lastUpdated": "2024-03-01T12:00:00Z"}"#,
            &[],
        )
        .expect("wrapped document");

        assert_eq!(cache.price(&CoinSymbol::btc()), Some(1.5));
        assert_eq!(
            cache.last_updated(),
            Some(UtcDateTime::parse("2024-03-01T12:00:00Z").expect("valid"))
        );
    }

    #[test]
    fn keeps_only_requested_coins() {
        let cache = FilePriceSource::parse(r#"{"BTC": 1.0, "ETH": 2.0}"#, &[CoinSymbol::eth()])
            .expect("table");

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.price(&CoinSymbol::btc()), None);
    }

    #[test]
    fn rejects_negative_prices() {
        let error = FilePriceSource::parse(r#"{"BTC": -1.0}"#, &[]).expect_err("negative");
        assert_eq!(error.kind(), PriceSourceErrorKind::InvalidResponse);
    }

    #[tokio::test]
    async fn reads_file_and_falls_back_to_mtime() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, r#"{{"BTC": 42.0}}"#).expect("write prices");

        let source = FilePriceSource::new(file.path());
        let cache = source.fetch(&[]).await.expect("read prices");

        assert_eq!(cache.price(&CoinSymbol::btc()), Some(42.0));
        assert!(cache.last_updated().is_some());
        assert_eq!(source.name(), "file");
    }

    #[tokio::test]
    async fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let source = FilePriceSource::new(dir.path().join("absent.json"));

        let error = source.fetch(&[]).await.expect_err("missing");
        assert_eq!(error.kind(), PriceSourceErrorKind::Io);
        assert!(!error.retryable());
    }
}
