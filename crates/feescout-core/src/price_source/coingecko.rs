use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use super::{PriceFuture, PriceSource, PriceSourceError};
use crate::http_client::{
    HttpClient, HttpRequest, HttpResponse, ReqwestHttpClient, DEFAULT_TIMEOUT_MS,
};
use crate::retry::RetryConfig;
use crate::{CoinSymbol, PriceCache, UtcDateTime};

pub const DEFAULT_COINGECKO_URL: &str = "https://api.coingecko.com/api/v3";
pub const DEFAULT_VS_CURRENCY: &str = "cad";

const API_KEY_HEADER: &str = "x-cg-demo-api-key";

/// CoinGecko id for a ticker, for the coins exchanges charge withdraw fees in.
pub fn coingecko_id(coin: &CoinSymbol) -> Option<&'static str> {
    let id = match coin.as_str() {
        "BTC" => "bitcoin",
        "ETH" => "ethereum",
        "LTC" => "litecoin",
        "BCH" => "bitcoin-cash",
        "XRP" => "ripple",
        "XLM" => "stellar",
        "USDT" => "tether",
        "USDC" => "usd-coin",
        "QCAD" => "qcad",
        "DOGE" => "dogecoin",
        "ADA" => "cardano",
        "DOT" => "polkadot",
        "LINK" => "chainlink",
        "SOL" => "solana",
        "EOS" => "eos",
        _ => return None,
    };
    Some(id)
}

/// Prices from the CoinGecko `simple/price` endpoint.
#[derive(Clone)]
pub struct CoinGeckoPriceSource {
    http_client: Arc<dyn HttpClient>,
    base_url: String,
    vs_currency: String,
    api_key: Option<String>,
    timeout_ms: u64,
    retry: RetryConfig,
}

impl Default for CoinGeckoPriceSource {
    fn default() -> Self {
        Self::new(Arc::new(ReqwestHttpClient::new()))
    }
}

impl CoinGeckoPriceSource {
    pub fn new(http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            http_client,
            base_url: String::from(DEFAULT_COINGECKO_URL),
            vs_currency: String::from(DEFAULT_VS_CURRENCY),
            api_key: None,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            retry: RetryConfig::default(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_owned();
        self
    }

    pub fn with_vs_currency(mut self, vs_currency: impl Into<String>) -> Self {
        self.vs_currency = vs_currency.into().to_ascii_lowercase();
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn vs_currency(&self) -> &str {
        &self.vs_currency
    }

    fn request_url(&self, ids: &[&str]) -> String {
        format!(
            "{}/simple/price?ids={}&vs_currencies={}&include_last_updated_at=true",
            self.base_url,
            urlencoding::encode(&ids.join(",")),
            urlencoding::encode(&self.vs_currency),
        )
    }

    fn request(&self, url: &str) -> HttpRequest {
        let request = HttpRequest::get(url)
            .with_header("accept", "application/json")
            .with_timeout(Duration::from_millis(self.timeout_ms));
        match &self.api_key {
            Some(key) => request.with_header(API_KEY_HEADER, key),
            None => request,
        }
    }

    async fn execute_with_retry(&self, url: &str) -> Result<HttpResponse, PriceSourceError> {
        let mut attempt = 0;
        loop {
            let error = match self.http_client.execute(self.request(url)).await {
                Ok(response) if response.is_success() => return Ok(response),
                Ok(response) => self.classify_status(response.status),
                Err(error) => PriceSourceError::unavailable(format!(
                    "coingecko transport error: {}",
                    error.message()
                ))
                .with_retryable(error.retryable()),
            };

            if !error.retryable() || attempt >= self.retry.max_retries {
                return Err(error);
            }

            let delay = self.retry.delay_for_attempt(attempt);
            warn!(
                attempt = attempt + 1,
                delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                code = error.code(),
                "retrying coingecko price request"
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }

    fn classify_status(&self, status: u16) -> PriceSourceError {
        let message = format!("coingecko returned status {status}");
        let error = match status {
            429 => PriceSourceError::rate_limited(message),
            500..=599 => PriceSourceError::unavailable(message),
            _ => PriceSourceError::invalid_response(message),
        };
        error.with_retryable(self.retry.should_retry_status(status))
    }

    fn parse(
        &self,
        body: &str,
        wanted: &[(&CoinSymbol, &'static str)],
    ) -> Result<PriceCache, PriceSourceError> {
        let payload: BTreeMap<String, BTreeMap<String, f64>> = serde_json::from_str(body)
            .map_err(|error| {
                PriceSourceError::invalid_response(format!(
                    "coingecko payload is not a price table: {error}"
                ))
            })?;

        let mut prices = BTreeMap::new();
        let mut newest = None::<f64>;
        for (coin, id) in wanted {
            let Some(entry) = payload.get(*id) else {
                debug!(%coin, id, "coingecko returned no entry");
                continue;
            };
            let Some(price) = entry.get(&self.vs_currency) else {
                debug!(%coin, id, vs = %self.vs_currency, "coingecko entry lacks currency");
                continue;
            };
            prices.insert((*coin).clone(), *price);
            if let Some(updated_at) = entry.get("last_updated_at") {
                newest = Some(newest.map_or(*updated_at, |current| current.max(*updated_at)));
            }
        }

        let last_updated = newest
            .and_then(|seconds| UtcDateTime::from_unix_seconds(seconds as i64).ok())
            .unwrap_or_else(UtcDateTime::now);

        PriceCache::new(prices, Some(last_updated))
            .map_err(|error| PriceSourceError::invalid_response(error.to_string()))
    }
}

impl PriceSource for CoinGeckoPriceSource {
    fn name(&self) -> &'static str {
        "coingecko"
    }

    fn fetch<'a>(&'a self, coins: &'a [CoinSymbol]) -> PriceFuture<'a> {
        Box::pin(async move {
            let mut wanted = Vec::with_capacity(coins.len());
            for coin in coins {
                match coingecko_id(coin) {
                    Some(id) if !wanted.iter().any(|(_, known)| *known == id) => {
                        wanted.push((coin, id))
                    }
                    Some(_) => {}
                    None => warn!(%coin, "no coingecko id for coin; skipping"),
                }
            }

            if wanted.is_empty() {
                return Ok(PriceCache::empty());
            }

            let ids = wanted.iter().map(|(_, id)| *id).collect::<Vec<_>>();
            let url = self.request_url(&ids);
            debug!(%url, coins = ids.len(), "fetching coingecko prices");

            let response = self.execute_with_retry(&url).await?;
            let cache = self.parse(&response.body, &wanted)?;
            debug!(priced = cache.len(), "parsed coingecko prices");
            Ok(cache)
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::future::Future;
    use std::pin::Pin;
    use std::sync::Mutex;

    use super::*;
    use crate::http_client::HttpError;
    use crate::price_source::PriceSourceErrorKind;

    #[derive(Debug)]
    struct ScriptedHttpClient {
        responses: Mutex<VecDeque<Result<HttpResponse, HttpError>>>,
        requests: Mutex<Vec<HttpRequest>>,
    }

    impl ScriptedHttpClient {
        fn new(responses: Vec<Result<HttpResponse, HttpError>>) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(responses.into()),
                requests: Mutex::new(Vec::new()),
            })
        }

        fn recorded(&self) -> Vec<HttpRequest> {
            self.requests.lock().expect("request log").clone()
        }
    }

    impl HttpClient for ScriptedHttpClient {
        fn execute<'a>(
            &'a self,
            request: HttpRequest,
        ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
            self.requests.lock().expect("request log").push(request);
            let next = self
                .responses
                .lock()
                .expect("script")
                .pop_front()
                .unwrap_or_else(|| Err(HttpError::permanent("script exhausted")));
            Box::pin(async move { next })
        }
    }

    fn source(client: Arc<ScriptedHttpClient>) -> CoinGeckoPriceSource {
        CoinGeckoPriceSource::new(client)
            .with_base_url("https://prices.test/api/v3/")
            .with_retry(RetryConfig::fixed(Duration::ZERO, 2))
    }

    fn coins(tickers: &[&str]) -> Vec<CoinSymbol> {
        tickers
            .iter()
            .map(|ticker| CoinSymbol::parse(ticker).expect("valid coin"))
            .collect()
    }

    #[tokio::test]
    async fn parses_prices_for_requested_currency() {
        let client = ScriptedHttpClient::new(vec![Ok(HttpResponse::new(
            200,
            r#"{"bitcoin":{"cad":65000.5,"last_updated_at":1700000000},"ethereum":{"cad":3000.0,"last_updated_at":1700000100}}"#,
        ))]);

        let cache = source(client.clone())
            .fetch(&coins(&["BTC", "ETH"]))
            .await
            .expect("prices");

        assert_eq!(cache.price(&CoinSymbol::btc()), Some(65_000.5));
        assert_eq!(cache.price(&CoinSymbol::eth()), Some(3_000.0));
        assert_eq!(
            cache.last_updated().map(UtcDateTime::format_rfc3339),
            Some(String::from("2023-11-14T22:15:00Z"))
        );

        let requests = client.recorded();
        assert_eq!(requests.len(), 1);
        assert_eq!(
            requests[0].url,
            "https://prices.test/api/v3/simple/price?ids=bitcoin%2Cethereum&vs_currencies=cad&include_last_updated_at=true"
        );
    }

    #[tokio::test]
    async fn unknown_coins_are_skipped_without_a_request() {
        let client = ScriptedHttpClient::new(Vec::new());

        let cache = source(client.clone())
            .fetch(&coins(&["ZZZ"]))
            .await
            .expect("empty snapshot");

        assert!(cache.is_empty());
        assert!(client.recorded().is_empty());
    }

    #[tokio::test]
    async fn retries_server_errors_then_succeeds() {
        let client = ScriptedHttpClient::new(vec![
            Ok(HttpResponse::new(503, "busy")),
            Ok(HttpResponse::new(200, r#"{"bitcoin":{"cad":1.0}}"#)),
        ]);

        let cache = source(client.clone())
            .fetch(&coins(&["BTC"]))
            .await
            .expect("second attempt succeeds");

        assert_eq!(cache.price(&CoinSymbol::btc()), Some(1.0));
        assert_eq!(client.recorded().len(), 2);
    }

    #[tokio::test]
    async fn rate_limit_is_reported_after_retries_run_out() {
        let client = ScriptedHttpClient::new(vec![
            Ok(HttpResponse::new(429, "")),
            Ok(HttpResponse::new(429, "")),
            Ok(HttpResponse::new(429, "")),
        ]);

        let error = source(client.clone())
            .fetch(&coins(&["BTC"]))
            .await
            .expect_err("rate limited");

        assert_eq!(error.kind(), PriceSourceErrorKind::RateLimited);
        assert_eq!(client.recorded().len(), 3);
    }

    #[tokio::test]
    async fn client_errors_are_not_retried() {
        let client = ScriptedHttpClient::new(vec![Ok(HttpResponse::new(404, "not found"))]);

        let error = source(client.clone())
            .fetch(&coins(&["BTC"]))
            .await
            .expect_err("invalid response");

        assert_eq!(error.kind(), PriceSourceErrorKind::InvalidResponse);
        assert_eq!(client.recorded().len(), 1);
    }

    #[tokio::test]
    async fn malformed_body_is_invalid_response() {
        let client = ScriptedHttpClient::new(vec![Ok(HttpResponse::new(200, "[1,2,3]"))]);

        let error = source(client)
            .fetch(&coins(&["BTC"]))
            .await
            .expect_err("not a table");

        assert_eq!(error.code(), "price_source.invalid_response");
    }

    #[tokio::test]
    async fn api_key_is_sent_as_header() {
        let client = ScriptedHttpClient::new(vec![Ok(HttpResponse::new(200, "{}"))]);

        source(client.clone())
            .with_api_key("demo-key")
            .with_vs_currency("USD")
            .fetch(&coins(&["BTC"]))
            .await
            .expect("empty table is fine");

        let request = &client.recorded()[0];
        assert_eq!(
            request.headers.get(API_KEY_HEADER).map(String::as_str),
            Some("demo-key")
        );
        assert!(request.url.contains("vs_currencies=usd"));
    }
}
