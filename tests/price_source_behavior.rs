//! Price sources feeding the ranking engine.

use std::io::Write;
use std::time::Duration;

use feescout_core::{
    lowest_n_deposits_and_withdraws, CoinGeckoPriceSource, FilePriceSource, PriceRefresher,
    PriceSource, PriceSourceErrorKind, RetryConfig, StaticPriceSource,
};
use feescout_tests::{
    amount, coin, prices, Arc, ExchangeCatalog, HttpError, HttpResponse, ScriptedHttpClient,
};

fn coingecko(client: Arc<ScriptedHttpClient>) -> CoinGeckoPriceSource {
    CoinGeckoPriceSource::new(client)
        .with_base_url("https://prices.test/api/v3")
        .with_retry(RetryConfig::fixed(Duration::ZERO, 1))
}

// =============================================================================
// CoinGecko
// =============================================================================

#[tokio::test]
async fn coingecko_prices_change_the_deposit_ranking_inputs() {
    // Given: CoinGecko reports a BTC price
    let client = ScriptedHttpClient::new(vec![Ok(HttpResponse::new(
        200,
        r#"{"bitcoin":{"cad":80000.0,"last_updated_at":1710000000}}"#,
    ))]);
    let source = coingecko(client.clone());

    // When: the snapshot is fetched and used for ranking
    let snapshot = source.fetch(&[coin("BTC")]).await.expect("prices");
    let catalog = ExchangeCatalog::builtin();
    let priced = lowest_n_deposits_and_withdraws(&catalog, &snapshot, amount(100.0), 16);
    let unpriced = lowest_n_deposits_and_withdraws(
        &catalog,
        &feescout_tests::PriceCache::empty(),
        amount(100.0),
        16,
    );

    // Then: coin withdraw fees are now part of deposit costs
    assert_eq!(snapshot.price(&coin("BTC")), Some(80_000.0));
    assert!(snapshot.last_updated().is_some());
    assert_ne!(priced.view().deposits, unpriced.view().deposits);
    assert_eq!(priced.view().withdraws, unpriced.view().withdraws);

    // And: exactly one request went out, for bitcoin in cad
    let requests = client.requests();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].url.contains("ids=bitcoin"));
    assert!(requests[0].url.contains("vs_currencies=cad"));
}

#[tokio::test]
async fn coingecko_outage_surfaces_as_unavailable_after_retry() {
    let client = ScriptedHttpClient::new(vec![
        Ok(HttpResponse::new(502, "bad gateway")),
        Ok(HttpResponse::new(502, "bad gateway")),
    ]);

    let error = coingecko(client.clone())
        .fetch(&[coin("BTC")])
        .await
        .expect_err("outage");

    assert_eq!(error.kind(), PriceSourceErrorKind::Unavailable);
    assert_eq!(error.code(), "price_source.unavailable");
    assert_eq!(client.requests().len(), 2);
}

#[tokio::test]
async fn permanent_transport_error_stops_immediately() {
    let client = ScriptedHttpClient::new(vec![Err(HttpError::permanent("bad url"))]);

    let error = coingecko(client.clone())
        .fetch(&[coin("ETH")])
        .await
        .expect_err("transport");

    assert!(!error.retryable());
    assert_eq!(client.requests().len(), 1);
}

// =============================================================================
// File and static sources
// =============================================================================

#[tokio::test]
async fn wrapped_cache_document_is_read_from_disk() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    write!(
        file,
        r#"{{"coinPriceCache":{{"BTC":51000.0,"ETH":2500.0}},"lastUpdated":"2024-05-01T00:00:00Z"}}"#
    )
    .expect("write");

    let snapshot = FilePriceSource::new(file.path())
        .fetch(&[coin("ETH")])
        .await
        .expect("prices");

    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot.price(&coin("ETH")), Some(2_500.0));
    assert_eq!(
        snapshot.last_updated().map(|at| at.format_rfc3339()),
        Some(String::from("2024-05-01T00:00:00Z"))
    );
}

#[tokio::test]
async fn refresher_serves_last_good_snapshot_through_outages() {
    // Given: a refresher over CoinGecko that succeeds once, then fails
    let client = ScriptedHttpClient::new(vec![
        Ok(HttpResponse::new(200, r#"{"bitcoin":{"cad":60000.0}}"#)),
        Ok(HttpResponse::new(404, "gone")),
    ]);
    let refresher = PriceRefresher::new(Arc::new(coingecko(client)), [coin("BTC")]);

    // When: the second refresh fails
    refresher.refresh().await.expect("first refresh");
    let error = refresher.refresh().await.expect_err("second refresh");

    // Then: readers keep the first snapshot
    assert_eq!(error.kind(), PriceSourceErrorKind::InvalidResponse);
    let snapshot = refresher.snapshot().await.expect("snapshot kept");
    assert_eq!(snapshot.price(&coin("BTC")), Some(60_000.0));
    assert_eq!(refresher.source_name(), "coingecko");
}

#[tokio::test]
async fn static_source_feeds_rankings_offline() {
    let source = StaticPriceSource::new(prices(&[("BTC", 30_000.0)]));
    let refresher = PriceRefresher::new(Arc::new(source), [coin("BTC")]);

    let snapshot = refresher.refresh().await.expect("static");
    let catalog = ExchangeCatalog::builtin();
    let rankings = lowest_n_deposits_and_withdraws(&catalog, &snapshot, amount(1_000.0), 3);

    assert_eq!(rankings.deposits.len(), 3);
    assert_eq!(refresher.source_name(), "static");
}
