//! # feescout core
//!
//! Fee model and ranking engine for comparing cryptocurrency exchanges.
//!
//! Given an [`ExchangeCatalog`], a [`PriceCache`] snapshot and a transfer
//! [`Amount`], the engine prices every transfer method an exchange offers,
//! keeps the cheapest method per exchange and ranks exchanges by effective
//! fee percentage.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`catalog`] | Exchange definitions and the built-in catalog |
//! | [`fee_rule`] | Declarative fee formulas |
//! | [`calculator`] | Fee breakdown for one exchange/method/amount |
//! | [`selector`] | Cheapest admitting method per exchange |
//! | [`ranking`] | Top-N rankings, summaries and method comparison |
//! | [`price_cache`] | Coin price snapshot |
//! | [`price_source`] | CoinGecko, file and static price providers |
//! | [`http_client`] | HTTP transport abstraction |
//! | [`retry`] | Backoff policy for price lookups |
//!
//! ## Quick Start
//!
//! ```rust
//! use feescout_core::{lowest_n_deposits_and_withdraws, Amount, ExchangeCatalog, PriceCache};
//!
//! let catalog = ExchangeCatalog::builtin();
//! let amount = Amount::new(100.0).expect("positive amount");
//! let rankings = lowest_n_deposits_and_withdraws(&catalog, &PriceCache::empty(), amount, 3);
//!
//! assert_eq!(rankings.deposits[0].exchange.name, "newton");
//! assert_eq!(rankings.deposits[0].fee, 0.59);
//! ```
//!
//! The engine is synchronous and performs no I/O. Only the
//! [`price_source`] layer talks to the network or the filesystem.

pub mod calculator;
pub mod catalog;
pub mod domain;
pub mod error;
pub mod fee_rule;
pub mod http_client;
pub mod price_cache;
pub mod price_source;
pub mod ranking;
pub mod retry;
pub mod selector;

pub use calculator::{calculate_fee, fee_breakdown, round_to_cents, FeeBreakdown};
pub use catalog::{CoinSupport, ExchangeCatalog, ExchangeInfo, Referral, TransferMethod};
pub use domain::{Amount, CoinSymbol, Direction, UtcDateTime};
pub use error::{CoreError, ValidationError};
pub use fee_rule::{Bracket, FeeRule, UpperBound};
pub use http_client::{HttpClient, HttpError, HttpRequest, HttpResponse, ReqwestHttpClient};
pub use price_cache::PriceCache;
pub use price_source::{
    CoinGeckoPriceSource, FilePriceSource, PriceRefresher, PriceSource, PriceSourceError,
    PriceSourceErrorKind, StaticPriceSource,
};
pub use ranking::{
    available_method_types, compare_method, lowest_n_deposits_and_withdraws, ranked, summarize,
    Rankings, RankingsView, DEFAULT_SUMMARY_AMOUNTS, DEFAULT_TOP_N,
};
pub use retry::{Backoff, RetryConfig};
pub use selector::{lowest_fee_method, RankedResult, RankedView, SELECTION_COIN};
