//! Price snapshot providers.
//!
//! The fee engine never fetches prices itself. A [`PriceSource`] produces a
//! [`PriceCache`] snapshot on demand and a [`PriceRefresher`] keeps the most
//! recent one around for callers that rank repeatedly.
//!
//! | Source | Backing |
//! |--------|---------|
//! | [`CoinGeckoPriceSource`] | CoinGecko `simple/price` over [`HttpClient`](crate::HttpClient) |
//! | [`FilePriceSource`] | local JSON file |
//! | [`StaticPriceSource`] | in-memory snapshot |

mod coingecko;
mod file;
mod fixed;
mod refresher;

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;

use crate::{CoinSymbol, PriceCache};

pub use coingecko::{coingecko_id, CoinGeckoPriceSource, DEFAULT_COINGECKO_URL, DEFAULT_VS_CURRENCY};
pub use file::FilePriceSource;
pub use fixed::StaticPriceSource;
pub use refresher::PriceRefresher;

/// Boxed future returned by [`PriceSource::fetch`].
pub type PriceFuture<'a> = Pin<Box<dyn Future<Output = Result<PriceCache, PriceSourceError>> + Send + 'a>>;

/// Anything able to produce a coin -> fiat price snapshot.
pub trait PriceSource: Send + Sync {
    /// Short label reported in output metadata.
    fn name(&self) -> &'static str;

    /// Prices for `coins`. Coins the source knows nothing about are simply
    /// absent from the snapshot.
    fn fetch<'a>(&'a self, coins: &'a [CoinSymbol]) -> PriceFuture<'a>;
}

/// Failure classification for price lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceSourceErrorKind {
    Unavailable,
    RateLimited,
    InvalidResponse,
    Io,
}

/// Structured price source error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceSourceError {
    kind: PriceSourceErrorKind,
    message: String,
    retryable: bool,
}

impl PriceSourceError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            kind: PriceSourceErrorKind::Unavailable,
            message: message.into(),
            retryable: true,
        }
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self {
            kind: PriceSourceErrorKind::RateLimited,
            message: message.into(),
            retryable: true,
        }
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self {
            kind: PriceSourceErrorKind::InvalidResponse,
            message: message.into(),
            retryable: false,
        }
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self {
            kind: PriceSourceErrorKind::Io,
            message: message.into(),
            retryable: false,
        }
    }

    /// Same error with the retry decision overridden.
    pub fn with_retryable(mut self, retryable: bool) -> Self {
        self.retryable = retryable;
        self
    }

    pub const fn kind(&self) -> PriceSourceErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn retryable(&self) -> bool {
        self.retryable
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            PriceSourceErrorKind::Unavailable => "price_source.unavailable",
            PriceSourceErrorKind::RateLimited => "price_source.rate_limited",
            PriceSourceErrorKind::InvalidResponse => "price_source.invalid_response",
            PriceSourceErrorKind::Io => "price_source.io",
        }
    }
}

impl Display for PriceSourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for PriceSourceError {}
