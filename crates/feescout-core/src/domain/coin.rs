use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

const MAX_COIN_LEN: usize = 10;

/// Normalized coin ticker such as `BTC` or `ETH`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CoinSymbol(String);

impl CoinSymbol {
    /// Parse and normalize a ticker to uppercase.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyCoin);
        }

        let normalized = trimmed.to_ascii_uppercase();
        let len = normalized.chars().count();
        if len > MAX_COIN_LEN {
            return Err(ValidationError::CoinTooLong {
                len,
                max: MAX_COIN_LEN,
            });
        }

        if let Some(first) = normalized.chars().next() {
            if !first.is_ascii_alphabetic() {
                return Err(ValidationError::CoinInvalidStart { ch: first });
            }
        }

        for (index, ch) in normalized.chars().enumerate() {
            if !ch.is_ascii_alphanumeric() {
                return Err(ValidationError::CoinInvalidChar { ch, index });
            }
        }

        Ok(Self(normalized))
    }

    /// For tickers written into the source, which are known to be valid.
    pub(crate) fn from_static(ticker: &'static str) -> Self {
        debug_assert!(Self::parse(ticker).is_ok(), "invalid ticker {ticker}");
        Self(ticker.to_owned())
    }

    pub fn btc() -> Self {
        Self(String::from("BTC"))
    }

    pub fn eth() -> Self {
        Self(String::from("ETH"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for CoinSymbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CoinSymbol {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

impl TryFrom<String> for CoinSymbol {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl TryFrom<&str> for CoinSymbol {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<CoinSymbol> for String {
    fn from(value: CoinSymbol) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_normalizes_coin() {
        let parsed = CoinSymbol::parse(" eth ").expect("coin should parse");
        assert_eq!(parsed.as_str(), "ETH");
    }

    #[test]
    fn rejects_invalid_start() {
        let err = CoinSymbol::parse("1INCH").expect_err("must fail");
        assert!(matches!(err, ValidationError::CoinInvalidStart { .. }));
    }

    #[test]
    fn rejects_invalid_chars() {
        let err = CoinSymbol::parse("BTC-USD").expect_err("must fail");
        assert!(matches!(err, ValidationError::CoinInvalidChar { .. }));
    }
}
