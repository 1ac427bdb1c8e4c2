//! Exchange catalog.
//!
//! An [`ExchangeCatalog`] is an ordered, validated list of [`ExchangeInfo`]
//! records. Order matters: rankings break fee ties by catalog position.
//! The built-in catalog is available through [`ExchangeCatalog::builtin`];
//! custom catalogs load from JSON or YAML files with the same schema.

mod builtin;

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{Amount, CoinSymbol, CoreError, Direction, FeeRule, ValidationError};

/// Fiat channel for moving money in or out of an exchange.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferMethod {
    /// Category label such as `E-transfer` or `Wire transfer`.
    #[serde(rename = "type")]
    pub kind: String,
    pub fee: FeeRule,
    pub min: f64,
    pub max: f64,
}

impl TransferMethod {
    pub fn new(kind: impl Into<String>, fee: FeeRule, min: f64, max: f64) -> Self {
        Self {
            kind: kind.into(),
            fee,
            min,
            max,
        }
    }

    /// Both bounds are inclusive.
    pub fn admits(&self, amount: Amount) -> bool {
        let value = amount.value();
        value >= self.min && value <= self.max
    }

    fn validate(&self, exchange: &str) -> Result<(), ValidationError> {
        if self.kind.trim().is_empty() {
            return Err(ValidationError::EmptyMethodType {
                exchange: exchange.to_owned(),
            });
        }

        let bounds_valid = self.min.is_finite()
            && self.max.is_finite()
            && self.min >= 0.0
            && self.fee.is_finite();
        if !bounds_valid {
            return Err(ValidationError::InvalidMethodBound {
                exchange: exchange.to_owned(),
                method: self.kind.clone(),
            });
        }

        if self.min > self.max {
            return Err(ValidationError::InvertedMethodRange {
                exchange: exchange.to_owned(),
                method: self.kind.clone(),
                min: self.min,
                max: self.max,
            });
        }

        Ok(())
    }
}

/// Sign-up referral shown next to an exchange.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Referral {
    pub url: String,
    pub text: String,
}

/// Coins an exchange lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoinSupport {
    /// Many coins, not enumerated.
    Lots,
    Listed(BTreeSet<CoinSymbol>),
}

impl CoinSupport {
    pub fn supports(&self, coin: &CoinSymbol) -> bool {
        match self {
            Self::Lots => true,
            Self::Listed(coins) => coins.contains(coin),
        }
    }
}

/// Static fee description of one exchange.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangeInfo {
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub referral: Referral,
    #[serde(default)]
    pub deposit_methods: Vec<TransferMethod>,
    #[serde(default)]
    pub withdraw_methods: Vec<TransferMethod>,
    #[serde(default)]
    pub trading_fee: FeeRule,
    #[serde(default)]
    pub real_spread: FeeRule,
    /// Coin quantity charged when withdrawing that coin.
    #[serde(default)]
    pub withdraw_fee: BTreeMap<CoinSymbol, f64>,
    pub coins: CoinSupport,
}

impl ExchangeInfo {
    pub fn methods(&self, direction: Direction) -> &[TransferMethod] {
        match direction {
            Direction::Deposit => &self.deposit_methods,
            Direction::Withdraw => &self.withdraw_methods,
        }
    }

    pub fn method(&self, direction: Direction, kind: &str) -> Option<&TransferMethod> {
        self.methods(direction)
            .iter()
            .find(|method| method.kind.eq_ignore_ascii_case(kind))
    }

    pub fn withdraw_fee_for(&self, coin: &CoinSymbol) -> Option<f64> {
        self.withdraw_fee.get(coin).copied()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyExchangeName);
        }

        for method in self.deposit_methods.iter().chain(&self.withdraw_methods) {
            method.validate(&self.name)?;
        }

        if !self.trading_fee.is_finite() || !self.real_spread.is_finite() {
            return Err(ValidationError::InvalidMethodBound {
                exchange: self.name.clone(),
                method: String::from("trading_fee/real_spread"),
            });
        }

        for (coin, quantity) in &self.withdraw_fee {
            if !quantity.is_finite() || *quantity < 0.0 {
                return Err(ValidationError::InvalidWithdrawFee {
                    exchange: self.name.clone(),
                    coin: coin.to_string(),
                });
            }
        }

        Ok(())
    }
}

/// Ordered registry of exchanges keyed by unique name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<ExchangeInfo>", into = "Vec<ExchangeInfo>")]
pub struct ExchangeCatalog {
    exchanges: Vec<ExchangeInfo>,
}

impl ExchangeCatalog {
    /// Validate every exchange and reject duplicate names, ignoring ASCII case.
    pub fn new(exchanges: Vec<ExchangeInfo>) -> Result<Self, ValidationError> {
        let mut seen = HashSet::with_capacity(exchanges.len());
        for exchange in &exchanges {
            exchange.validate()?;
            if !seen.insert(exchange.name.to_ascii_lowercase()) {
                return Err(ValidationError::DuplicateExchange {
                    name: exchange.name.clone(),
                });
            }
        }

        Ok(Self { exchanges })
    }

    /// The hand-maintained catalog of Canadian-facing exchanges.
    pub fn builtin() -> Self {
        Self {
            exchanges: builtin::exchanges(),
        }
    }

    pub fn from_json_str(input: &str) -> Result<Self, CoreError> {
        Ok(serde_json::from_str(input)?)
    }

    pub fn from_yaml_str(input: &str) -> Result<Self, CoreError> {
        Ok(serde_yaml::from_str(input)?)
    }

    /// Load a catalog file; `.yaml`/`.yml` parse as YAML, anything else as JSON.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CoreError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let is_yaml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

        let catalog = if is_yaml {
            Self::from_yaml_str(&contents)?
        } else {
            Self::from_json_str(&contents)?
        };
        debug!(path = %path.display(), exchanges = catalog.len(), "loaded exchange catalog");
        Ok(catalog)
    }

    pub fn exchanges(&self) -> &[ExchangeInfo] {
        &self.exchanges
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ExchangeInfo> {
        self.exchanges.iter()
    }

    pub fn get(&self, name: &str) -> Option<&ExchangeInfo> {
        self.exchanges
            .iter()
            .find(|exchange| exchange.name.eq_ignore_ascii_case(name))
    }

    /// Every coin some exchange charges a withdraw fee in; the prices worth fetching.
    pub fn priced_coins(&self) -> BTreeSet<CoinSymbol> {
        self.exchanges
            .iter()
            .flat_map(|exchange| exchange.withdraw_fee.keys().cloned())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.exchanges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exchanges.is_empty()
    }
}

impl Default for ExchangeCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl TryFrom<Vec<ExchangeInfo>> for ExchangeCatalog {
    type Error = ValidationError;

    fn try_from(value: Vec<ExchangeInfo>) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ExchangeCatalog> for Vec<ExchangeInfo> {
    fn from(value: ExchangeCatalog) -> Self {
        value.exchanges
    }
}

impl<'a> IntoIterator for &'a ExchangeCatalog {
    type Item = &'a ExchangeInfo;
    type IntoIter = std::slice::Iter<'a, ExchangeInfo>;

    fn into_iter(self) -> Self::IntoIter {
        self.exchanges.iter()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn sample_exchange(name: &str) -> ExchangeInfo {
        ExchangeInfo {
            name: name.to_owned(),
            url: String::from("https://example.test"),
            referral: Referral::default(),
            deposit_methods: vec![TransferMethod::new("E-transfer", FeeRule::zero(), 10.0, 1_000.0)],
            withdraw_methods: Vec::new(),
            trading_fee: FeeRule::zero(),
            real_spread: FeeRule::Percentage(0.01),
            withdraw_fee: BTreeMap::new(),
            coins: CoinSupport::Lots,
        }
    }

    #[test]
    fn builtin_catalog_is_valid_and_ordered() {
        let builtin = ExchangeCatalog::builtin();
        let revalidated =
            ExchangeCatalog::new(builtin.exchanges().to_vec()).expect("builtin must validate");

        assert_eq!(revalidated.len(), 16);
        assert_eq!(builtin.exchanges()[0].name, "newton");
        assert_eq!(builtin.exchanges()[15].name, "crypto.com");
        assert!(builtin.get("Paytrie + Binance").is_some());
    }

    #[test]
    fn method_bounds_are_inclusive() {
        let method = TransferMethod::new("Wire transfer", FeeRule::zero(), 500.0, 10_000.0);
        assert!(method.admits(Amount::new(500.0).expect("valid")));
        assert!(method.admits(Amount::new(10_000.0).expect("valid")));
        assert!(!method.admits(Amount::new(499.99).expect("valid")));
        assert!(!method.admits(Amount::new(10_000.01).expect("valid")));
    }

    #[test]
    fn rejects_duplicate_names() {
        let err = ExchangeCatalog::new(vec![sample_exchange("a"), sample_exchange("a")])
            .expect_err("must fail");
        assert!(matches!(err, ValidationError::DuplicateExchange { .. }));
    }

    #[test]
    fn rejects_inverted_range() {
        let mut exchange = sample_exchange("inverted");
        exchange.deposit_methods[0].min = 5_000.0;
        let err = ExchangeCatalog::new(vec![exchange]).expect_err("must fail");
        assert!(matches!(err, ValidationError::InvertedMethodRange { .. }));
    }

    #[test]
    fn rejects_negative_withdraw_fee() {
        let mut exchange = sample_exchange("negative");
        exchange.withdraw_fee.insert(CoinSymbol::btc(), -0.1);
        let err = ExchangeCatalog::new(vec![exchange]).expect_err("must fail");
        assert!(matches!(err, ValidationError::InvalidWithdrawFee { .. }));
    }

    #[test]
    fn json_catalog_round_trips_and_validates() {
        let json = serde_json::to_string(&ExchangeCatalog::builtin()).expect("serialize");
        let parsed = ExchangeCatalog::from_json_str(&json).expect("parse");
        let names = |catalog: &ExchangeCatalog| {
            catalog
                .iter()
                .map(|exchange| exchange.name.clone())
                .collect::<Vec<_>>()
        };
        assert_eq!(names(&parsed), names(&ExchangeCatalog::builtin()));
        assert_eq!(
            parsed.get("gemini").map(|exchange| exchange.deposit_methods.len()),
            Some(2)
        );

        let duplicated = serde_json::to_string(&vec![sample_exchange("x"), sample_exchange("x")])
            .expect("serialize");
        assert!(ExchangeCatalog::from_json_str(&duplicated).is_err());
    }

    #[test]
    fn loads_yaml_by_extension() {
        let yaml = serde_yaml::to_string(&ExchangeCatalog::builtin()).expect("serialize");
        let mut file = tempfile::Builder::new()
            .suffix(".yaml")
            .tempfile()
            .expect("tempfile");
        file.write_all(yaml.as_bytes()).expect("write");

        let loaded = ExchangeCatalog::load(file.path()).expect("load yaml");
        assert_eq!(loaded.len(), 16);
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let catalog = ExchangeCatalog::builtin();
        let bull = catalog.get("bull BITCOIN").expect("present");
        assert!(bull.method(Direction::Withdraw, "e-transfer").is_some());
        assert!(bull.coins.supports(&CoinSymbol::btc()));
        assert!(!bull.coins.supports(&CoinSymbol::eth()));
    }

    #[test]
    fn priced_coins_come_from_withdraw_fees() {
        let coins = ExchangeCatalog::builtin().priced_coins();
        assert!(coins.contains(&CoinSymbol::btc()));
        assert!(coins.contains(&CoinSymbol::eth()));
    }
}
