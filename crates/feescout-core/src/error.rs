use thiserror::Error;

/// Validation and contract errors exposed by `feescout-core`.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    #[error("amount must be a positive finite number, got {value}")]
    InvalidAmount { value: f64 },

    #[error("coin symbol cannot be empty")]
    EmptyCoin,
    #[error("coin symbol length {len} exceeds max {max}")]
    CoinTooLong { len: usize, max: usize },
    #[error("coin symbol must start with an ASCII letter: '{ch}'")]
    CoinInvalidStart { ch: char },
    #[error("coin symbol contains invalid character '{ch}' at index {index}")]
    CoinInvalidChar { ch: char, index: usize },

    #[error("invalid direction '{value}', expected one of deposit, withdraw")]
    InvalidDirection { value: String },

    #[error("timestamp must be RFC3339 UTC (suffix Z): '{value}'")]
    TimestampNotUtc { value: String },

    #[error("exchange name cannot be empty")]
    EmptyExchangeName,
    #[error("exchange '{name}' is defined more than once")]
    DuplicateExchange { name: String },
    #[error("exchange '{exchange}' has a method with an empty type label")]
    EmptyMethodType { exchange: String },
    #[error("exchange '{exchange}' method '{method}' has min {min} greater than max {max}")]
    InvertedMethodRange {
        exchange: String,
        method: String,
        min: f64,
        max: f64,
    },
    #[error("exchange '{exchange}' method '{method}' has a negative or non-finite bound")]
    InvalidMethodBound { exchange: String, method: String },
    #[error("exchange '{exchange}' withdraw fee for {coin} must be finite and non-negative")]
    InvalidWithdrawFee { exchange: String, coin: String },

    #[error("price for {coin} must be finite and non-negative")]
    InvalidPrice { coin: String },

    #[error("unknown exchange '{name}'")]
    UnknownExchange { name: String },
    #[error("exchange '{exchange}' has no {direction} method '{method}'")]
    UnknownMethod {
        exchange: String,
        direction: String,
        method: String,
    },
}

/// Top-level error type for core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
