use feescout_core::{CoreError, PriceSourceError, ValidationError};
use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("catalog error: {0}")]
    Catalog(#[from] CoreError),

    #[error("price source error: {0}")]
    PriceSource(#[from] PriceSourceError),

    #[error("strict mode failed: warnings={warning_count}")]
    StrictModeViolation { warning_count: usize },

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Validation(_) => 2,
            Self::Catalog(CoreError::Validation(_)) => 2,
            Self::Catalog(CoreError::Serialization(_) | CoreError::Yaml(_)) => 4,
            Self::Catalog(CoreError::Io(_)) => 10,
            Self::PriceSource(_) => 3,
            Self::Serialization(_) => 4,
            Self::StrictModeViolation { .. } => 5,
            Self::Io(_) => 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_follow_error_category() {
        let invalid = CliError::from(ValidationError::InvalidAmount { value: 0.0 });
        let price = CliError::from(PriceSourceError::rate_limited("429"));
        let strict = CliError::StrictModeViolation { warning_count: 1 };
        let io = CliError::from(std::io::Error::other("disk"));

        assert_eq!(invalid.exit_code(), 2);
        assert_eq!(price.exit_code(), 3);
        assert_eq!(strict.exit_code(), 5);
        assert_eq!(io.exit_code(), 10);
    }

    #[test]
    fn malformed_catalog_maps_to_serialization_code() {
        let error = feescout_core::ExchangeCatalog::from_json_str("{not json")
            .map_err(CliError::from)
            .expect_err("malformed");
        assert_eq!(error.exit_code(), 4);
    }
}
