//! Runtime settings resolved from flags and `FEESCOUT_*` environment variables.

use std::path::PathBuf;
use std::sync::Arc;

use feescout_core::{
    CoinGeckoPriceSource, ExchangeCatalog, FilePriceSource, PriceSource, ReqwestHttpClient,
    StaticPriceSource,
};
use tracing::debug;

use crate::cli::Cli;
use crate::error::CliError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub catalog_path: Option<PathBuf>,
    pub prices_file: Option<PathBuf>,
    pub offline: bool,
    pub vs_currency: String,
    pub coingecko_url: String,
    pub coingecko_api_key: Option<String>,
    pub timeout_ms: u64,
    pub strict: bool,
}

impl Settings {
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            catalog_path: cli.catalog.clone(),
            prices_file: cli.prices_file.clone(),
            offline: cli.offline,
            vs_currency: cli.vs_currency.to_ascii_lowercase(),
            coingecko_url: cli.coingecko_url.clone(),
            coingecko_api_key: cli
                .coingecko_api_key
                .clone()
                .filter(|key| !key.trim().is_empty()),
            timeout_ms: cli.timeout_ms,
            strict: cli.strict,
        }
    }

    /// Catalog from `--catalog`, or the built-in one.
    pub fn load_catalog(&self) -> Result<ExchangeCatalog, CliError> {
        match &self.catalog_path {
            Some(path) => Ok(ExchangeCatalog::load(path)?),
            None => Ok(ExchangeCatalog::builtin()),
        }
    }

    /// A prices file wins over the network; offline without a file prices nothing.
    pub fn price_source(&self) -> Arc<dyn PriceSource> {
        if let Some(path) = &self.prices_file {
            debug!(path = %path.display(), "using price file");
            return Arc::new(FilePriceSource::new(path.clone()));
        }

        if self.offline {
            debug!("offline; using empty price snapshot");
            return Arc::new(StaticPriceSource::empty());
        }

        let mut source = CoinGeckoPriceSource::new(Arc::new(ReqwestHttpClient::new()))
            .with_base_url(self.coingecko_url.as_str())
            .with_vs_currency(self.vs_currency.as_str())
            .with_timeout_ms(self.timeout_ms);
        if let Some(key) = &self.coingecko_api_key {
            source = source.with_api_key(key.as_str());
        }
        Arc::new(source)
    }
}
