//! Command-line arguments for `feescout`.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `rank` | Cheapest exchanges for one amount |
//! | `summary` | Rankings for several amounts |
//! | `methods` | Transfer method types available for an amount |
//! | `compare` | Every exchange offering one method type |
//! | `fee` | Fee breakdown for one exchange and method |
//! | `exchanges` | The exchange catalog |
//! | `prices` | The coin price snapshot |
//!
//! # Global Options
//!
//! | Option | Env | Default |
//! |--------|-----|---------|
//! | `--format` | | `json` |
//! | `--pretty` | | `false` |
//! | `--strict` | | `false` |
//! | `--catalog` | `FEESCOUT_CATALOG` | built-in catalog |
//! | `--prices-file` | `FEESCOUT_PRICES_FILE` | none |
//! | `--offline` | | `false` |
//! | `--vs-currency` | `FEESCOUT_VS_CURRENCY` | `cad` |
//! | `--coingecko-url` | `FEESCOUT_COINGECKO_URL` | public API |
//! | `--timeout-ms` | | `5000` |
//!
//! # Examples
//!
//! ```bash
//! feescout rank --amount 500
//! feescout summary --amounts 100,1000 --direction deposit --format table
//! feescout compare --amount 1000 --direction withdraw --method EFT
//! feescout fee --exchange kraken --method "Wire transfer" --amount 1000 --direction deposit
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use feescout_core::price_source::{DEFAULT_COINGECKO_URL, DEFAULT_VS_CURRENCY};
use feescout_core::DEFAULT_TOP_N;

/// Compare crypto exchange fees for buying and selling.
#[derive(Debug, Parser)]
#[command(name = "feescout", author, version, about)]
pub struct Cli {
    /// Output format.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Pretty-print JSON output.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Treat warnings as failures (exit code 5).
    #[arg(long, global = true, default_value_t = false)]
    pub strict: bool,

    /// Exchange catalog file (JSON, or YAML by extension).
    #[arg(long, global = true, env = "FEESCOUT_CATALOG")]
    pub catalog: Option<PathBuf>,

    /// Read coin prices from a JSON file instead of CoinGecko.
    #[arg(long, global = true, env = "FEESCOUT_PRICES_FILE")]
    pub prices_file: Option<PathBuf>,

    /// Never touch the network; prices are empty unless --prices-file is set.
    #[arg(long, global = true, default_value_t = false)]
    pub offline: bool,

    /// Fiat currency prices are quoted in.
    #[arg(long, global = true, env = "FEESCOUT_VS_CURRENCY", default_value = DEFAULT_VS_CURRENCY)]
    pub vs_currency: String,

    /// CoinGecko API base URL.
    #[arg(long, global = true, env = "FEESCOUT_COINGECKO_URL", default_value = DEFAULT_COINGECKO_URL)]
    pub coingecko_url: String,

    /// CoinGecko demo API key.
    #[arg(long, global = true, env = "FEESCOUT_COINGECKO_API_KEY", hide_env_values = true)]
    pub coingecko_api_key: Option<String>,

    /// Price request timeout in milliseconds.
    #[arg(long, global = true, default_value_t = 5_000)]
    pub timeout_ms: u64,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Cheapest exchanges to deposit into and withdraw from for one amount.
    ///
    ///   feescout rank --amount 500
    ///   feescout rank --amount 500 --direction withdraw --top 5
    Rank(RankArgs),

    /// Rankings for a list of amounts.
    Summary(SummaryArgs),

    /// Method types with at least one exchange admitting the amount.
    Methods(MethodsArgs),

    /// Every exchange offering one method type, cheapest first.
    Compare(CompareArgs),

    /// Fee breakdown for one exchange and method.
    Fee(FeeArgs),

    /// List the exchange catalog.
    Exchanges,

    /// Show the current coin price snapshot.
    Prices(PricesArgs),
}

#[derive(Debug, Args)]
pub struct RankArgs {
    /// Fiat amount to transfer.
    #[arg(long)]
    pub amount: f64,

    /// Number of exchanges per direction.
    #[arg(long, default_value_t = DEFAULT_TOP_N)]
    pub top: usize,

    /// Only rank one direction (deposit|buy or withdraw|sell).
    #[arg(long)]
    pub direction: Option<String>,
}

#[derive(Debug, Args)]
pub struct SummaryArgs {
    /// Comma-separated amounts; defaults to 100,500,1000,5000,15000.
    #[arg(long, value_delimiter = ',')]
    pub amounts: Vec<f64>,

    #[arg(long, default_value_t = DEFAULT_TOP_N)]
    pub top: usize,

    #[arg(long)]
    pub direction: Option<String>,
}

#[derive(Debug, Args)]
pub struct MethodsArgs {
    #[arg(long)]
    pub amount: f64,

    #[arg(long)]
    pub direction: String,
}

#[derive(Debug, Args)]
pub struct CompareArgs {
    #[arg(long)]
    pub amount: f64,

    #[arg(long)]
    pub direction: String,

    /// Method type label, matched case-insensitively (e.g. "E-transfer").
    #[arg(long)]
    pub method: String,

    /// Coin bought or sold.
    #[arg(long, default_value = "BTC")]
    pub coin: String,
}

#[derive(Debug, Args)]
pub struct FeeArgs {
    /// Exchange name, matched case-insensitively.
    #[arg(long)]
    pub exchange: String,

    #[arg(long)]
    pub method: String,

    #[arg(long)]
    pub amount: f64,

    #[arg(long)]
    pub direction: String,

    #[arg(long, default_value = "BTC")]
    pub coin: String,
}

#[derive(Debug, Args)]
pub struct PricesArgs {
    /// Comma-separated tickers; defaults to every coin with a catalog withdraw fee.
    #[arg(long, value_delimiter = ',')]
    pub coins: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rank_with_global_options_after_subcommand() {
        let cli = Cli::try_parse_from([
            "feescout", "rank", "--amount", "250", "--top", "5", "--format", "table", "--offline",
        ])
        .expect("valid arguments");

        assert_eq!(cli.format, OutputFormat::Table);
        assert!(cli.offline);
        match cli.command {
            Command::Rank(args) => {
                assert_eq!(args.amount, 250.0);
                assert_eq!(args.top, 5);
                assert!(args.direction.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn summary_amounts_split_on_commas() {
        let cli = Cli::try_parse_from(["feescout", "summary", "--amounts", "100,500,1000"])
            .expect("valid arguments");

        match cli.command {
            Command::Summary(args) => assert_eq!(args.amounts, vec![100.0, 500.0, 1_000.0]),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn compare_defaults_coin_to_btc() {
        let cli = Cli::try_parse_from([
            "feescout",
            "compare",
            "--amount",
            "1000",
            "--direction",
            "withdraw",
            "--method",
            "EFT",
        ])
        .expect("valid arguments");

        match cli.command {
            Command::Compare(args) => assert_eq!(args.coin, "BTC"),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn rank_requires_amount() {
        assert!(Cli::try_parse_from(["feescout", "rank"]).is_err());
    }

    #[test]
    fn unknown_format_is_rejected() {
        assert!(Cli::try_parse_from(["feescout", "exchanges", "--format", "xml"]).is_err());
    }
}
