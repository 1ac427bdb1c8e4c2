mod compare;
mod exchanges;
mod fee;
mod methods;
mod prices;
mod rank;
mod summary;

use std::sync::Arc;

use feescout_core::{
    Amount, CoinSymbol, Direction, PriceCache, PriceRefresher, RankedResult, SELECTION_COIN,
};
use serde_json::Value;
use tracing::warn;

use crate::cli::Command;
use crate::config::Settings;
use crate::error::CliError;
use crate::metadata::{Envelope, EnvelopeMeta};
use crate::output::{percent, Table};

/// What a command produced, before it is wrapped in an envelope.
pub struct CommandResult {
    pub data: Value,
    pub tables: Vec<Table>,
    pub warnings: Vec<String>,
}

impl CommandResult {
    pub fn ok(data: Value) -> Self {
        Self {
            data,
            tables: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn with_table(mut self, table: Table) -> Self {
        self.tables.push(table);
        self
    }

    pub fn with_tables(mut self, tables: impl IntoIterator<Item = Table>) -> Self {
        self.tables.extend(tables);
        self
    }

    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }
}

/// Envelope plus the tables used by `--format table`.
pub struct Report {
    pub envelope: Envelope<Value>,
    pub tables: Vec<Table>,
}

/// Snapshot handed to the fee engine together with where it came from.
pub struct LoadedPrices {
    pub cache: Arc<PriceCache>,
    pub source: &'static str,
    pub warnings: Vec<String>,
}

pub async fn run(command: &Command, settings: &Settings) -> Result<Report, CliError> {
    let catalog = settings.load_catalog()?;

    let (result, prices) = match command {
        Command::Rank(args) => {
            let prices = load_prices(settings, vec![selection_coin()?]).await?;
            (rank::run(args, &catalog, &prices.cache)?, Some(prices))
        }
        Command::Summary(args) => {
            let prices = load_prices(settings, vec![selection_coin()?]).await?;
            (summary::run(args, &catalog, &prices.cache)?, Some(prices))
        }
        Command::Methods(args) => (methods::run(args, &catalog)?, None),
        Command::Compare(args) => {
            let coin = CoinSymbol::parse(&args.coin)?;
            let prices = load_prices(settings, vec![coin.clone()]).await?;
            (compare::run(args, &coin, &catalog, &prices.cache)?, Some(prices))
        }
        Command::Fee(args) => {
            let coin = CoinSymbol::parse(&args.coin)?;
            let prices = load_prices(settings, vec![coin.clone()]).await?;
            (fee::run(args, &coin, &catalog, &prices.cache)?, Some(prices))
        }
        Command::Exchanges => (exchanges::run(&catalog)?, None),
        Command::Prices(args) => {
            let coins = if args.coins.is_empty() {
                catalog.priced_coins().into_iter().collect()
            } else {
                args.coins
                    .iter()
                    .map(|raw| CoinSymbol::parse(raw))
                    .collect::<Result<Vec<_>, _>>()?
            };
            let prices = load_prices(settings, coins).await?;
            (prices::run(&prices.cache, settings)?, Some(prices))
        }
    };

    let CommandResult {
        data,
        tables,
        warnings,
    } = result;

    let mut meta = match &prices {
        Some(prices) => {
            EnvelopeMeta::new(prices.source).with_prices_as_of(prices.cache.last_updated())
        }
        None => EnvelopeMeta::new("none"),
    };
    for warning in prices.into_iter().flat_map(|prices| prices.warnings) {
        meta.push_warning(warning);
    }
    for warning in warnings {
        meta.push_warning(warning);
    }

    Ok(Report {
        envelope: Envelope::new(meta, data),
        tables,
    })
}

/// Fetch a snapshot for `coins`. Without `--strict` a failed fetch degrades
/// to an empty snapshot and a warning.
pub async fn load_prices(
    settings: &Settings,
    coins: Vec<CoinSymbol>,
) -> Result<LoadedPrices, CliError> {
    let refresher = PriceRefresher::new(settings.price_source(), coins);
    let source = refresher.source_name();

    let cache = match refresher.refresh().await {
        Ok(cache) => cache,
        Err(error) if settings.strict => return Err(error.into()),
        Err(error) => {
            warn!(
                source,
                code = error.code(),
                %error,
                "price fetch failed; continuing without prices"
            );
            return Ok(LoadedPrices {
                cache: Arc::new(PriceCache::empty()),
                source,
                warnings: vec![format!(
                    "price fetch from {source} failed ({error}); coin withdraw fees count as zero"
                )],
            });
        }
    };

    let missing = refresher
        .coins()
        .iter()
        .filter(|coin| cache.price(coin).is_none())
        .map(CoinSymbol::as_str)
        .collect::<Vec<_>>();
    let warnings = if missing.is_empty() {
        Vec::new()
    } else {
        vec![format!(
            "no price for {}; their withdraw fees count as zero",
            missing.join(",")
        )]
    };

    Ok(LoadedPrices {
        cache,
        source,
        warnings,
    })
}

fn selection_coin() -> Result<CoinSymbol, CliError> {
    Ok(CoinSymbol::parse(SELECTION_COIN)?)
}

pub(crate) fn parse_amount(value: f64) -> Result<Amount, CliError> {
    Ok(Amount::new(value)?)
}

pub(crate) fn parse_direction(raw: &str) -> Result<Direction, CliError> {
    Ok(raw.parse::<Direction>()?)
}

/// One ranked list as a table.
pub(crate) fn ranked_table(title: String, results: &[RankedResult<'_>]) -> Table {
    let mut table = Table::new(title, vec!["#", "exchange", "method", "fee"]);
    for (position, result) in results.iter().enumerate() {
        table.push_row(vec![
            (position + 1).to_string(),
            result.exchange.name.clone(),
            result.method.kind.clone(),
            percent(result.fee),
        ]);
    }
    table
}

/// `Some(direction)` restricts output to that side; `None` means both.
pub(crate) fn directions(filter: Option<Direction>) -> Vec<Direction> {
    match filter {
        Some(direction) => vec![direction],
        None => Direction::ALL.to_vec(),
    }
}

pub(crate) fn parse_direction_filter(raw: Option<&str>) -> Result<Option<Direction>, CliError> {
    raw.map(parse_direction).transpose()
}
