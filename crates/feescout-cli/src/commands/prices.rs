use std::collections::BTreeMap;

use feescout_core::{PriceCache, UtcDateTime};
use serde::Serialize;

use crate::config::Settings;
use crate::error::CliError;
use crate::output::Table;

use super::CommandResult;

#[derive(Debug, Serialize)]
struct PricesData<'a> {
    vs_currency: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_updated: Option<UtcDateTime>,
    prices: BTreeMap<&'a str, f64>,
}

pub fn run(cache: &PriceCache, settings: &Settings) -> Result<CommandResult, CliError> {
    let prices = cache
        .prices()
        .iter()
        .map(|(coin, price)| (coin.as_str(), *price))
        .collect::<BTreeMap<_, _>>();

    let mut table = Table::new(
        format!("prices in {}", settings.vs_currency.to_ascii_uppercase()),
        vec!["coin", "price"],
    );
    for (coin, price) in &prices {
        table.push_row(vec![(*coin).to_owned(), format!("{price:.2}")]);
    }

    let data = serde_json::to_value(PricesData {
        vs_currency: &settings.vs_currency,
        last_updated: cache.last_updated(),
        prices,
    })?;
    Ok(CommandResult::ok(data).with_table(table))
}
