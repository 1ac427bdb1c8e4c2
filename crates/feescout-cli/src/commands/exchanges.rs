use feescout_core::{CoinSupport, ExchangeCatalog, ExchangeInfo, TransferMethod};
use serde::Serialize;

use crate::error::CliError;
use crate::output::Table;

use super::CommandResult;

#[derive(Debug, Serialize)]
struct ExchangeSummary<'a> {
    name: &'a str,
    url: &'a str,
    referral: &'a str,
    deposit_methods: Vec<&'a str>,
    withdraw_methods: Vec<&'a str>,
    coins: &'a CoinSupport,
}

impl<'a> ExchangeSummary<'a> {
    fn new(exchange: &'a ExchangeInfo) -> Self {
        Self {
            name: &exchange.name,
            url: &exchange.url,
            referral: &exchange.referral.url,
            deposit_methods: kinds(&exchange.deposit_methods),
            withdraw_methods: kinds(&exchange.withdraw_methods),
            coins: &exchange.coins,
        }
    }
}

fn kinds(methods: &[TransferMethod]) -> Vec<&str> {
    methods.iter().map(|method| method.kind.as_str()).collect()
}

pub fn run(catalog: &ExchangeCatalog) -> Result<CommandResult, CliError> {
    let summaries = catalog.iter().map(ExchangeSummary::new).collect::<Vec<_>>();

    let mut table = Table::new(
        format!("{} exchanges", summaries.len()),
        vec!["exchange", "deposit", "withdraw", "url"],
    );
    for summary in &summaries {
        table.push_row(vec![
            summary.name.to_owned(),
            summary.deposit_methods.join(", "),
            summary.withdraw_methods.join(", "),
            summary.url.to_owned(),
        ]);
    }

    Ok(CommandResult::ok(serde_json::to_value(&summaries)?).with_table(table))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_exchanges_in_catalog_order() {
        let result = run(&ExchangeCatalog::builtin()).expect("exchanges");
        let entries = result.data.as_array().expect("array");

        assert_eq!(entries.len(), 16);
        assert_eq!(entries[0]["name"], "newton");
        assert_eq!(entries[0]["deposit_methods"][0], "E-transfer");
    }
}
