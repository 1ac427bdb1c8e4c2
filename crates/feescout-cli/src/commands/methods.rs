use feescout_core::{available_method_types, Direction, ExchangeCatalog};
use serde::Serialize;

use crate::cli::MethodsArgs;
use crate::error::CliError;
use crate::output::Table;

use super::{parse_amount, parse_direction, CommandResult};

#[derive(Debug, Serialize)]
struct MethodsData {
    amount: f64,
    direction: Direction,
    methods: Vec<String>,
}

pub fn run(args: &MethodsArgs, catalog: &ExchangeCatalog) -> Result<CommandResult, CliError> {
    let amount = parse_amount(args.amount)?;
    let direction = parse_direction(&args.direction)?;
    let methods = available_method_types(catalog, direction, amount);

    let mut table = Table::new(format!("{direction} methods @ {amount}"), vec!["method"]);
    for method in &methods {
        table.push_row(vec![method.clone()]);
    }

    let data = serde_json::to_value(MethodsData {
        amount: amount.value(),
        direction,
        methods,
    })?;
    Ok(CommandResult::ok(data).with_table(table))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_methods_for_the_direction() {
        let args = MethodsArgs {
            amount: 100.0,
            direction: String::from("deposit"),
        };
        let result = run(&args, &ExchangeCatalog::builtin()).expect("methods");

        assert_eq!(result.data["direction"], "deposit");
        assert_eq!(result.data["methods"][0], "E-transfer");
    }
}
