use std::fmt::Write as _;

use serde_json::Value;

use crate::cli::OutputFormat;
use crate::error::CliError;
use crate::metadata::Envelope;

/// Plain-text table for `--format table`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    title: String,
    headers: Vec<&'static str>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(title: impl Into<String>, headers: Vec<&'static str>) -> Self {
        Self {
            title: title.into(),
            headers,
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    pub fn render(&self) -> String {
        let mut widths = self.headers.iter().map(|h| h.len()).collect::<Vec<_>>();
        for row in &self.rows {
            for (index, cell) in row.iter().enumerate() {
                if let Some(width) = widths.get_mut(index) {
                    *width = (*width).max(cell.chars().count());
                }
            }
        }

        let mut out = String::new();
        let _ = writeln!(out, "{}", self.title);
        let header = self.headers.iter().map(|h| h.to_string()).collect::<Vec<_>>();
        push_line(&mut out, &header, &widths);
        let rule = widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>();
        push_line(&mut out, &rule, &widths);
        if self.rows.is_empty() {
            out.push_str("(none)\n");
        }
        for row in &self.rows {
            push_line(&mut out, row, &widths);
        }
        out
    }
}

fn push_line(out: &mut String, cells: &[String], widths: &[usize]) {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ");
    out.push_str(line.trim_end());
    out.push('\n');
}

/// Fee percentage as shown to users.
pub fn percent(fee: f64) -> String {
    format!("{fee:.2}%")
}

pub fn render(
    envelope: &Envelope<Value>,
    tables: &[Table],
    format: OutputFormat,
    pretty: bool,
) -> Result<(), CliError> {
    match format {
        OutputFormat::Json => {
            let payload = if pretty {
                serde_json::to_string_pretty(envelope)?
            } else {
                serde_json::to_string(envelope)?
            };
            println!("{payload}");
        }
        OutputFormat::Table => print!("{}", render_table(envelope, tables)?),
    }

    Ok(())
}

fn render_table(envelope: &Envelope<Value>, tables: &[Table]) -> Result<String, CliError> {
    let mut out = String::new();
    let _ = writeln!(out, "request_id  : {}", envelope.meta.request_id);
    let _ = writeln!(out, "generated_at: {}", envelope.meta.generated_at);
    let _ = writeln!(out, "prices      : {}", envelope.meta.price_source);
    if let Some(as_of) = envelope.meta.prices_as_of {
        let _ = writeln!(out, "prices_as_of: {as_of}");
    }
    if !envelope.meta.warnings.is_empty() {
        out.push_str("warnings:\n");
        for warning in &envelope.meta.warnings {
            let _ = writeln!(out, "  - {warning}");
        }
    }

    if tables.is_empty() {
        out.push_str("data:\n");
        for line in serde_json::to_string_pretty(&envelope.data)?.lines() {
            let _ = writeln!(out, "  {line}");
        }
        return Ok(out);
    }

    for table in tables {
        out.push('\n');
        out.push_str(&table.render());
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::EnvelopeMeta;

    #[test]
    fn table_columns_align_to_widest_cell() {
        let mut table = Table::new("deposit @ 100", vec!["#", "exchange", "fee"]);
        table.push_row(vec!["1".into(), "newton".into(), percent(0.59)]);
        table.push_row(vec!["2".into(), "crypto.com".into(), percent(1.64)]);

        assert_eq!(
            table.render(),
            "deposit @ 100\n\
             #  exchange    fee\n\
             -  ----------  -----\n\
             1  newton      0.59%\n\
             2  crypto.com  1.64%\n"
        );
    }

    #[test]
    fn empty_table_says_none() {
        let table = Table::new("withdraw @ 1", vec!["exchange"]);
        assert!(table.render().ends_with("(none)\n"));
    }

    #[test]
    fn table_mode_lists_warnings_before_tables() {
        let mut meta = EnvelopeMeta::new("static");
        meta.push_warning("no prices");
        let envelope = Envelope::new(meta, Value::Null);
        let table = Table::new("t", vec!["a"]);

        let rendered = render_table(&envelope, &[table]).expect("render");
        let warning_at = rendered.find("no prices").expect("warning shown");
        let table_at = rendered.find("\nt\n").expect("table shown");
        assert!(warning_at < table_at);
    }
}
