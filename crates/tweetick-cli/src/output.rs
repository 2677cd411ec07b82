use serde::Serialize;
use serde_json::Value;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::cli::OutputFormat;
use crate::error::CliError;

/// Top-level document printed by every command.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub command: String,
    pub generated_at: String,
    pub warnings: Vec<String>,
    pub data: Value,
}

impl Report {
    pub fn new(command: impl Into<String>, warnings: Vec<String>, data: Value) -> Result<Self, CliError> {
        Ok(Self {
            command: command.into(),
            generated_at: OffsetDateTime::now_utc().format(&Rfc3339)?,
            warnings,
            data,
        })
    }
}

pub fn render(report: &Report, format: OutputFormat, pretty: bool) -> Result<(), CliError> {
    match format {
        OutputFormat::Json => {
            let payload = if pretty {
                serde_json::to_string_pretty(report)?
            } else {
                serde_json::to_string(report)?
            };
            println!("{payload}");
        }
        OutputFormat::Table => print!("{}", render_table(report)?),
    }

    Ok(())
}

/// Header lines, then `data.rows` as aligned columns when present.
///
/// Any other data is printed as indented JSON.
pub fn render_table(report: &Report) -> Result<String, CliError> {
    let mut out = String::new();
    out.push_str(&format!("command     : {}\n", report.command));
    out.push_str(&format!("generated_at: {}\n", report.generated_at));

    if !report.warnings.is_empty() {
        out.push_str("warnings:\n");
        for warning in &report.warnings {
            out.push_str(&format!("  - {warning}\n"));
        }
    }

    if let Value::Object(summary) = &report.data {
        for (key, value) in summary.iter().filter(|(key, _)| key.as_str() != "rows") {
            if !value.is_array() && !value.is_object() {
                out.push_str(&format!("{key:<12}: {}\n", cell(value)));
            }
        }
    }

    match report.data.get("rows").and_then(Value::as_array) {
        Some(rows) if !rows.is_empty() => out.push_str(&rows_table(rows)),
        Some(_) => out.push_str("(no rows)\n"),
        None => {
            out.push_str("data:\n");
            for line in serde_json::to_string_pretty(&report.data)?.lines() {
                out.push_str(&format!("  {line}\n"));
            }
        }
    }

    Ok(out)
}

fn rows_table(rows: &[Value]) -> String {
    let mut columns: Vec<String> = Vec::new();
    for row in rows {
        if let Some(object) = row.as_object() {
            for key in object.keys() {
                if !columns.contains(key) {
                    columns.push(key.clone());
                }
            }
        }
    }

    let cells = rows
        .iter()
        .map(|row| {
            columns
                .iter()
                .map(|column| row.get(column).map(cell).unwrap_or_default())
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();

    let widths = columns
        .iter()
        .enumerate()
        .map(|(index, column)| {
            cells
                .iter()
                .map(|row| row[index].chars().count())
                .chain([column.chars().count()])
                .max()
                .unwrap_or_default()
        })
        .collect::<Vec<_>>();

    let line = |values: &[String]| {
        values
            .iter()
            .zip(&widths)
            .map(|(value, width)| format!("{value:<width$}"))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_owned()
    };

    let mut out = String::new();
    out.push_str(&line(&columns));
    out.push('\n');
    out.push_str(
        &widths
            .iter()
            .map(|width| "-".repeat(*width))
            .collect::<Vec<_>>()
            .join("  "),
    );
    out.push('\n');
    for row in &cells {
        out.push_str(&line(row));
        out.push('\n');
    }
    out
}

fn cell(value: &Value) -> String {
    match value {
        Value::Null => String::from("-"),
        Value::String(text) => text.replace(['\n', '\r'], " "),
        other => other.to_string(),
    }
}
