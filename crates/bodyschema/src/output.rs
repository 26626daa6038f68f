use std::io::IsTerminal;

use bodyschema_middleware::Rejection;
use bodyschema_param::{Body, Value};
use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

/// One declared field as `inspect` reports it.
#[derive(Serialize)]
pub struct FieldRow {
    pub name: String,
    pub external: String,
    #[serde(rename = "type")]
    pub type_name: Option<String>,
    pub default: serde_json::Value,
    pub options: serde_json::Map<String, serde_json::Value>,
}

#[derive(Serialize)]
pub struct InspectOutput {
    pub fields: Vec<FieldRow>,
    pub disallowed: Vec<String>,
}

pub fn print_body(body: &Body, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            println!("{}", Value::Object(body.clone()).to_json());
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["FIELD", "TYPE", "VALUE"]);
            for (name, value) in body {
                table.add_row(vec![
                    name.clone(),
                    value.kind_name().to_string(),
                    value_cell(value),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            for (name, value) in body {
                println!("{name}={}", value_cell(value));
            }
        }
    }
}

pub fn print_rejection(rejection: &Rejection, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            println!("{}", rejection.to_json());
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["STATUS", "PARAM", "VALIDATOR", "MESSAGE"])
                .add_row(vec![
                    rejection.status.to_string(),
                    rejection.error.param.clone(),
                    rejection.error.name.clone(),
                    rejection.message().to_string(),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!(
                "rejected status={} param={} validator={}: {}",
                rejection.status,
                rejection.error.param,
                rejection.error.name,
                rejection.message()
            );
        }
    }
}

pub fn print_inspect(out: &InspectOutput, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string(out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["FIELD", "BODY KEY", "TYPE", "DEFAULT", "OPTIONS"]);
            for row in &out.fields {
                table.add_row(vec![
                    row.name.clone(),
                    row.external.clone(),
                    row.type_name.clone().unwrap_or_else(|| "-".to_string()),
                    json_cell(&row.default),
                    options_cell(&row.options),
                ]);
            }
            println!("{table}");
            if !out.disallowed.is_empty() {
                println!("Disallowed: {}", out.disallowed.join(", "));
            }
        }
        OutputFormat::Pretty => {
            for row in &out.fields {
                let alias = if row.name == row.external {
                    String::new()
                } else {
                    format!(" as {}", row.external)
                };
                println!(
                    "{}{alias}: {} default={} {}",
                    row.name,
                    row.type_name.as_deref().unwrap_or("any"),
                    json_cell(&row.default),
                    options_cell(&row.options)
                );
            }
            for name in &out.disallowed {
                println!("{name}: disallowed");
            }
        }
    }
}

fn value_cell(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_json().to_string(),
    }
}

fn json_cell(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => "-".to_string(),
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn options_cell(options: &serde_json::Map<String, serde_json::Value>) -> String {
    options
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join(" ")
}
