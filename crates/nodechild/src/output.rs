use std::io::IsTerminal;
use std::time::{SystemTime, UNIX_EPOCH};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use nodechild_channel::is_internal;
use serde::Serialize;
use serde_json::Value;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
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

#[derive(Serialize)]
struct MessageOutput<'a> {
    schema_id: &'a str,
    size: usize,
    internal: bool,
    message: &'a Value,
    timestamp: String,
}

pub fn print_message(message: &Value, format: OutputFormat) {
    let rendered = message.to_string();
    match format {
        OutputFormat::Json => {
            let out = MessageOutput {
                schema_id:
                    "https://schemas.3leaps.dev/nodechild/cli/v1/message-received.schema.json",
                size: rendered.len(),
                internal: is_internal(message),
                message,
                timestamp: now_unix_seconds(),
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["SIZE", "INTERNAL", "MESSAGE"])
                .add_row(vec![
                    rendered.len().to_string(),
                    is_internal(message).to_string(),
                    rendered.clone(),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!(
                "size={} internal={} message={}",
                rendered.len(),
                is_internal(message),
                rendered
            );
        }
        OutputFormat::Raw => {
            println!("{rendered}");
        }
    }
}

fn now_unix_seconds() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs().to_string())
        .unwrap_or_else(|_| "0".to_string())
}
