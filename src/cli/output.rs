use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Serialize;

#[derive(Clone, Debug, ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
}

/// Prints `value` as pretty JSON. Returns false for human output so the
/// caller renders its own text.
pub fn emit_structured<T: Serialize>(format: &OutputFormat, value: &T) -> Result<bool> {
    match format {
        OutputFormat::Human => Ok(false),
        OutputFormat::Json => {
            let text = serde_json::to_string_pretty(value).context("failed to encode output")?;
            println!("{text}");
            Ok(true)
        }
    }
}
