//! Backend JSON export parser.
//!
//! Exports are a JSON array of task rows in the backend's camelCase shape.
//! The whole parse aborts on the first invalid record; partial ingests would
//! hide upstream data-integrity problems.

use anyhow::{Context, Result};
use std::path::Path;

use obra_core::Task;

use crate::types::RawTaskRecord;

pub fn parse_json_export(path: impl AsRef<Path>) -> Result<Vec<Task>> {
    let text = std::fs::read_to_string(path.as_ref())
        .with_context(|| format!("reading {}", path.as_ref().display()))?;
    parse_json_export_str(&text)
}

pub fn parse_json_export_str(text: &str) -> Result<Vec<Task>> {
    let raws: Vec<RawTaskRecord> =
        serde_json::from_str(text).context("parsing task export JSON")?;

    raws.into_iter()
        .enumerate()
        .map(|(i, raw)| {
            let id = raw.id.clone();
            raw.into_task()
                .with_context(|| format!("record #{i} (id '{id}')"))
        })
        .collect()
}
