use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

use obra_core::HistoryMap;

pub fn obra_home() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".obra"))
}

pub fn ensure_obra_home() -> Result<PathBuf> {
    let dir = obra_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

pub fn history_path() -> Result<PathBuf> {
    Ok(ensure_obra_home()?.join("history.json"))
}

/// Recorded week percentages persisted between runs. Missing file means no
/// history yet.
pub fn read_history() -> Result<HistoryMap> {
    let p = history_path()?;
    if !p.exists() {
        return Ok(HistoryMap::new());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    Ok(serde_json::from_str(&s).with_context(|| format!("parse {}", p.display()))?)
}

pub fn write_history(history: &HistoryMap) -> Result<()> {
    let p = history_path()?;
    let json = serde_json::to_string_pretty(history)?;
    fs::write(&p, json).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}
