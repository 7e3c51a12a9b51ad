use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::state::ensure_obra_home;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub placeholder: PlaceholderSection,
    pub display: DisplaySection,
}

/// Range for synthetic trend values rendered for weeks with no recorded PCP.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceholderSection {
    pub low: f64,
    pub high: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplaySection {
    /// Round percentages for display. Aggregation itself is always exact.
    pub rounded: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            placeholder: PlaceholderSection {
                low: 10.0,
                high: 80.0,
            },
            display: DisplaySection { rounded: true },
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_obra_home()?.join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    let p = config_path()?;
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    Ok(toml::from_str(&s).context("parse config.toml")?)
}

pub fn save_config(cfg: &Config) -> Result<()> {
    let p = config_path()?;
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    let cfg = Config::default();
    save_config(&cfg)?;
    println!("Wrote {}", p.display());
    Ok(())
}
