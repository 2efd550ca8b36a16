use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::state::ensure_tally_home;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub log: LogSection,
    #[serde(default)]
    pub entities: EntitiesSection,
    #[serde(default)]
    pub output: OutputSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogSection {
    /// trace | debug | info | warn | error (RUST_LOG wins when set)
    pub level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntitiesSection {
    /// Annotate PDF/DOCX text with named entities
    pub enabled: bool,
    /// Words marking a capitalized span as an organization
    pub organization_markers: Vec<String>,
    /// Words marking a capitalized span as a place
    pub location_markers: Vec<String>,
    /// Shortest span (in words) reported as an entity
    pub min_tokens: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputSection {
    pub format: OutputFormat,
    /// Narration column width in the table view
    pub narration_width: usize,
}

impl Default for LogSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Default for EntitiesSection {
    fn default() -> Self {
        Self {
            enabled: true,
            organization_markers: [
                "BANK", "LTD", "LIMITED", "PVT", "INC", "CORP", "CORPORATION", "COMPANY",
                "SERVICES", "PAYMENTS", "INDIA", "TECHNOLOGIES", "FINANCE",
            ]
            .map(String::from)
            .to_vec(),
            location_markers: [
                "MUMBAI", "DELHI", "BANGALORE", "BENGALURU", "CHENNAI", "KOLKATA", "HYDERABAD",
                "PUNE", "AHMEDABAD", "JAIPUR",
            ]
            .map(String::from)
            .to_vec(),
            min_tokens: 2,
        }
    }
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            format: OutputFormat::Table,
            narration_width: 48,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.entities.min_tokens == 0 {
            bail!("entities.min_tokens must be at least 1");
        }
        if self.output.narration_width < 8 {
            bail!("output.narration_width must be at least 8");
        }
        Ok(())
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_tally_home()?.join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    let p = config_path()?;
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    parse_config(&s).with_context(|| format!("parse {}", p.display()))
}

pub fn parse_config(s: &str) -> Result<Config> {
    let cfg: Config = toml::from_str(s)?;
    cfg.validate()?;
    Ok(cfg)
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
    save_config(&Config::default())?;
    println!("Wrote {}", p.display());
    Ok(())
}
