use anyhow::{Context, Result, bail};
use chrono_tz::Tz;
use nanro_client::ClientConfig;
use nanro_client::config::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
use nanro_core::{DEFAULT_TIMEZONE, parse_timezone};
use nanro_statement::DEFAULT_CURRENCY_SYMBOL;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::state::{ensure_nanro_home, statements_dir};

pub const BASE_URL_ENV: &str = "NANRO_API_BASE_URL";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub api: ApiSection,
    pub statement: StatementSection,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiSection {
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatementSection {
    /// IANA zone transaction times are shown in
    pub timezone: String,
    pub currency_symbol: String,
    /// Where exported statements go (default: ~/.nanro/statements)
    pub output_dir: Option<String>,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiSection {
                base_url: DEFAULT_BASE_URL.to_string(),
                timeout_secs: DEFAULT_TIMEOUT_SECS,
            },
            statement: StatementSection {
                timezone: DEFAULT_TIMEZONE.name().to_string(),
                currency_symbol: DEFAULT_CURRENCY_SYMBOL.to_string(),
                output_dir: None,
            },
        }
    }
}

impl Config {
    pub fn client_config(&self) -> ClientConfig {
        let base_url = std::env::var(BASE_URL_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| self.api.base_url.clone());
        ClientConfig::new(base_url).with_timeout_secs(self.api.timeout_secs)
    }

    pub fn timezone(&self) -> Result<Tz> {
        match parse_timezone(&self.statement.timezone) {
            Some(tz) => Ok(tz),
            None => bail!(
                "unknown timezone '{}' in config.toml (expected an IANA name like Africa/Lagos)",
                self.statement.timezone
            ),
        }
    }

    pub fn output_dir(&self) -> Result<PathBuf> {
        match &self.statement.output_dir {
            Some(dir) if !dir.trim().is_empty() => Ok(PathBuf::from(dir)),
            _ => statements_dir(),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_nanro_home()?.join("config.toml"))
}

pub fn parse_config(s: &str) -> Result<Config> {
    toml::from_str(s).context("parse config.toml")
}

pub fn load_config() -> Result<Config> {
    let p = config_path()?;
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    parse_config(&s)
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

pub fn show_config() -> Result<()> {
    let cfg = load_config()?;
    println!("# {}", config_path()?.display());
    print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
    if let Ok(url) = std::env::var(BASE_URL_ENV) {
        println!("\n# {BASE_URL_ENV} overrides api.base_url: {url}");
    }
    Ok(())
}
