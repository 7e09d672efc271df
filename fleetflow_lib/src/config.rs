//! Runtime configuration: defaults, an optional TOML file, then
//! `FLEETFLOW_*` environment overrides.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use fleetflow_api::session::FileTokenStore;
use fleetflow_api::{Client, DEFAULT_BASE_URL};
use serde::Deserialize;

use crate::error::FleetError;
use crate::print::DEFAULT_ITEMS_PER_PAGE;

/// File looked up in the working directory when `FLEETFLOW_CONFIG` is unset.
pub const CONFIG_FILE: &str = "fleetflow.toml";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub base_url: String,
    pub token_file: PathBuf,
    pub print_page_size: usize,
    pub search_debounce_ms: u64,
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            token_file: default_token_file(),
            print_page_size: DEFAULT_ITEMS_PER_PAGE,
            search_debounce_ms: 300,
            timeout_secs: 30,
        }
    }
}

impl Config {
    pub fn from_toml_str(contents: &str) -> Result<Self, FleetError> {
        toml::from_str(contents).map_err(|e| FleetError::Config(e.to_string()))
    }

    pub fn from_file(path: &Path) -> Result<Self, FleetError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| FleetError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&contents)
            .map_err(|e| FleetError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Reads the config file named by `FLEETFLOW_CONFIG`, else
    /// `fleetflow.toml` if it exists, else defaults; then applies the
    /// environment.
    pub fn load() -> Result<Self, FleetError> {
        let mut config = match std::env::var("FLEETFLOW_CONFIG") {
            Ok(path) => Self::from_file(Path::new(&path))?,
            Err(_) if Path::new(CONFIG_FILE).exists() => Self::from_file(Path::new(CONFIG_FILE))?,
            Err(_) => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Applies `FLEETFLOW_*` overrides read through `lookup`. Values that do
    /// not parse are ignored with a warning.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("FLEETFLOW_BASE_URL").filter(|v| !v.trim().is_empty()) {
            self.base_url = url.trim().to_string();
        }
        if let Some(path) = lookup("FLEETFLOW_TOKEN_FILE").filter(|v| !v.trim().is_empty()) {
            self.token_file = PathBuf::from(path.trim());
        }
        override_parsed(&lookup, "FLEETFLOW_PRINT_PAGE_SIZE", &mut self.print_page_size);
        override_parsed(&lookup, "FLEETFLOW_SEARCH_DEBOUNCE_MS", &mut self.search_debounce_ms);
        override_parsed(&lookup, "FLEETFLOW_TIMEOUT_SECS", &mut self.timeout_secs);
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    /// Builds a client whose session token persists in `token_file`.
    pub fn build_client(&self) -> Result<Client, FleetError> {
        let client = Client::with_timeout(&self.base_url, self.timeout())?
            .with_token_store(Arc::new(FileTokenStore::new(&self.token_file)));
        Ok(client)
    }
}

fn override_parsed<F, T>(lookup: &F, key: &str, target: &mut T)
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    if let Some(raw) = lookup(key) {
        match raw.trim().parse::<T>() {
            Ok(value) => *target = value,
            Err(_) => tracing::warn!("Ignoring {}={:?}: not a valid number", key, raw),
        }
    }
}

fn default_token_file() -> PathBuf {
    match std::env::var_os("HOME") {
        Some(home) => PathBuf::from(home).join(".fleetflow").join("token"),
        None => PathBuf::from(".fleetflow-token"),
    }
}
