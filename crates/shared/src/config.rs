//! Configuration types for the roster

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::{Result, RosterError};

/// Which Document Store backs the repositories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    /// Lives for one process only
    Memory,
    /// JSON file at `data_file`
    File,
}

/// Roster configuration (roster.yaml or roster.json)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RosterConfig {
    /// Logical database; prefixes collection names
    pub database: String,

    /// Collection holding sales person documents
    pub salesmen_collection: String,

    pub store: StoreKind,

    /// Data file for the file store
    pub data_file: PathBuf,

    /// Upper bound for a single store call
    pub call_timeout_ms: u64,

    /// Default log filter when RUST_LOG is unset
    pub log_level: String,
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            database: "HighPerformanceDatabase".to_string(),
            salesmen_collection: "salesmen".to_string(),
            store: StoreKind::File,
            data_file: PathBuf::from("roster-data.json"),
            call_timeout_ms: 5_000,
            log_level: "info".to_string(),
        }
    }
}

impl RosterConfig {
    /// Load configuration from a YAML or JSON file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => serde_json::from_str(&content)?,
            _ => serde_yaml::from_str(&content)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// File if given, defaults otherwise; then environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Apply `ROSTER_DATA_FILE` and `ROSTER_LOG_LEVEL`
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(file) = lookup("ROSTER_DATA_FILE") {
            self.data_file = PathBuf::from(file);
        }
        if let Some(level) = lookup("ROSTER_LOG_LEVEL") {
            self.log_level = level;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.salesmen_collection.trim().is_empty() {
            return Err(RosterError::Config(
                "salesmenCollection must not be empty".to_string(),
            ));
        }
        if self.call_timeout_ms == 0 {
            return Err(RosterError::Config(
                "callTimeoutMs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Fully-qualified collection name, `database.collection`
    pub fn collection_namespace(&self) -> String {
        if self.database.is_empty() {
            self.salesmen_collection.clone()
        } else {
            format!("{}.{}", self.database, self.salesmen_collection)
        }
    }

    pub fn call_timeout(&self) -> Duration {
        Duration::from_millis(self.call_timeout_ms)
    }
}
