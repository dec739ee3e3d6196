//! # Configuration
//!
//! Layered application configuration:
//!
//! 1. Built-in defaults
//! 2. TOML file (`--config <path>`, or `modeler.toml` in the working
//!    directory when present)
//! 3. Environment variables
//!    - `MODELER_API_BASE`: backend base URL
//!    - `MODELER_TIMEOUT_MS`: request timeout in milliseconds
//!    - `MODELER_SYNC_POLICY`: `refetch` or `patch`
//! 4. The `--api-base` command line flag

use crate::AppError;
use crate::store::SyncPolicy;
use crate::theme::{ThemeMode, is_hex_color};
use modeler_core::primitives::{DEFAULT_API_BASE, DEFAULT_CONNECT_TIMEOUT_MS, DEFAULT_TIMEOUT_MS};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// File looked up in the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "modeler.toml";

pub const ENV_API_BASE: &str = "MODELER_API_BASE";
pub const ENV_TIMEOUT_MS: &str = "MODELER_TIMEOUT_MS";
pub const ENV_SYNC_POLICY: &str = "MODELER_SYNC_POLICY";

// =============================================================================
// SECTIONS
// =============================================================================

/// `[api]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_ms: u64,
    pub connect_timeout_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            connect_timeout_ms: DEFAULT_CONNECT_TIMEOUT_MS,
        }
    }
}

/// `[store]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    pub sync_policy: SyncPolicy,
}

/// `[theme]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThemeConfig {
    pub mode: ThemeMode,
    /// Color overrides by name (`primary = "#1867C0"`).
    pub colors: BTreeMap<String, String>,
}

/// Whole configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub store: StoreConfig,
    pub theme: ThemeConfig,
}

// =============================================================================
// LOADING
// =============================================================================

impl AppConfig {
    /// Parse a TOML document. Missing keys keep their defaults.
    pub fn from_toml_str(s: &str) -> Result<Self, AppError> {
        toml::from_str(s).map_err(|e| AppError::Config(e.to_string()))
    }

    /// Read and parse a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, AppError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| AppError::Io(format!("cannot read {}: {}", path.display(), e)))?;
        Self::from_toml_str(&text)
    }

    /// Defaults, then the config file, then the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self, AppError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Apply environment-style overrides from `lookup`.
    pub fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), AppError> {
        if let Some(base) = lookup(ENV_API_BASE) {
            self.api.base_url = base;
        }
        if let Some(timeout) = lookup(ENV_TIMEOUT_MS) {
            self.api.timeout_ms = timeout
                .trim()
                .parse()
                .map_err(|e| AppError::Config(format!("{ENV_TIMEOUT_MS}={timeout}: {e}")))?;
        }
        if let Some(policy) = lookup(ENV_SYNC_POLICY) {
            self.store.sync_policy = policy
                .parse()
                .map_err(|e| AppError::Config(format!("{ENV_SYNC_POLICY}: {e}")))?;
        }
        Ok(())
    }

    /// Reject values the client cannot work with.
    pub fn validate(&self) -> Result<(), AppError> {
        let base = &self.api.base_url;
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(AppError::Config(format!(
                "api.base_url must start with http:// or https:// (got '{base}')"
            )));
        }
        if self.api.timeout_ms == 0 || self.api.connect_timeout_ms == 0 {
            return Err(AppError::Config("api timeouts must be greater than zero".to_string()));
        }
        if let Some((name, value)) = self.theme.colors.iter().find(|(_, v)| !is_hex_color(v)) {
            return Err(AppError::Config(format!(
                "theme.colors.{name} is not a hex color: '{value}'"
            )));
        }
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================
