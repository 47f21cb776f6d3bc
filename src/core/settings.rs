//! Runtime settings.
//!
//! Resolved in layers, each overriding the last:
//!
//! 1. built-in defaults
//! 2. the TOML settings file (`$KMSENV_CONFIG`, else
//!    `<config dir>/kmsenv/config.toml`)
//! 3. environment variables (`KMSENV_KEY`, `KMSENV_REGION`,
//!    `KMSENV_METADATA_URL`)
//! 4. command-line flags
//!
//! ```toml
//! key_id = "alias/my-app"
//! region = "eu-west-1"
//!
//! [metadata]
//! endpoint = "http://169.254.169.254"
//! timeout_secs = 10
//! retries = 3
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::core::constants::{
    CONFIG_ENV, DEFAULT_KEY_ID, DEFAULT_METADATA_ENDPOINT, DEFAULT_METADATA_RETRIES,
    DEFAULT_METADATA_TIMEOUT_SECS, KEY_ENV, MAX_METADATA_RETRIES, METADATA_URL_ENV, REGION_ENV,
};
use crate::core::metadata::HostMetadata;
use crate::error::{ConfigError, Result};

/// Resolved settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// KMS key alias, ARN or ID used for encryption.
    pub key_id: String,
    /// AWS region; resolved from the environment or instance when unset.
    pub region: Option<String>,
    pub metadata: MetadataSettings,
}

/// Instance metadata client settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MetadataSettings {
    pub endpoint: String,
    pub timeout_secs: u64,
    /// Retries on connection failures and timeouts.
    pub retries: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            key_id: DEFAULT_KEY_ID.to_string(),
            region: None,
            metadata: MetadataSettings::default(),
        }
    }
}

impl Default for MetadataSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_METADATA_ENDPOINT.to_string(),
            timeout_secs: DEFAULT_METADATA_TIMEOUT_SECS,
            retries: DEFAULT_METADATA_RETRIES,
        }
    }
}

impl MetadataSettings {
    /// Build a metadata client from these settings.
    pub fn client(&self) -> HostMetadata {
        HostMetadata::new(
            self.endpoint.clone(),
            Duration::from_secs(self.timeout_secs),
            self.retries,
        )
    }
}

impl Settings {
    /// Resolve every layer from the process environment.
    ///
    /// `key` is the command-line override for the KMS key.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the settings file is unreadable or invalid,
    /// or an explicitly named settings file does not exist.
    pub fn resolve(key: Option<String>) -> Result<Self> {
        let mut settings = match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::from_file(Path::new(&path))?,
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => Self::default(),
            },
        };

        settings.apply_env(|name| std::env::var(name).ok());
        if let Some(key) = key {
            settings.key_id = key;
        }

        settings.validate()?;
        debug!(key_id = %settings.key_id, region = ?settings.region, "settings resolved");
        Ok(settings)
    }

    /// Default settings file location.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("kmsenv").join("config.toml"))
    }

    /// Load settings from a TOML file, filling gaps with defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` if the file does not exist, or
    /// `ConfigError::Parse` for malformed TOML and unknown fields.
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "loading settings");

        let contents = std::fs::read_to_string(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                ConfigError::NotFound(path.to_path_buf())
            } else {
                ConfigError::ReadFile {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;

        toml::from_str(&contents).map_err(|source| {
            ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            }
            .into()
        })
    }

    /// Overlay environment variables read through `lookup`.
    ///
    /// Empty values are ignored.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let lookup = |name: &str| lookup(name).filter(|v: &String| !v.is_empty());

        if let Some(key) = lookup(KEY_ENV) {
            self.key_id = key;
        }
        if let Some(region) = lookup(REGION_ENV) {
            self.region = Some(region);
        }
        if let Some(endpoint) = lookup(METADATA_URL_ENV) {
            self.metadata.endpoint = endpoint;
        }
    }

    /// Check field values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` naming the first bad field.
    pub fn validate(&self) -> Result<()> {
        if self.key_id.trim().is_empty() {
            return Err(invalid("key_id", "must not be empty"));
        }
        if self.region.as_deref().is_some_and(|r| r.trim().is_empty()) {
            return Err(invalid("region", "must not be empty"));
        }

        let endpoint = Url::parse(&self.metadata.endpoint)
            .map_err(|e| invalid("metadata.endpoint", &e.to_string()))?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(invalid("metadata.endpoint", "must be an http(s) URL"));
        }
        if self.metadata.timeout_secs == 0 {
            return Err(invalid("metadata.timeout_secs", "must be at least 1"));
        }
        if self.metadata.retries > MAX_METADATA_RETRIES {
            return Err(invalid(
                "metadata.retries",
                &format!("must be at most {}", MAX_METADATA_RETRIES),
            ));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: &str) -> crate::error::Error {
    ConfigError::InvalidValue {
        field,
        reason: reason.to_string(),
    }
    .into()
}
