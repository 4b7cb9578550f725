//! Configuration for a registration run
//!
//! Loaded once per run from TOML and treated as read-only afterwards; the
//! config is `Clone` so overlapping runs can share it safely.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::field::FieldSpec;
use crate::record;

/// Full configuration surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PidmintConfig {
    /// Registry service endpoint and transport limits
    pub service: ServiceConfig,
    /// Identifier composition and target lifecycle state
    pub mint: MintConfig,
    /// Schema transform selection and diagnostics
    pub transform: TransformConfig,
    /// Separator splitting repeatable field values
    #[serde(default = "default_repeat_separator")]
    pub repeat_separator: String,
    /// Record fields, resolved in order
    #[serde(default, rename = "field")]
    pub fields: Vec<FieldSpec>,
}

/// Registry endpoint, credentials, and transport limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Base address of the registry service; path suffixes are appended
    pub address: String,
    pub username: String,
    pub password: String,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_socket_timeout_secs")]
    pub socket_timeout_secs: u64,
    /// Total attempts per call before the transport gives up
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Base backoff delay; attempt k waits k times this
    #[serde(default = "default_retry_base_delay_ms")]
    pub retry_base_delay_ms: u64,
}

impl ServiceConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn socket_timeout(&self) -> Duration {
        Duration::from_secs(self.socket_timeout_secs)
    }

    pub fn retry_base_delay(&self) -> Duration {
        Duration::from_millis(self.retry_base_delay_ms)
    }
}

/// Identifier composition and lifecycle policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MintConfig {
    /// Registry base (DOI prefix), e.g. `10.5072`
    pub base: String,
    #[serde(default)]
    pub prefix: String,
    #[serde(default)]
    pub name: String,
    /// Separator between identifier segments
    #[serde(default = "default_separator")]
    pub separator: String,
    /// Cap runs at the draft state; never auto-promote while set
    #[serde(default)]
    pub draft: bool,
    /// Public resolution target; the identifier is appended on promotion
    #[serde(default)]
    pub viewer: String,
}

/// Schema transform selection and debug snapshots.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransformConfig {
    /// Identifier of the transform the host engine should apply
    pub id: String,
    /// Persist pre-/post-transform documents per run
    #[serde(default)]
    pub debug_mode: bool,
    /// Where debug snapshots land; overwritten each run
    #[serde(default = "default_snapshot_dir")]
    pub snapshot_dir: PathBuf,
}

#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("failed to parse configuration: {0}")]
    Parse(String),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

impl PidmintConfig {
    /// Parse from TOML, normalize the service address to a trailing slash,
    /// and validate.
    pub fn from_toml(input: &str) -> Result<Self, ConfigError> {
        let mut config: PidmintConfig =
            toml::from_str(input).map_err(|e| ConfigError::Parse(e.to_string()))?;
        if !config.service.address.is_empty() && !config.service.address.ends_with('/') {
            config.service.address.push('/');
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.service.address.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "service.address must not be empty".to_string(),
            ));
        }
        if self.service.max_retries == 0 {
            return Err(ConfigError::Invalid(
                "service.max_retries must be at least 1".to_string(),
            ));
        }
        if self.mint.base.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "mint.base must not be empty".to_string(),
            ));
        }
        if self.mint.separator.is_empty() {
            return Err(ConfigError::Invalid(
                "mint.separator must not be empty".to_string(),
            ));
        }
        if !self.mint.draft && self.mint.viewer.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "mint.viewer is required unless mint.draft is set".to_string(),
            ));
        }
        if self.repeat_separator.is_empty() {
            return Err(ConfigError::Invalid(
                "repeat_separator must not be empty".to_string(),
            ));
        }
        if self.transform.id.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "transform.id must not be empty".to_string(),
            ));
        }
        for field in &self.fields {
            if !record::is_valid_element_name(&field.name) {
                return Err(ConfigError::Invalid(format!(
                    "field name `{}` is not a valid element name",
                    field.name
                )));
            }
            if [
                record::DOCTYPE_FIELD,
                record::ANCHOR_DOCTYPE_FIELD,
                record::IDENTIFIER_FIELD,
            ]
            .contains(&field.name.as_str())
            {
                return Err(ConfigError::Invalid(format!(
                    "field name `{}` is reserved for derived fields",
                    field.name
                )));
            }
        }
        Ok(())
    }
}

fn default_repeat_separator() -> String {
    "; ".to_string()
}

fn default_separator() -> String {
    "-".to_string()
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_socket_timeout_secs() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_base_delay_ms() -> u64 {
    1000
}

fn default_snapshot_dir() -> PathBuf {
    std::env::temp_dir()
}
