//! Presentation settings for rendered traces
//!
//! Settings are layered with `figment`: built-in defaults, then an optional
//! YAML file, then `ERRTRAIL_*` environment variables.

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use serde::{Deserialize, Serialize};

/// Prefix of environment variables overriding [`RenderConfig`] fields.
pub const ENV_PREFIX: &str = "ERRTRAIL_";

/// How captured locations are printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationStyle {
    /// `file:line`
    #[default]
    Compact,
    /// `Called from <file>, line #<line>`
    Verbose,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RenderConfig {
    #[serde(default)]
    pub location_style: LocationStyle,
    /// Append non-empty baggage to each trace line.
    #[serde(default = "default_include_baggage")]
    pub include_baggage: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            location_style: LocationStyle::default(),
            include_baggage: default_include_baggage(),
        }
    }
}

fn default_include_baggage() -> bool {
    true
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("render config file not found: {}", .0.display())]
    MissingFile(PathBuf),

    #[error("invalid render config: {0}")]
    Invalid(#[source] Box<figment::Error>),
}

impl RenderConfig {
    /// Extracts the configuration from an already assembled figment.
    ///
    /// # Errors
    /// Returns [`ConfigError::Invalid`] if the merged values do not match the schema.
    pub fn from_figment(figment: &Figment) -> Result<Self, ConfigError> {
        figment
            .extract()
            .map_err(|e| ConfigError::Invalid(Box::new(e)))
    }

    /// Defaults, then `path` (YAML) when given, then `ERRTRAIL_*` variables.
    ///
    /// # Errors
    /// Returns [`ConfigError::MissingFile`] if `path` does not exist and
    /// [`ConfigError::Invalid`] if any layer holds an unknown or malformed field.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut figment = Figment::new().merge(Serialized::defaults(Self::default()));
        if let Some(path) = path {
            if !path.exists() {
                return Err(ConfigError::MissingFile(path.to_path_buf()));
            }
            figment = figment.merge(Yaml::file(path));
        }
        figment = figment.merge(Env::prefixed(ENV_PREFIX));

        let config = Self::from_figment(&figment)?;
        tracing::debug!(
            location_style = ?config.location_style,
            include_baggage = config.include_baggage,
            "render config loaded"
        );
        Ok(config)
    }
}
