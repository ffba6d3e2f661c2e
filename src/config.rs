//! Resolver configuration.
//!
//! Defaults match the documented behaviour: classes without any explicit
//! nesting policy in their ancestry do not inherit enclosing configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, NestResult};
use crate::policy::Mode;

/// Environment variable selecting the default enclosing configuration mode.
pub const ENV_DEFAULT_MODE: &str = "NESTED_SCOPE_ENCLOSING_CONFIGURATION";

/// Resolver configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResolverConfig {
    /// Mode applied when no explicit policy exists anywhere in the chain.
    pub default_mode: Mode,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            default_mode: Mode::Override,
        }
    }
}

impl ResolverConfig {
    /// Parse a JSON document; missing fields take their defaults.
    ///
    /// # Errors
    /// Returns a config error on malformed JSON or unknown fields.
    pub fn from_json_str(json: &str) -> NestResult<Self> {
        let config = serde_json::from_str(json).map_err(ConfigError::from)?;
        Ok(config)
    }

    /// Load a JSON config file.
    ///
    /// # Errors
    /// Returns `ConfigError::Io` if the file cannot be read, otherwise the
    /// errors of [`ResolverConfig::from_json_str`].
    pub fn from_file(path: impl AsRef<Path>) -> NestResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_json_str(&raw)
    }

    /// Build a config from process environment variables.
    ///
    /// # Errors
    /// See [`ResolverConfig::from_lookup`].
    pub fn from_env() -> NestResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a config from a variable lookup function; unset variables keep
    /// their defaults.
    ///
    /// # Errors
    /// Returns `ConfigError::Environment` for unparseable values.
    pub fn from_lookup<F>(lookup: F) -> NestResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(ENV_DEFAULT_MODE).filter(|v| !v.trim().is_empty()) {
            config.default_mode = raw.parse().map_err(|_| ConfigError::Environment {
                name: ENV_DEFAULT_MODE,
                value: raw.clone(),
            })?;
        }

        Ok(config)
    }
}
