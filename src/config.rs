//! Settings persistence and environment overrides.
//!
//! Settings live in `~/.config/ainalyzer/settings.json` (platform config dir).
//! Precedence, lowest first: built-in defaults, the settings file, then
//! `AINALYZER_*` environment variables.

use crate::error::ConfigError;
use crate::llm::payload::DEFAULT_MAX_IMAGE_BYTES;
use crate::llm::provider::Provider;
use crate::response::CoordinatePolicy;
use crate::text::cache::DEFAULT_CAPACITY;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const SETTINGS_FILE: &str = "settings.json";

pub const ENV_COORDINATE_POLICY: &str = "AINALYZER_COORDINATE_POLICY";
pub const ENV_CACHE_CAPACITY: &str = "AINALYZER_CACHE_CAPACITY";
pub const ENV_PROVIDER: &str = "AINALYZER_PROVIDER";
pub const ENV_MAX_IMAGE_BYTES: &str = "AINALYZER_MAX_IMAGE_BYTES";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    pub coordinate_policy: CoordinatePolicy,
    pub cache_capacity: usize,
    pub provider: Provider,
    pub max_image_bytes: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            coordinate_policy: CoordinatePolicy::Clamp,
            cache_capacity: DEFAULT_CAPACITY,
            provider: Provider::Anthropic,
            max_image_bytes: DEFAULT_MAX_IMAGE_BYTES,
        }
    }
}

/// Default settings file location.
pub fn settings_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ainalyzer")
        .join(SETTINGS_FILE)
}

impl Settings {
    /// Defaults, then the settings file, then environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let mut settings = Self::load_from(&settings_path())?;
        settings.apply_env_overrides()?;
        Ok(settings)
    }

    /// Read a settings file. A missing file yields defaults; fields absent
    /// from the file keep their defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("[CONFIG] No settings at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let settings = serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("[CONFIG] Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Persist as pretty JSON, creating the parent directory if needed.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let write_err = |source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        std::fs::write(path, json).map_err(write_err)?;
        log::info!("[CONFIG] Saved settings to {}", path.display());
        Ok(())
    }

    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from any key lookup. Blank values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get(ENV_COORDINATE_POLICY) {
            self.coordinate_policy = CoordinatePolicy::parse(&v).ok_or(ConfigError::InvalidOverride {
                key: ENV_COORDINATE_POLICY,
                value: v.clone(),
            })?;
            log::info!("[CONFIG] Coordinate policy override: {:?}", self.coordinate_policy);
        }
        if let Some(v) = get(ENV_CACHE_CAPACITY) {
            self.cache_capacity = parse_positive(ENV_CACHE_CAPACITY, &v)?;
        }
        if let Some(v) = get(ENV_PROVIDER) {
            self.provider = Provider::parse(&v).ok_or(ConfigError::InvalidOverride {
                key: ENV_PROVIDER,
                value: v.clone(),
            })?;
            log::info!("[CONFIG] Provider override: {}", self.provider);
        }
        if let Some(v) = get(ENV_MAX_IMAGE_BYTES) {
            self.max_image_bytes = parse_positive(ENV_MAX_IMAGE_BYTES, &v)?;
        }
        Ok(())
    }
}

fn parse_positive(key: &'static str, value: &str) -> Result<usize, ConfigError> {
    match value.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ConfigError::InvalidOverride {
            key,
            value: value.to_string(),
        }),
    }
}
