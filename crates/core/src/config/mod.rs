//! Configuration for tracehook
//!
//! Hooks can be declared up front in a config file instead of being
//! registered one call at a time:
//! - TOML (default) or JSON, chosen by file extension
//! - Auto-generation of a default config when the file is missing
//! - Manual reload capability
//!
//! # Example
//!
//! ```toml
//! version = 1
//! debug = false
//! enabled = true
//!
//! [[hooks]]
//! class = "PDO"
//! function = "exec"
//! callable = "trace_pdo_exec"
//! options = ["prehook"]
//!
//! [[hooks]]
//! function = "curl_exec"
//! bits = 8
//! ```

mod loader;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::dispatch::HookOptions;

pub use loader::{config_path, default_config_path, CONFIG_ENV_VAR, CONFIG_FILE_NAME};

/// Configuration system errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read or write config file
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to parse TOML content
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Failed to parse or write JSON content
    #[error("Failed to parse JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Failed to serialize config to TOML
    #[error("Failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),

    /// Hook option name that matches no flag
    #[error("Unknown hook option: {0}")]
    InvalidOption(String),

    /// Could not determine where the config file lives
    #[error("Config directory not available - could not resolve executable path")]
    NoConfigDirectory,
}

/// Result type for config operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// On-disk config format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Json,
}

impl ConfigFormat {
    /// Pick the format from a file extension (`.json` or anything else)
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => ConfigFormat::Json,
            _ => ConfigFormat::Toml,
        }
    }
}

/// One hook declaration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HookSpec {
    /// Class for method hooks; absent for free functions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,

    /// Function or method name
    pub function: String,

    /// Callable to redirect to; absent for observation hooks
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callable: Option<String>,

    /// Option flag names (case-insensitive)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,

    /// Raw option bits, merged with `options`
    #[serde(skip_serializing_if = "is_zero")]
    pub bits: u32,
}

fn is_zero(bits: &u32) -> bool {
    *bits == 0
}

impl HookSpec {
    /// Combined option bitmask
    pub fn hook_options(&self) -> ConfigResult<HookOptions> {
        self.options
            .iter()
            .try_fold(HookOptions::from_raw(self.bits), |acc, name| {
                HookOptions::from_flag_name(name)
                    .map(|flag| acc | flag)
                    .ok_or_else(|| ConfigError::InvalidOption(name.clone()))
            })
    }

    /// `Class::function` or `function`, for logs
    pub fn target(&self) -> String {
        match &self.class {
            Some(class) => format!("{}::{}", class, self.function),
            None => self.function.clone(),
        }
    }
}

/// Tracer configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TracerConfig {
    /// Config version for future migration support
    pub version: u32,

    /// Enable debug logging
    pub debug: bool,

    /// Register configured hooks at startup
    pub enabled: bool,

    /// Hook declarations
    pub hooks: Vec<HookSpec>,
}

impl Default for TracerConfig {
    fn default() -> Self {
        Self {
            version: 1,
            debug: false,
            enabled: true,
            hooks: Vec::new(),
        }
    }
}

impl TracerConfig {
    /// Parse a TOML document
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Parse a JSON document
    pub fn from_json_str(content: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Parse `content` in the given format
    pub fn parse(content: &str, format: ConfigFormat) -> ConfigResult<Self> {
        match format {
            ConfigFormat::Toml => Self::from_toml_str(content),
            ConfigFormat::Json => Self::from_json_str(content),
        }
    }

    /// Render in the given format
    pub fn render(&self, format: ConfigFormat) -> ConfigResult<String> {
        match format {
            ConfigFormat::Toml => Ok(toml::to_string_pretty(self)?),
            ConfigFormat::Json => Ok(serde_json::to_string_pretty(self)?),
        }
    }

    /// Load config from `path`
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::parse(&content, ConfigFormat::from_path(path))?;
        tracing::debug!(
            "Loaded config from {:?} ({} hooks)",
            path,
            config.hooks.len()
        );
        Ok(config)
    }

    /// Load config from `path`, creating a default one if missing
    pub fn load_or_default(path: &Path) -> ConfigResult<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            let default = Self::default();
            default.save(path)?;
            tracing::info!("Created default config at {:?}", path);
            Ok(default)
        }
    }

    /// Save config to `path`
    ///
    /// Creates parent directories if they don't exist.
    pub fn save(&self, path: &Path) -> ConfigResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = self.render(ConfigFormat::from_path(path))?;
        std::fs::write(path, content)?;
        tracing::debug!("Saved config to {:?}", path);
        Ok(())
    }

    /// Reload config from `path`
    ///
    /// Updates self with the current file contents.
    pub fn reload(&mut self, path: &Path) -> ConfigResult<()> {
        *self = Self::load(path)?;
        tracing::debug!("Reloaded config from {:?}", path);
        Ok(())
    }
}
