//! Config path resolution
//!
//! Handles locating the config file for the running host process.

use std::path::PathBuf;

use super::{ConfigError, ConfigResult};

/// Environment variable overriding the config file location
pub const CONFIG_ENV_VAR: &str = "TRACEHOOK_CONFIG";

/// Config file name used when no override is set
pub const CONFIG_FILE_NAME: &str = "tracehook.toml";

/// Returns the default config path: `tracehook.toml` next to the executable.
///
/// For an embedded host this is the host binary's directory, e.g.
/// `/usr/sbin/php-fpm` -> `/usr/sbin/tracehook.toml`.
pub fn default_config_path() -> ConfigResult<PathBuf> {
    let exe = std::env::current_exe().map_err(ConfigError::IoError)?;
    exe.parent()
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .ok_or(ConfigError::NoConfigDirectory)
}

/// Returns the config path, honouring `TRACEHOOK_CONFIG`.
pub fn config_path() -> ConfigResult<PathBuf> {
    match std::env::var_os(CONFIG_ENV_VAR) {
        Some(path) if !path.is_empty() => Ok(PathBuf::from(path)),
        _ => default_config_path(),
    }
}
