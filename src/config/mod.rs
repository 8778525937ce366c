pub mod types;

use crate::error::{ConfigError, Result};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAME: &str = ".compliance.toml";

/// Get the global config file path (~/.compliance.toml)
pub fn global_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(CONFIG_FILE_NAME))
}

/// Get the local config file path (./.compliance.toml)
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(CONFIG_FILE_NAME)
}

/// Parse a config file. Missing sections fall back to defaults.
pub fn read_config(path: &Path) -> Result<types::Config> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
        path: path.display().to_string(),
        source,
    })?;
    let config: types::Config =
        toml::from_str(&content).map_err(|e| ConfigError::ParsingFailed(e.to_string()))?;
    config.validate()?;
    Ok(config)
}

/// Load configuration from file or use defaults.
///
/// An explicit path must exist and parse. Otherwise the local config is tried
/// first, then the global one; unreadable implicit configs are logged and
/// skipped.
pub fn load_config(explicit: Option<&Path>) -> Result<types::Config> {
    if let Some(path) = explicit {
        return read_config(path);
    }

    let candidates = [Some(local_config_path(Path::new("."))), global_config_path()];
    for path in candidates.into_iter().flatten() {
        if !path.exists() {
            continue;
        }
        match read_config(&path) {
            Ok(config) => {
                log::debug!("Loaded configuration from {}", path.display());
                return Ok(config);
            }
            Err(e) => log::warn!("Ignoring {}: {}", path.display(), e),
        }
    }

    Ok(types::Config::default())
}
