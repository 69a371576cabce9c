use std::fs;
use std::path::{Path, PathBuf};

use color_eyre::eyre::WrapErr;
use tracing::debug;

use crate::config::AppConfig;

const CONFIG_DIR: &str = "multicloud";
const CONFIG_FILE: &str = "config.toml";

pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join(CONFIG_DIR))
}

pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|p| p.join(CONFIG_FILE))
}

/// Load the configuration file, then apply environment overrides.
///
/// Call after `.env` has been loaded so its variables take part.
pub fn load() -> color_eyre::Result<AppConfig> {
    let mut config = match config_path() {
        Some(path) => load_file(&path)?,
        None => {
            debug!("No config directory found, using defaults");
            AppConfig::default()
        }
    };

    config.gcp.apply_env(|name| std::env::var(name).ok());
    Ok(config)
}

/// Read a config file. A missing file yields the defaults.
pub fn load_file(path: &Path) -> color_eyre::Result<AppConfig> {
    if !path.exists() {
        debug!(path = %path.display(), "Config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    let content = fs::read_to_string(path)
        .wrap_err_with(|| format!("failed to read config file {}", path.display()))?;
    let config: AppConfig = toml::from_str(&content)
        .wrap_err_with(|| format!("failed to parse config file {}", path.display()))?;
    debug!(path = %path.display(), "Loaded config");
    Ok(config)
}
