use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use std::path::Path;

use super::{types::SimulationConfig, validate::validate_config, ConfigError};

/// Load configuration from file with environment variable overrides.
///
/// A successfully loaded configuration has already passed validation.
pub fn load_config(path: &Path) -> Result<SimulationConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    let config: SimulationConfig = Figment::new()
        .merge(Toml::file(path))
        .merge(Env::prefixed("BOXOFFICE_").split("_"))
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))?;

    validate_config(&config)?;
    Ok(config)
}

/// Load configuration from TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<SimulationConfig, ConfigError> {
    let config: SimulationConfig =
        toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Persist a configuration as TOML, creating parent directories as needed.
pub fn save_config(config: &SimulationConfig, path: &Path) -> Result<(), ConfigError> {
    let toml_str =
        toml::to_string_pretty(config).map_err(|e| ConfigError::WriteError(e.to_string()))?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ConfigError::WriteError(format!("{}: {}", parent.display(), e))
            })?;
        }
    }

    std::fs::write(path, toml_str)
        .map_err(|e| ConfigError::WriteError(format!("{}: {}", path.display(), e)))
}
