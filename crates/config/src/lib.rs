//! Shared configuration-directory helpers for Relay
//!
//! All Relay components keep their files (cached OAuth tokens, the
//! runtime settings file when no explicit path is given) under the
//! shared config directory (~/.config/relay/).
//!
//! Call [`init`] at application startup to bootstrap the directory.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use std::path::PathBuf;

/// Initialize the Relay config directory.
///
/// Creates ~/.config/relay/ if it doesn't exist.
/// Call this once at application startup.
pub fn init() -> Result<PathBuf> {
    ensure_config_dir()
}

/// Get the Relay config directory (~/.config/relay/)
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("relay"))
}

/// Get the path to a file within the Relay config directory
pub fn config_path(filename: &str) -> Option<PathBuf> {
    config_dir().map(|p| p.join(filename))
}

/// Load and parse a JSON file from the Relay config directory
pub fn load_json<T: DeserializeOwned>(filename: &str) -> Result<T> {
    let path = config_path(filename).context("Could not determine config directory")?;
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Save a value as JSON to a file in the Relay config directory
pub fn save_json<T: serde::Serialize>(filename: &str, value: &T) -> Result<()> {
    let dir = ensure_config_dir()?;
    let path = dir.join(filename);
    let content = serde_json::to_string_pretty(value)?;
    std::fs::write(&path, content)
        .with_context(|| format!("Failed to write config file: {}", path.display()))?;
    Ok(())
}

/// Remove a file from the Relay config directory if it exists
pub fn remove(filename: &str) -> Result<()> {
    if let Some(path) = config_path(filename)
        && path.exists()
    {
        std::fs::remove_file(&path)
            .with_context(|| format!("Failed to remove config file: {}", path.display()))?;
    }
    Ok(())
}

/// Ensure the Relay config directory exists
pub fn ensure_config_dir() -> Result<PathBuf> {
    let dir = config_dir().context("Could not determine config directory")?;
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create config directory: {}", dir.display()))?;
    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_dir() {
        let dir = config_dir();
        assert!(dir.is_some());
        assert!(dir.unwrap().ends_with("relay"));
    }

    #[test]
    fn test_config_path() {
        let path = config_path("settings.yaml");
        assert!(path.is_some());
        let path = path.unwrap();
        assert!(path.ends_with("relay/settings.yaml"));
    }

    #[test]
    fn test_remove_missing_file_is_a_noop() {
        assert!(remove("no-such-file-f2a9c1.json").is_ok());
    }
}
