//! Client settings: `~/.acctsync/config.yaml`, overridden by flags / env.
//!
//! ```yaml
//! endpoint: https://vra.example.com
//! token: <bearer token>
//! api_version: "2021-07-15"
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use acctsync_core::store;

pub const DEFAULT_API_VERSION: &str = "2021-07-15";

/// Settings as stored on disk; every field optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsFile {
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub api_version: Option<String>,
}

/// Fully resolved settings used to build the HTTP client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub endpoint: String,
    pub token: Option<String>,
    pub api_version: String,
}

pub fn settings_path_at(home: &Path) -> PathBuf {
    store::root_dir_at(home).join("config.yaml")
}

/// Load `<home>/.acctsync/config.yaml`; a missing file yields empty settings.
pub fn load_file_at(home: &Path) -> Result<SettingsFile> {
    let path = settings_path_at(home);
    if !path.exists() {
        return Ok(SettingsFile::default());
    }
    let contents = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_yaml::from_str(&contents).with_context(|| format!("failed to parse {}", path.display()))
}

/// Merge flag/env overrides over the settings file.
pub fn resolve(file: SettingsFile, endpoint: Option<String>, token: Option<String>) -> Result<Settings> {
    let endpoint = endpoint.or(file.endpoint).context(
        "no API endpoint configured; pass --endpoint, set ACCTSYNC_ENDPOINT, or add `endpoint:` to ~/.acctsync/config.yaml",
    )?;
    Ok(Settings {
        endpoint,
        token: token.or(file.token),
        api_version: file
            .api_version
            .unwrap_or_else(|| DEFAULT_API_VERSION.to_string()),
    })
}
