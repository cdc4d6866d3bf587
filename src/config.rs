//! Client settings and on-disk locations.
//!
//! Everything lives under one home directory: `$OBRA_HOME` when set,
//! otherwise `~/.obra`. It holds `config.json` (settings) and
//! `session.json` (the bearer token, see [`crate::api::session`]).

use std::env;
use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::ObraError;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Resolve the client home directory.
pub fn home_dir() -> Result<PathBuf, ObraError> {
    if let Some(dir) = env::var_os("OBRA_HOME").filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    dirs::home_dir()
        .map(|home| home.join(".obra"))
        .ok_or_else(|| ObraError::config("Cannot determine home directory. Set OBRA_HOME."))
}

pub fn config_path() -> Result<PathBuf, ObraError> {
    Ok(home_dir()?.join("config.json"))
}

pub fn session_path() -> Result<PathBuf, ObraError> {
    Ok(home_dir()?.join("session.json"))
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_project_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Settings {
    /// Load `config.json`; a missing file yields default settings.
    pub fn load() -> Result<Self, ObraError> {
        let path = config_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(&path)?;
        serde_json::from_str(&content)
            .map_err(|e| ObraError::config(format!("Invalid {}: {e}", path.display())))
    }

    pub fn save(&self) -> Result<PathBuf, ObraError> {
        let path = config_path()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| ObraError::config(e.to_string()))?;
        fs::write(&path, content)?;
        Ok(path)
    }

    /// Base URL used for requests: flag/env override, then file, then default.
    pub fn effective_api_url(&self, flag: Option<&str>) -> String {
        let url = flag
            .filter(|u| !u.trim().is_empty())
            .or(self.api_url.as_deref())
            .unwrap_or(DEFAULT_API_URL);
        url.trim().trim_end_matches('/').to_string()
    }

    pub fn timeout_secs(&self) -> u64 {
        self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_url_precedence() {
        let mut settings = Settings::default();
        assert_eq!(settings.effective_api_url(None), DEFAULT_API_URL);

        settings.api_url = Some("http://backend:9000/".into());
        assert_eq!(settings.effective_api_url(None), "http://backend:9000");
        assert_eq!(
            settings.effective_api_url(Some("http://flag:1")),
            "http://flag:1"
        );
        assert_eq!(settings.effective_api_url(Some("  ")), "http://backend:9000");
    }

    #[test]
    fn test_settings_skip_empty_fields() {
        let settings = Settings {
            active_project_id: Some(4),
            ..Default::default()
        };
        let json = serde_json::to_string(&settings).unwrap();
        assert_eq!(json, r#"{"active_project_id":4}"#);
        let back: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(back, settings);
    }
}
