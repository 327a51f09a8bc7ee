//! Client settings: `settings.json` in the data dir, then environment, then flags.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{ClientError, Result};

pub const BACKEND_URL_ENV: &str = "EVOGAMES_BACKEND_URL";

fn default_backend_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

fn default_tick_ms() -> u32 {
    evogames::playback::DEFAULT_INTERVAL_MS
}

fn default_request_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientSettings {
    #[serde(default = "default_backend_url")]
    pub backend_url: String,
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u32,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            backend_url: default_backend_url(),
            tick_ms: default_tick_ms(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl ClientSettings {
    /// Read settings from `path`. A missing file yields the defaults, which
    /// are written back so there is a file to edit next time.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "no settings file; using defaults");
            let settings = Self::default();
            if let Err(e) = settings.save(path) {
                warn!("could not write default settings: {}", e);
            }
            return Ok(settings);
        }
        let raw = fs::read_to_string(path).map_err(|e| ClientError::io(path, e))?;
        let settings = serde_json::from_str(&raw)?;
        info!(path = %path.display(), "settings loaded");
        Ok(settings)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let raw = serde_json::to_string_pretty(self)?;
        fs::write(path, raw).map_err(|e| ClientError::io(path, e))
    }

    /// Apply a backend URL override, typically from the environment.
    pub fn with_backend_override(mut self, url: Option<String>) -> Self {
        if let Some(url) = url.filter(|u| !u.trim().is_empty()) {
            self.backend_url = url.trim().trim_end_matches('/').to_string();
        }
        self
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_files_fill_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{"tick_ms": 100}"#).unwrap();
        let s = ClientSettings::load(&path).unwrap();
        assert_eq!(s.tick_ms, 100);
        assert_eq!(s.backend_url, "http://127.0.0.1:5000");
        assert_eq!(s.request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn missing_file_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.json");
        let s = ClientSettings::load(&path).unwrap();
        assert_eq!(s, ClientSettings::default());
        assert!(path.is_file());
        assert_eq!(ClientSettings::load(&path).unwrap(), s);
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let s = ClientSettings::default().with_backend_override(Some("http://sim:8000/".into()));
        s.save(&path).unwrap();
        assert_eq!(ClientSettings::load(&path).unwrap().backend_url, "http://sim:8000");
    }

    #[test]
    fn blank_override_is_ignored() {
        let s = ClientSettings::default().with_backend_override(Some("  ".into()));
        assert_eq!(s.backend_url, default_backend_url());
    }
}
