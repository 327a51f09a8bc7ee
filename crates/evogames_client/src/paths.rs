//! Cross-platform application paths

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ClientError;

#[derive(Debug, Clone)]
pub struct AppPaths {
    data_dir: PathBuf,
}

impl AppPaths {
    pub fn new() -> Result<Self, ClientError> {
        let data_dir = Self::get_data_dir()?;
        Self::at(data_dir)
    }

    /// Paths rooted at an explicit directory, created if missing.
    pub fn at(data_dir: impl Into<PathBuf>) -> Result<Self, ClientError> {
        let data_dir = data_dir.into();
        fs::create_dir_all(&data_dir).map_err(|e| ClientError::io(&data_dir, e))?;
        Ok(Self { data_dir })
    }

    fn get_data_dir() -> Result<PathBuf, ClientError> {
        let base = dirs::data_dir()
            .ok_or_else(|| ClientError::Paths("Could not determine data directory".into()))?;
        Ok(base.join("evogames"))
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn settings_file(&self) -> PathBuf {
        self.data_dir.join("settings.json")
    }

    pub fn last_results_file(&self) -> PathBuf {
        self.data_dir.join("last_results.json")
    }

    pub fn last_config_file(&self) -> PathBuf {
        self.data_dir.join("last_config.json")
    }

    /// Where `init` writes config drafts.
    pub fn draft_file(&self, name: &str) -> PathBuf {
        let stem: String = name
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
            .collect();
        self.data_dir.join("drafts").join(format!("{stem}.json"))
    }
}
