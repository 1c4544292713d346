use super::{DashboardConfig, Profile, Settings, SETTINGS_FILE};
use crate::error::{Error, Result};
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

pub struct Parser;

impl Parser {
    pub fn new() -> Self {
        Self
    }

    /// Walk up from `dir` looking for `devstack.yaml`.
    pub fn find_settings_in_dir(dir: &Path) -> Option<PathBuf> {
        let settings_path = dir.join(SETTINGS_FILE);
        if settings_path.exists() {
            return Some(settings_path);
        }

        // Try alternate name
        let alt_path = dir.join("devstack.yml");
        if alt_path.exists() {
            return Some(alt_path);
        }

        dir.parent().and_then(Self::find_settings_in_dir)
    }

    /// Load settings; a missing file yields the defaults.
    pub fn load_settings(&self, path: &Path) -> Result<Settings> {
        self.load_yaml_or_default(path)
    }

    pub fn load_dashboard_config(&self, path: &Path) -> Result<DashboardConfig> {
        self.load_yaml_or_default(path)
    }

    pub fn load_profile(&self, path: &Path) -> Result<Profile> {
        let content = fs::read_to_string(path).map_err(|e| {
            Error::Config(format!(
                "Failed to read profile '{}': {}",
                path.display(),
                e
            ))
        })?;
        let mut profile: Profile = self.parse_yaml(&content, path)?;
        profile.name = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        Ok(profile)
    }

    /// Read a YAML document, returning `T::default()` when the file does not
    /// exist or is empty.
    pub fn load_yaml_or_default<T>(&self, path: &Path) -> Result<T>
    where
        T: DeserializeOwned + Default,
    {
        if !path.exists() {
            return Ok(T::default());
        }

        let content = fs::read_to_string(path).map_err(|e| {
            Error::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        if content.trim().is_empty() {
            return Ok(T::default());
        }

        self.parse_yaml(&content, path)
    }

    fn parse_yaml<T: DeserializeOwned>(&self, content: &str, path: &Path) -> Result<T> {
        serde_yaml::from_str(content)
            .map_err(|e| Error::Parse(format!("Failed to parse '{}': {}", path.display(), e)))
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}
