use super::ActiveState;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// On-disk layout of the state file. Keys other than `active` are carried
/// through rewrites untouched.
#[derive(Debug, Default, Serialize, Deserialize)]
struct StateFile {
    #[serde(default)]
    active: Vec<String>,
    #[serde(flatten)]
    extra: serde_json::Map<String, serde_json::Value>,
}

/// JSON-file persistence for [`ActiveState`].
#[derive(Debug, Clone)]
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the active set. A missing file is an empty set; so is an
    /// unreadable or corrupt one, with a warning.
    pub fn load(&self) -> ActiveState {
        match self.read_file() {
            Ok(Some(file)) => file.active.into_iter().collect(),
            Ok(None) => ActiveState::new(),
            Err(e) => {
                tracing::warn!(
                    "Ignoring unreadable state file {}: {}",
                    self.path.display(),
                    e
                );
                ActiveState::new()
            }
        }
    }

    /// Persist `state`, replacing the file atomically.
    pub fn save(&self, state: &ActiveState) -> Result<()> {
        let extra = match self.read_file() {
            Ok(Some(file)) => file.extra,
            _ => serde_json::Map::new(),
        };
        let file = StateFile {
            active: state.names(),
            extra,
        };
        let contents = serde_json::to_string_pretty(&file)?;
        atomic_write(&self.path, &contents)?;
        tracing::debug!(
            "Saved {} active service(s) to {}",
            state.len(),
            self.path.display()
        );
        Ok(())
    }

    /// Remove the state file. Missing is fine.
    pub fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn read_file(&self) -> Result<Option<StateFile>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&self.path)?;
        Ok(Some(serde_json::from_str(&contents)?))
    }
}

/// Atomic file write using write-then-rename pattern
/// This prevents file corruption if the process crashes during write
fn atomic_write(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let temp_path = path.with_extension("tmp");
    let mut file = fs::File::create(&temp_path)
        .map_err(|e| Error::Filesystem(format!("Failed to create temp file: {}", e)))?;

    file.write_all(contents.as_bytes())
        .map_err(|e| Error::Filesystem(format!("Failed to write temp file: {}", e)))?;

    // Ensure data is written to disk before rename
    file.sync_all()
        .map_err(|e| Error::Filesystem(format!("Failed to sync temp file: {}", e)))?;
    drop(file);

    fs::rename(&temp_path, path)
        .map_err(|e| Error::Filesystem(format!("Failed to rename temp file: {}", e)))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> (tempfile::TempDir, StateStore) {
        let temp = tempfile::tempdir().unwrap();
        let store = StateStore::new(temp.path().join(".state.json"));
        (temp, store)
    }

    #[test]
    fn test_missing_file_is_empty() {
        let (_temp, store) = store();
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_save_then_load() {
        let (_temp, store) = store();
        let state: ActiveState = ["grafana", "prometheus"].into_iter().collect();
        store.save(&state).unwrap();
        assert_eq!(store.load(), state);
    }

    #[test]
    fn test_file_format_uses_active_key() {
        let (_temp, store) = store();
        store
            .save(&["redis"].into_iter().collect())
            .unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(raw["active"], serde_json::json!(["redis"]));
        assert!(!store.path().with_extension("tmp").exists());
    }

    #[test]
    fn test_corrupt_file_is_empty() {
        let (_temp, store) = store();
        fs::write(store.path(), "{\"active\": [1, 2").unwrap();
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_wrong_shape_is_empty() {
        let (_temp, store) = store();
        fs::write(store.path(), r#"{"active": "grafana"}"#).unwrap();
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_save_keeps_unknown_keys() {
        let (_temp, store) = store();
        fs::write(store.path(), r#"{"active": ["a"], "note": "kept"}"#).unwrap();

        store.save(&["b"].into_iter().collect()).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(raw["active"], serde_json::json!(["b"]));
        assert_eq!(raw["note"], "kept");
    }

    #[test]
    fn test_clear_missing_file_is_ok() {
        let (_temp, store) = store();
        store.clear().unwrap();
        store.save(&ActiveState::new()).unwrap();
        store.clear().unwrap();
        assert!(!store.path().exists());
    }
}
