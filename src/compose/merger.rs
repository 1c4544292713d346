use super::normalize::{attach_network, resolve_volumes};
use super::UnifiedComposition;
use crate::config::Settings;
use serde_yaml::{Mapping, Value};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// A fragment that could not be used; it was skipped as a whole.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeWarning {
    pub path: PathBuf,
    pub message: String,
}

impl fmt::Display for MergeWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path.display(), self.message)
    }
}

#[derive(Debug, Clone)]
pub struct MergeOutcome {
    pub composition: UnifiedComposition,
    pub warnings: Vec<MergeWarning>,
}

/// Folds per-service compose fragments into one [`UnifiedComposition`].
#[derive(Debug, Clone)]
pub struct CompositionMerger {
    network: String,
    manifest_file: String,
}

impl CompositionMerger {
    pub fn new(network: impl Into<String>, manifest_file: impl Into<String>) -> Self {
        Self {
            network: network.into(),
            manifest_file: manifest_file.into(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(&settings.network, &settings.manifest_file)
    }

    /// Merge the fragments found in `service_dirs`, in order.
    ///
    /// Services: last writer wins. Named volumes: first writer wins. A
    /// fragment that is missing, unreadable or malformed is skipped whole and
    /// reported in [`MergeOutcome::warnings`]; merging always completes.
    pub fn merge(&self, service_dirs: &[PathBuf]) -> MergeOutcome {
        let mut composition = UnifiedComposition::new(&self.network);
        let mut warnings = Vec::new();

        for dir in service_dirs {
            let manifest = dir.join(&self.manifest_file);
            match load_fragment(&manifest) {
                Ok(fragment) => self.apply(&mut composition, fragment, dir),
                Err(message) => {
                    tracing::warn!("Skipping fragment {}: {}", manifest.display(), message);
                    warnings.push(MergeWarning {
                        path: manifest,
                        message,
                    });
                }
            }
        }

        MergeOutcome {
            composition,
            warnings,
        }
    }

    fn apply(&self, composition: &mut UnifiedComposition, fragment: Fragment, dir: &Path) {
        for (name, mut config) in fragment.services {
            attach_network(&mut config, &self.network);
            resolve_volumes(&mut config, dir);
            composition.insert_service(name, config);
        }

        for (name, config) in fragment.volumes {
            composition.insert_volume(name, config);
        }
    }
}

/// A structurally valid fragment, ready to apply.
struct Fragment {
    services: Vec<(String, Mapping)>,
    volumes: Mapping,
}

type FragmentResult<T> = std::result::Result<T, String>;

fn load_fragment(path: &Path) -> FragmentResult<Fragment> {
    if !path.is_file() {
        return Err("manifest not found".to_string());
    }
    let content = fs::read_to_string(path).map_err(|e| format!("unreadable: {}", e))?;
    if content.trim().is_empty() {
        return parse_fragment(Value::Null);
    }
    let root: Value = serde_yaml::from_str(&content).map_err(|e| format!("invalid YAML: {}", e))?;
    parse_fragment(root)
}

/// Validate the whole tree before anything is applied so a bad fragment
/// never contributes part of itself.
fn parse_fragment(root: Value) -> FragmentResult<Fragment> {
    let mut root = match root {
        Value::Null => Mapping::new(),
        Value::Mapping(map) => map,
        other => return Err(format!("expected a mapping at top level, found {}", kind(&other))),
    };

    let services = match root.remove("services") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Mapping(services)) => parse_services(services)?,
        Some(other) => return Err(format!("'services' must be a mapping, found {}", kind(&other))),
    };

    let volumes = match root.remove("volumes") {
        None | Some(Value::Null) => Mapping::new(),
        Some(Value::Mapping(volumes)) => volumes,
        Some(other) => return Err(format!("'volumes' must be a mapping, found {}", kind(&other))),
    };

    Ok(Fragment { services, volumes })
}

fn parse_services(services: Mapping) -> FragmentResult<Vec<(String, Mapping)>> {
    let mut parsed = Vec::with_capacity(services.len());
    for (key, value) in services {
        let name = match key {
            Value::String(name) => name,
            other => return Err(format!("service name must be a string, found {}", kind(&other))),
        };
        let config = match value {
            Value::Mapping(config) => config,
            other => {
                return Err(format!(
                    "service '{}' must be a mapping, found {}",
                    name,
                    kind(&other)
                ))
            }
        };

        match config.get("networks") {
            None | Some(Value::Null) | Some(Value::Sequence(_)) | Some(Value::Mapping(_)) => {}
            Some(other) => {
                return Err(format!(
                    "service '{}': 'networks' must be a list or mapping, found {}",
                    name,
                    kind(other)
                ))
            }
        }
        match config.get("volumes") {
            None | Some(Value::Null) | Some(Value::Sequence(_)) => {}
            Some(other) => {
                return Err(format!(
                    "service '{}': 'volumes' must be a list, found {}",
                    name,
                    kind(other)
                ))
            }
        }

        parsed.push((name, config));
    }
    Ok(parsed)
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a list",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}
