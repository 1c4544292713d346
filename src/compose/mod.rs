//! Composition merging.
//!
//! Every service directory carries its own compose fragment. The merger
//! folds them into one unified manifest attached to a single external
//! network. Fragments are handled as untyped YAML trees so fields this
//! crate knows nothing about pass through unmodified.

mod merger;
pub mod normalize;

pub use merger::{CompositionMerger, MergeOutcome, MergeWarning};

use crate::error::{Error, Result};
use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::Path;

/// The merged document handed to `docker compose -f`.
#[derive(Debug, Clone, PartialEq)]
pub struct UnifiedComposition {
    services: Mapping,
    volumes: Mapping,
    network: String,
}

impl UnifiedComposition {
    pub fn new(network: impl Into<String>) -> Self {
        Self {
            services: Mapping::new(),
            volumes: Mapping::new(),
            network: network.into(),
        }
    }

    pub fn services(&self) -> &Mapping {
        &self.services
    }

    pub fn service(&self, name: &str) -> Option<&Value> {
        self.services.get(name)
    }

    pub fn service_names(&self) -> Vec<String> {
        self.services
            .keys()
            .filter_map(|k| k.as_str().map(String::from))
            .collect()
    }

    pub fn volumes(&self) -> &Mapping {
        &self.volumes
    }

    pub fn network(&self) -> &str {
        &self.network
    }

    /// Last writer wins: a later fragment replaces the whole service.
    pub(crate) fn insert_service(&mut self, name: String, config: Mapping) {
        if self.services.contains_key(name.as_str()) {
            tracing::debug!("Service '{}' redefined by a later fragment", name);
        }
        self.services
            .insert(Value::String(name), Value::Mapping(config));
    }

    /// First writer wins: an already-declared named volume is kept.
    pub(crate) fn insert_volume(&mut self, name: Value, config: Value) {
        if !self.volumes.contains_key(&name) {
            self.volumes.insert(name, config);
        }
    }

    /// `{services, volumes, networks: {<network>: {external: true}}}`
    pub fn to_value(&self) -> Value {
        let mut external = Mapping::new();
        external.insert(Value::String("external".to_string()), Value::Bool(true));

        let mut networks = Mapping::new();
        networks.insert(
            Value::String(self.network.clone()),
            Value::Mapping(external),
        );

        let mut root = Mapping::new();
        root.insert(
            Value::String("services".to_string()),
            Value::Mapping(self.services.clone()),
        );
        root.insert(
            Value::String("volumes".to_string()),
            Value::Mapping(self.volumes.clone()),
        );
        root.insert(
            Value::String("networks".to_string()),
            Value::Mapping(networks),
        );
        Value::Mapping(root)
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(&self.to_value())?)
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                Error::Filesystem(format!(
                    "Failed to create '{}': {}",
                    parent.display(),
                    e
                ))
            })?;
        }
        fs::write(path, self.to_yaml()?)?;
        tracing::debug!(
            "Wrote unified manifest with {} service(s) to {}",
            self.services.len(),
            path.display()
        );
        Ok(())
    }
}
