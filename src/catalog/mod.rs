//! Service discovery.
//!
//! A service is any directory under the fixed roots that contains the
//! composition manifest. The catalog is rebuilt on every command and never
//! written back to disk.

mod discovery;

pub use discovery::discover;

use crate::error::{Error, Result};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::PathBuf;

/// Where a service was found.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum Category {
    Core,
    Infra(String),
    Modules(String),
}

impl Category {
    /// Top-level root directory name.
    pub fn root(&self) -> &'static str {
        match self {
            Category::Core => "core",
            Category::Infra(_) => "infra",
            Category::Modules(_) => "modules",
        }
    }

    pub fn subcategory(&self) -> Option<&str> {
        match self {
            Category::Core => None,
            Category::Infra(sub) | Category::Modules(sub) => Some(sub),
        }
    }

    pub fn is_core(&self) -> bool {
        matches!(self, Category::Core)
    }

    fn rank(&self) -> u8 {
        match self {
            Category::Core => 0,
            Category::Infra(_) => 1,
            Category::Modules(_) => 2,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.subcategory() {
            Some(sub) => write!(f, "{}/{}", self.root(), sub),
            None => write!(f, "{}", self.root()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceDescriptor {
    pub name: String,
    pub category: Category,
    /// Directory holding the service's manifest.
    pub path: PathBuf,
    /// Parsed metadata file, when the service ships one.
    pub metadata: Option<serde_json::Value>,
}

impl ServiceDescriptor {
    pub fn new(name: impl Into<String>, category: Category, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            category,
            path: path.into(),
            metadata: None,
        }
    }

    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

/// A problem found while scanning; the affected entry was skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryWarning {
    pub path: PathBuf,
    pub message: String,
}

impl fmt::Display for DiscoveryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path.display(), self.message)
    }
}

/// Read-only mapping from service name to descriptor.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    services: BTreeMap<String, ServiceDescriptor>,
    warnings: Vec<DiscoveryWarning>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from already-known descriptors. Earlier entries win
    /// on name collisions.
    pub fn from_descriptors(descriptors: impl IntoIterator<Item = ServiceDescriptor>) -> Self {
        let mut catalog = Self::new();
        for descriptor in descriptors {
            catalog.insert(descriptor);
        }
        catalog
    }

    /// Register a descriptor. The first registration of a name wins; later
    /// duplicates are recorded as warnings.
    pub(crate) fn insert(&mut self, descriptor: ServiceDescriptor) -> bool {
        if let Some(existing) = self.services.get(&descriptor.name) {
            let message = format!(
                "duplicate service '{}' ignored, already registered from {}",
                descriptor.name,
                existing.path.display()
            );
            self.warn(descriptor.path.clone(), message);
            return false;
        }
        self.services.insert(descriptor.name.clone(), descriptor);
        true
    }

    pub(crate) fn warn(&mut self, path: PathBuf, message: String) {
        tracing::warn!("Skipping {}: {}", path.display(), message);
        self.warnings.push(DiscoveryWarning { path, message });
    }

    pub fn find(&self, name: &str) -> Option<&ServiceDescriptor> {
        self.services.get(name)
    }

    /// Like [`Catalog::find`] but unknown names are an error.
    pub fn get(&self, name: &str) -> Result<&ServiceDescriptor> {
        self.find(name)
            .ok_or_else(|| Error::ServiceNotFound(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.services.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    pub fn warnings(&self) -> &[DiscoveryWarning] {
        &self.warnings
    }

    /// Descriptors in catalog order: core, then infra, then modules, names
    /// sorted within each root.
    pub fn iter(&self) -> impl Iterator<Item = &ServiceDescriptor> {
        let mut ordered: Vec<&ServiceDescriptor> = self.services.values().collect();
        ordered.sort_by(|a, b| {
            a.category
                .rank()
                .cmp(&b.category.rank())
                .then_with(|| a.name.cmp(&b.name))
        });
        ordered.into_iter()
    }

    pub fn core_names(&self) -> BTreeSet<String> {
        self.services
            .values()
            .filter(|d| d.category.is_core())
            .map(|d| d.name.clone())
            .collect()
    }

    /// Service directories for `names`, in catalog order. Names without a
    /// descriptor are skipped.
    pub fn paths_for(&self, names: &BTreeSet<String>) -> Vec<PathBuf> {
        for missing in names.iter().filter(|n| !self.contains(n)) {
            tracing::debug!("No service directory for '{}', skipping", missing);
        }
        self.iter()
            .filter(|d| names.contains(&d.name))
            .map(|d| d.path.clone())
            .collect()
    }

    /// Services outside `core` whose category label contains `filter`
    /// (case-insensitive).
    pub fn matching_category(&self, filter: &str) -> Vec<&ServiceDescriptor> {
        let needle = filter.to_lowercase();
        self.iter()
            .filter(|d| !d.category.is_core())
            .filter(|d| d.category.to_string().to_lowercase().contains(&needle))
            .collect()
    }

    /// Service names under `root` grouped by sub-category.
    pub fn grouped(&self, root: &str) -> BTreeMap<String, Vec<String>> {
        let mut groups: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for descriptor in self.iter().filter(|d| d.category.root() == root) {
            let key = descriptor
                .category
                .subcategory()
                .unwrap_or("other")
                .to_string();
            groups.entry(key).or_default().push(descriptor.name.clone());
        }
        groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Catalog {
        Catalog::from_descriptors([
            ServiceDescriptor::new("n8n", Category::Modules("automation".into()), "/w/modules/automation/n8n"),
            ServiceDescriptor::new("postgres", Category::Infra("databases".into()), "/w/infra/databases/postgres"),
            ServiceDescriptor::new("traefik", Category::Core, "/w/core/traefik"),
            ServiceDescriptor::new("dashy", Category::Core, "/w/core/dashy"),
        ])
    }

    #[test]
    fn test_category_display() {
        assert_eq!(Category::Core.to_string(), "core");
        assert_eq!(Category::Infra("databases".into()).to_string(), "infra/databases");
        assert_eq!(Category::Modules("ai".into()).to_string(), "modules/ai");
    }

    #[test]
    fn test_iter_is_catalog_order() {
        let catalog = sample();
        let names: Vec<&str> = catalog.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["dashy", "traefik", "postgres", "n8n"]);
    }

    #[test]
    fn test_core_names() {
        let catalog = sample();
        let core: Vec<String> = catalog.core_names().into_iter().collect();
        assert_eq!(core, vec!["dashy", "traefik"]);
    }

    #[test]
    fn test_paths_for_skips_unknown_names() {
        let catalog = sample();
        let names: BTreeSet<String> = ["n8n", "ghost", "traefik"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let paths = catalog.paths_for(&names);
        assert_eq!(
            paths,
            vec![
                PathBuf::from("/w/core/traefik"),
                PathBuf::from("/w/modules/automation/n8n"),
            ]
        );
    }

    #[test]
    fn test_duplicate_name_keeps_first() {
        let mut catalog = sample();
        let inserted = catalog.insert(ServiceDescriptor::new(
            "postgres",
            Category::Modules("data".into()),
            "/w/modules/data/postgres",
        ));
        assert!(!inserted);
        assert_eq!(
            catalog.get("postgres").unwrap().category,
            Category::Infra("databases".into())
        );
        assert_eq!(catalog.warnings().len(), 1);
    }

    #[test]
    fn test_get_unknown_is_error() {
        let catalog = sample();
        assert!(matches!(catalog.get("ghost"), Err(Error::ServiceNotFound(_))));
    }

    #[test]
    fn test_matching_category_is_case_insensitive_and_excludes_core() {
        let catalog = sample();
        let found: Vec<&str> = catalog
            .matching_category("DATA")
            .into_iter()
            .map(|d| d.name.as_str())
            .collect();
        assert_eq!(found, vec!["postgres"]);
        assert!(catalog.matching_category("core").is_empty());
    }

    #[test]
    fn test_grouped_by_subcategory() {
        let catalog = sample();
        let infra = catalog.grouped("infra");
        assert_eq!(infra.get("databases"), Some(&vec!["postgres".to_string()]));
        assert!(catalog.grouped("modules").contains_key("automation"));
    }
}
