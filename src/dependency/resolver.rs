use crate::config::Parser;
use crate::error::Result;
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

/// Service name → direct dependency names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct DependencyTable {
    entries: BTreeMap<String, Option<Vec<String>>>,
}

impl DependencyTable {
    /// Load the table from YAML. A missing or empty file is an empty table.
    pub fn load(path: &Path) -> Result<Self> {
        Parser::new().load_yaml_or_default(path)
    }

    pub fn from_entries<I, S, D>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, Vec<D>)>,
        S: Into<String>,
        D: Into<String>,
    {
        let entries = entries
            .into_iter()
            .map(|(name, deps)| (name.into(), Some(deps.into_iter().map(Into::into).collect())))
            .collect();
        Self { entries }
    }

    /// Direct dependencies of `service`; empty when unlisted.
    pub fn dependencies_of(&self, service: &str) -> &[String] {
        self.entries
            .get(service)
            .and_then(|deps| deps.as_deref())
            .unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// `requested` plus the direct dependencies of each requested service.
///
/// Deliberately not transitively closed: with `{a: [b], b: [c]}`,
/// expanding `{a}` yields `{a, b}`. Dependency names are added whether or
/// not a service directory exists for them; the merge skips those that
/// don't.
pub fn expand(requested: &BTreeSet<String>, table: &DependencyTable) -> BTreeSet<String> {
    let mut result = requested.clone();
    for name in requested {
        result.extend(table.dependencies_of(name).iter().cloned());
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn set(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_expand_is_single_level() {
        let table = DependencyTable::from_entries([("a", vec!["b"]), ("b", vec!["c"])]);
        assert_eq!(expand(&set(&["a"]), &table), set(&["a", "b"]));
    }

    #[test]
    fn test_expand_keeps_unknown_dependencies() {
        let table = DependencyTable::from_entries([("n8n", vec!["postgres", "not-a-service"])]);
        assert_eq!(
            expand(&set(&["n8n"]), &table),
            set(&["n8n", "postgres", "not-a-service"])
        );
    }

    #[test]
    fn test_expand_unlisted_service_is_itself() {
        let table = DependencyTable::default();
        assert_eq!(expand(&set(&["grafana"]), &table), set(&["grafana"]));
    }

    #[test]
    fn test_expand_unions_shared_dependencies() {
        let table = DependencyTable::from_entries([
            ("n8n", vec!["postgres"]),
            ("airflow", vec!["postgres", "redis"]),
        ]);
        assert_eq!(
            expand(&set(&["n8n", "airflow"]), &table),
            set(&["airflow", "n8n", "postgres", "redis"])
        );
    }

    #[test]
    fn test_load_yaml_with_null_entry() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("dependencies.yaml");
        fs::write(&path, "n8n:\n  - postgres\nportainer:\n").unwrap();

        let table = DependencyTable::load(&path).unwrap();
        assert_eq!(table.dependencies_of("n8n"), ["postgres".to_string()]);
        assert!(table.dependencies_of("portainer").is_empty());
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let temp = tempfile::tempdir().unwrap();
        let table = DependencyTable::load(&temp.path().join("dependencies.yaml")).unwrap();
        assert!(table.is_empty());
    }
}
