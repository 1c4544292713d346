//! Discovery over a temp workspace.

mod common;

use common::{add_service, sample_workspace, write_file};
use devstack::catalog::{discover, Category};
use devstack::config::{Settings, Workspace};
use std::collections::BTreeSet;

#[test]
fn test_discovers_all_roots_in_catalog_order() {
    let temp = sample_workspace();
    let workspace = Workspace::new(temp.path(), Settings::default());

    let catalog = discover(&workspace);
    let order: Vec<&str> = catalog.iter().map(|d| d.name.as_str()).collect();

    assert_eq!(
        order,
        vec!["dashy", "traefik", "grafana", "postgres", "prometheus", "redis", "n8n"]
    );
    assert_eq!(
        catalog.find("grafana").unwrap().category,
        Category::Infra("monitoring".to_string())
    );
    assert!(catalog.warnings().is_empty());
}

#[test]
fn test_directories_without_manifest_are_ignored() {
    let temp = tempfile::tempdir().unwrap();
    add_service(temp.path(), "core/traefik");
    write_file(&temp.path().join("core/notes/README.md"), "not a service");

    let catalog = discover(&Workspace::new(temp.path(), Settings::default()));

    assert_eq!(catalog.len(), 1);
    assert!(catalog.find("notes").is_none());
}

#[test]
fn test_missing_roots_are_empty() {
    let temp = tempfile::tempdir().unwrap();
    let catalog = discover(&Workspace::new(temp.path(), Settings::default()));
    assert!(catalog.is_empty());
    assert!(catalog.warnings().is_empty());
}

#[test]
fn test_bad_metadata_skips_service_with_warning() {
    let temp = tempfile::tempdir().unwrap();
    add_service(temp.path(), "infra/databases/redis");
    add_service(temp.path(), "infra/databases/mongo");
    write_file(
        &temp.path().join("infra/databases/mongo/service.json"),
        "{ not json",
    );
    write_file(
        &temp.path().join("infra/databases/redis/service.json"),
        r#"{"description": "Key-value store"}"#,
    );

    let catalog = discover(&Workspace::new(temp.path(), Settings::default()));

    assert!(catalog.find("mongo").is_none());
    assert_eq!(catalog.warnings().len(), 1);
    let redis = catalog.find("redis").unwrap();
    assert_eq!(
        redis.metadata.as_ref().unwrap()["description"],
        "Key-value store"
    );
}

#[test]
fn test_name_collision_keeps_earlier_root() {
    let temp = tempfile::tempdir().unwrap();
    add_service(temp.path(), "core/grafana");
    add_service(temp.path(), "infra/monitoring/grafana");

    let catalog = discover(&Workspace::new(temp.path(), Settings::default()));

    assert_eq!(catalog.find("grafana").unwrap().category, Category::Core);
    assert_eq!(catalog.warnings().len(), 1);
}

#[test]
fn test_paths_for_follows_catalog_order_and_skips_unknown() {
    let temp = sample_workspace();
    let catalog = discover(&Workspace::new(temp.path(), Settings::default()));
    let names: BTreeSet<String> = ["n8n", "traefik", "ghost", "redis"]
        .iter()
        .map(|s| s.to_string())
        .collect();

    let paths = catalog.paths_for(&names);

    assert_eq!(
        paths,
        vec![
            temp.path().join("core").join("traefik"),
            temp.path().join("infra").join("databases").join("redis"),
            temp.path().join("modules").join("automation").join("n8n"),
        ]
    );
}

#[test]
fn test_discovery_honours_custom_manifest_name() {
    let temp = tempfile::tempdir().unwrap();
    write_file(
        &temp.path().join("core/traefik/compose.yaml"),
        "services: {}\n",
    );
    let settings = Settings {
        manifest_file: "compose.yaml".to_string(),
        ..Settings::default()
    };

    let catalog = discover(&Workspace::new(temp.path(), settings));

    assert!(catalog.contains("traefik"));
}
