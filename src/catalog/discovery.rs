use super::{Catalog, Category, ServiceDescriptor};
use crate::config::Workspace;
use std::fs;
use std::path::{Path, PathBuf};

/// Scan the workspace roots and build a fresh catalog.
///
/// Layout: `core/<service>`, `infra/<category>/<service>` and
/// `modules/<category>/<service>`. Missing roots are empty. Problems with
/// individual entries become warnings on the returned catalog; discovery
/// itself never fails.
pub fn discover(workspace: &Workspace) -> Catalog {
    let settings = workspace.settings();
    let scanner = Scanner {
        manifest_file: &settings.manifest_file,
        metadata_file: &settings.metadata_file,
    };

    let mut catalog = Catalog::new();
    scanner.scan_flat(&mut catalog, &workspace.core_dir());
    scanner.scan_nested(&mut catalog, &workspace.infra_dir(), Category::Infra);
    scanner.scan_nested(&mut catalog, &workspace.modules_dir(), Category::Modules);

    tracing::debug!(
        "Discovered {} service(s) under {}",
        catalog.len(),
        workspace.root().display()
    );
    catalog
}

struct Scanner<'a> {
    manifest_file: &'a str,
    metadata_file: &'a str,
}

impl Scanner<'_> {
    fn scan_flat(&self, catalog: &mut Catalog, root: &Path) {
        for dir in subdirectories(catalog, root) {
            self.register(catalog, &dir, Category::Core);
        }
    }

    fn scan_nested(
        &self,
        catalog: &mut Catalog,
        root: &Path,
        category: fn(String) -> Category,
    ) {
        for category_dir in subdirectories(catalog, root) {
            let label = file_name(&category_dir);
            for dir in subdirectories(catalog, &category_dir) {
                self.register(catalog, &dir, category(label.clone()));
            }
        }
    }

    fn register(&self, catalog: &mut Catalog, dir: &Path, category: Category) {
        if !dir.join(self.manifest_file).is_file() {
            return;
        }

        let mut descriptor = ServiceDescriptor::new(file_name(dir), category, dir);

        let metadata_path = dir.join(self.metadata_file);
        if metadata_path.exists() {
            match read_metadata(&metadata_path) {
                Ok(metadata) => descriptor = descriptor.with_metadata(metadata),
                Err(message) => {
                    catalog.warn(metadata_path, message);
                    return;
                }
            }
        }

        catalog.insert(descriptor);
    }
}

fn read_metadata(path: &Path) -> std::result::Result<serde_json::Value, String> {
    let content =
        fs::read_to_string(path).map_err(|e| format!("unreadable metadata file: {}", e))?;
    serde_json::from_str(&content).map_err(|e| format!("invalid metadata JSON: {}", e))
}

/// Child directories of `dir`, sorted by name. A missing directory is
/// empty; an unreadable one is reported and treated as empty.
fn subdirectories(catalog: &mut Catalog, dir: &Path) -> Vec<PathBuf> {
    if !dir.exists() {
        return Vec::new();
    }

    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            catalog.warn(dir.to_path_buf(), format!("unreadable directory: {}", e));
            return Vec::new();
        }
    };

    let mut dirs: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect();
    dirs.sort();
    dirs
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}
