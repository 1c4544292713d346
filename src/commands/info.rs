use crate::output::UserOutput;
use devstack::catalog::discover;
use devstack::config::Workspace;
use devstack::dependency::DependencyTable;
use std::fs;

const README_PREVIEW_CHARS: usize = 2000;

pub fn run_info(workspace: &Workspace, service: &str, out: &dyn UserOutput) -> anyhow::Result<()> {
    let catalog = discover(workspace);
    let descriptor = catalog.get(service)?;
    let table = DependencyTable::load(&workspace.dependencies_file())?;

    out.status(&format!("Info: {}", service));
    out.item(&format!("Category: {}", descriptor.category));
    out.item(&format!("Path: {}", descriptor.path.display()));

    let deps = table.dependencies_of(service);
    if !deps.is_empty() {
        out.item(&format!("Dependencies: {}", deps.join(", ")));
    }

    if let Some(description) = descriptor
        .metadata
        .as_ref()
        .and_then(|m| m.get("description"))
        .and_then(|d| d.as_str())
    {
        out.item(&format!("Description: {}", description));
    }

    out.item(&format!("URL: {}", workspace.settings().url_for(service)));

    let readme = descriptor.path.join("README.md");
    if readme.exists() {
        let content = fs::read_to_string(&readme)?;
        out.blank();
        out.heading("README:");
        out.status(&content.chars().take(README_PREVIEW_CHARS).collect::<String>());
    }

    Ok(())
}
