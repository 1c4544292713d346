use crate::output::UserOutput;
use devstack::catalog::discover;
use devstack::config::Workspace;

pub fn run_list(
    workspace: &Workspace,
    category: Option<String>,
    out: &dyn UserOutput,
) -> anyhow::Result<()> {
    let catalog = discover(workspace);

    if let Some(filter) = category {
        out.status(&format!("Services in {}", filter));
        for descriptor in catalog.matching_category(&filter) {
            out.item(&format!("- {}", descriptor.name));
        }
        return Ok(());
    }

    out.status("Available services");

    out.blank();
    out.heading("CORE:");
    for name in catalog.core_names() {
        out.item(&format!("- {}", name));
    }

    for (root, title) in [("infra", "INFRA:"), ("modules", "MODULES:")] {
        out.blank();
        out.heading(title);
        for (subcategory, names) in catalog.grouped(root) {
            out.item(&format!("[{}] {}", subcategory, names.join(", ")));
        }
    }

    Ok(())
}
