use super::join;
use crate::output::UserOutput;
use devstack::config::Workspace;
use devstack::docker::DockerCompose;
use devstack::state::StateStore;

pub async fn run_status(
    workspace: &Workspace,
    compose: &DockerCompose,
    out: &dyn UserOutput,
) -> anyhow::Result<()> {
    let project = &workspace.settings().project;
    out.status("Current status");

    match compose.status_table(project).await {
        Ok(Some(table)) => out.item(table.trim_end()),
        Ok(None) => out.item("No running containers"),
        Err(e) => {
            tracing::debug!("ps failed: {}", e);
            out.item("No running containers");
        }
    }

    match compose.running_services(project).await {
        Ok(running) if !running.is_empty() => {
            out.blank();
            out.status(&format!("Running services (this environment): {}", join(&running)));
        }
        Ok(_) => {}
        Err(e) => tracing::debug!("Could not list running services: {}", e),
    }

    let active = StateStore::new(workspace.state_file()).load();
    if !active.is_empty() {
        out.status(&format!("Configured services: {}", join(active.services())));
    }

    Ok(())
}

pub async fn run_running(
    workspace: &Workspace,
    compose: &DockerCompose,
    out: &dyn UserOutput,
) -> anyhow::Result<()> {
    let running = compose.running_services(&workspace.settings().project).await?;
    if running.is_empty() {
        out.status("No services running in this environment");
        return Ok(());
    }

    out.status(&format!("Running services ({} total):", running.len()));
    for service in &running {
        out.item(&format!("- {}", service));
    }
    Ok(())
}
