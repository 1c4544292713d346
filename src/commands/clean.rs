use super::logs::project_invocation;
use crate::output::UserOutput;
use devstack::config::Workspace;
use devstack::docker::{ComposeAction, ComposeRunner};
use devstack::state::StateStore;
use std::fs;

pub async fn run_clean(
    workspace: &Workspace,
    runner: &dyn ComposeRunner,
    out: &dyn UserOutput,
) -> anyhow::Result<()> {
    out.status("Cleaning...");

    let invocation = project_invocation(workspace, ComposeAction::Down);
    if let Err(e) = runner.apply(&invocation).await {
        out.warning(&format!("Stopping the project failed: {}", e));
    }

    StateStore::new(workspace.state_file()).clear()?;

    let temp_dir = workspace.temp_dir();
    if temp_dir.exists() {
        fs::remove_dir_all(&temp_dir)?;
    }

    out.success("Cleanup completed");
    Ok(())
}
