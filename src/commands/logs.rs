use crate::output::UserOutput;
use devstack::config::Workspace;
use devstack::docker::{ComposeAction, ComposeInvocation, ComposeRunner};

pub async fn run_logs(
    workspace: &Workspace,
    runner: &dyn ComposeRunner,
    service: Option<String>,
    out: &dyn UserOutput,
) -> anyhow::Result<()> {
    if let Some(service) = &service {
        out.status(&format!("Following logs for {}", service));
    }
    let invocation = project_invocation(workspace, ComposeAction::Logs { service });
    runner.apply(&invocation).await?;
    Ok(())
}

/// Invocation against the last generated manifest, if there is one.
pub(super) fn project_invocation(workspace: &Workspace, action: ComposeAction) -> ComposeInvocation {
    let mut invocation = ComposeInvocation::new(&workspace.settings().project, action);
    let manifest = workspace.manifest_path();
    if manifest.exists() {
        invocation = invocation
            .manifest(manifest)
            .env_file(workspace.env_file_path());
    }
    invocation
}
