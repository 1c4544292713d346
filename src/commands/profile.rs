use super::join;
use crate::output::UserOutput;
use devstack::orchestrator::Lifecycle;

pub async fn run_profile(
    lifecycle: &Lifecycle,
    name: Option<String>,
    list: bool,
    out: &dyn UserOutput,
) -> anyhow::Result<()> {
    let workspace = lifecycle.workspace();

    let name = match name {
        Some(name) if !list => name,
        _ => {
            out.status("Available profiles");
            for profile in workspace.profiles()? {
                out.item(&format!("- {}: {}", profile.name, profile.description));
                out.item(&format!("  Services: {}", join(&profile.services)));
            }
            return Ok(());
        }
    };

    let profile = workspace.profile(&name)?;
    out.status(&format!("Profile: {}", profile.name));
    super::run_up(lifecycle, profile.services, false, out).await
}
