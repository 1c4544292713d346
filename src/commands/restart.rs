use super::join;
use crate::output::UserOutput;
use devstack::orchestrator::{Lifecycle, LifecycleCommand};

pub async fn run_restart(
    lifecycle: &Lifecycle,
    services: Vec<String>,
    out: &dyn UserOutput,
) -> anyhow::Result<()> {
    if services.is_empty() {
        out.status("Restarting all running services...");
    } else {
        out.status(&format!("Restarting: {}", join(&services)));
    }
    lifecycle.run(LifecycleCommand::Restart { services }).await?;
    out.success("Services restarted");
    Ok(())
}
