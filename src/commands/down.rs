use super::join;
use crate::output::UserOutput;
use devstack::orchestrator::{DownTarget, Lifecycle, LifecycleCommand};

pub async fn run_down(
    lifecycle: &Lifecycle,
    services: Vec<String>,
    all: bool,
    out: &dyn UserOutput,
) -> anyhow::Result<()> {
    let target = if all {
        out.status("Stopping all services...");
        DownTarget::All
    } else {
        if !services.is_empty() {
            out.status(&format!("Stopping: {}", join(&services)));
        }
        DownTarget::Services(services)
    };

    let report = lifecycle.run(LifecycleCommand::Down(target)).await?;
    super::report_merge_warnings(&report, out);

    if all {
        out.success("All services stopped");
    } else {
        out.success("Services stopped");
        if !report.active.is_empty() {
            out.status(&format!("Still active: {}", join(report.active.services())));
        }
    }
    Ok(())
}
