use super::up::print_urls;
use crate::cli::CoreCommands;
use crate::output::UserOutput;
use devstack::orchestrator::{Lifecycle, LifecycleCommand};

pub async fn run_core(
    lifecycle: &Lifecycle,
    action: CoreCommands,
    out: &dyn UserOutput,
) -> anyhow::Result<()> {
    match action {
        CoreCommands::Up => {
            out.status("Starting core...");
            let report = lifecycle.run(LifecycleCommand::CoreUp).await?;
            super::report_merge_warnings(&report, out);
            out.success("Core started");
            print_urls(lifecycle.workspace().settings(), &report.applied, out);
        }
        CoreCommands::Down => {
            out.status("Stopping core...");
            lifecycle.run(LifecycleCommand::CoreDown).await?;
            out.success("Core stopped");
        }
        CoreCommands::Restart => {
            out.status("Restarting core...");
            lifecycle.run(LifecycleCommand::CoreRestart).await?;
            out.success("Core restarted");
        }
    }
    Ok(())
}
