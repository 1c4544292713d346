use super::{join, report_merge_warnings};
use crate::output::UserOutput;
use devstack::config::Settings;
use devstack::orchestrator::{Lifecycle, LifecycleCommand, Outcome, Report};

pub async fn run_up(
    lifecycle: &Lifecycle,
    services: Vec<String>,
    force: bool,
    out: &dyn UserOutput,
) -> anyhow::Result<()> {
    out.status(&format!("Starting: {}", join(&services)));

    let report = lifecycle
        .run(LifecycleCommand::Up { services, force })
        .await?;

    if report.outcome == Outcome::Declined {
        out.status("Nothing changed. Use `devstack add` to start services alongside the running ones");
        return Ok(());
    }

    if !report.dependencies.is_empty() {
        out.status(&format!("Dependencies: {}", join(&report.dependencies)));
    }
    report_merge_warnings(&report, out);
    out.success("Services started");
    print_urls(lifecycle.workspace().settings(), started(&report), out);

    Ok(())
}

pub async fn run_add(
    lifecycle: &Lifecycle,
    services: Vec<String>,
    out: &dyn UserOutput,
) -> anyhow::Result<()> {
    let report = lifecycle.run(LifecycleCommand::Add { services }).await?;

    if report.outcome == Outcome::NoChange {
        out.status("All requested services are already active");
        return Ok(());
    }

    out.status(&format!("Added: {}", join(&report.added)));
    if !report.dependencies.is_empty() {
        out.status(&format!("Dependencies: {}", join(&report.dependencies)));
    }
    report_merge_warnings(&report, out);
    out.success("Services added");
    print_urls(lifecycle.workspace().settings(), started(&report), out);

    Ok(())
}

/// Requested services and the dependencies they pulled in, core excluded.
fn started(report: &Report) -> impl Iterator<Item = &String> {
    report
        .added
        .union(&report.dependencies)
        .filter(move |name| report.active.contains(name))
}

pub(super) fn print_urls<'a>(
    settings: &Settings,
    services: impl IntoIterator<Item = &'a String>,
    out: &dyn UserOutput,
) {
    let urls: Vec<String> = services
        .into_iter()
        .map(|name| settings.url_for(name))
        .collect();
    if urls.is_empty() {
        return;
    }
    out.blank();
    out.status("Access URLs:");
    for url in urls {
        out.item(&url);
    }
}
