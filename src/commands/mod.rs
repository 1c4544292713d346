mod clean;
mod core;
mod down;
mod info;
mod list;
mod logs;
mod profile;
mod restart;
mod status;
mod up;

pub use clean::run_clean;
pub use core::run_core;
pub use down::run_down;
pub use info::run_info;
pub use list::run_list;
pub use logs::run_logs;
pub use profile::run_profile;
pub use restart::run_restart;
pub use status::{run_running, run_status};
pub use up::{run_add, run_up};

use crate::output::UserOutput;
use devstack::orchestrator::Report;

fn join<'a>(names: impl IntoIterator<Item = &'a String>) -> String {
    names
        .into_iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

fn report_merge_warnings(report: &Report, out: &dyn UserOutput) {
    for warning in &report.merge_warnings {
        out.warning(&format!("Skipped fragment {}", warning));
    }
}
