//! Active-state lifecycle: `core`, `up`, `add`, `down` and `restart`.

mod builder;
mod confirm;
mod lifecycle;

pub use builder::LifecycleBuilder;
pub use confirm::{is_interactive, AlwaysConfirm, Confirm, NeverConfirm, TerminalConfirm};
pub use lifecycle::{DownTarget, Lifecycle, LifecycleCommand, Outcome, Report};
