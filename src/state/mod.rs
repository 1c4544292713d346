//! Persistent active-service state.
//!
//! The set of non-core services the operator asked for is stored as JSON in
//! `.state.json` at the workspace root:
//!
//! ```json
//! { "active": ["grafana", "prometheus"] }
//! ```
//!
//! It is loaded once at the start of a command and written at most once,
//! after the external apply succeeded. There is no locking; one invocation
//! at a time is assumed.

mod store;
mod types;

pub use store::StateStore;
pub use types::ActiveState;
