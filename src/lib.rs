//! # devstack
//!
//! Manages a local multi-service development environment built from many
//! small `docker-compose.yml` fragments.
//!
//! ## Features
//!
//! - **Discovery**: services are directories under `core/`, `infra/<category>/`
//!   and `modules/<category>/` that contain a compose fragment
//! - **Dependencies**: a static, single-level table in `config/dependencies.yaml`
//! - **Merging**: fragments are folded into one manifest on a shared external
//!   network, with relative volume paths made absolute
//! - **Active state**: the requested set is persisted in `.state.json` so `up`,
//!   `add` and `down` compose across invocations
//!
//! ## Quick Start
//!
//! ```no_run
//! use devstack::config::Workspace;
//! use devstack::orchestrator::{Lifecycle, LifecycleCommand};
//!
//! # async fn example() -> Result<(), devstack::Error> {
//! let lifecycle = Lifecycle::builder()
//!     .workspace(Workspace::locate(None)?)
//!     .build()?;
//!
//! lifecycle.run(LifecycleCommand::CoreUp).await?;
//! let report = lifecycle
//!     .run(LifecycleCommand::Add {
//!         services: vec!["grafana".to_string()],
//!     })
//!     .await?;
//! println!("active: {:?}", report.active.names());
//! # Ok(())
//! # }
//! ```
//!
//! ## Concurrency Model
//!
//! One command per process. Steps run strictly in sequence and the state
//! file is not locked, so concurrent invocations against the same
//! workspace are not supported.

pub mod catalog;
pub mod compose;
pub mod config;
pub mod dashboard;
pub mod dependency;
pub mod docker;
pub mod error;
pub mod orchestrator;
pub mod state;

// Re-export commonly used types
pub use catalog::{discover, Catalog, Category, ServiceDescriptor};
pub use compose::{CompositionMerger, UnifiedComposition};
pub use config::{Parser, Settings, Workspace};
pub use error::{Error, Result};
pub use orchestrator::{Lifecycle, LifecycleCommand, Outcome};
pub use state::{ActiveState, StateStore};
