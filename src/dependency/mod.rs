//! Static service dependencies.
//!
//! `config/dependencies.yaml` maps a service to the services it needs:
//!
//! ```yaml
//! n8n: [postgres, redis]
//! grafana: [prometheus]
//! ```
//!
//! Expansion is single-level. Only the direct dependencies of a requested
//! service are added; dependencies of those dependencies are not.

mod resolver;

pub use resolver::{expand, DependencyTable};
