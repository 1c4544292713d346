//! Configuration parsing and types.
//!
//! - `types` - Settings, dashboard config and profiles
//! - `workspace` - The fixed directory layout rooted at the workspace
//! - `environment` - Combined `.env` generation
//! - `parser` - YAML config discovery and parsing

mod environment;
mod parser;
mod types;
mod workspace;

pub use environment::*;
pub use parser::*;
pub use types::*;
pub use workspace::*;
