//! The external orchestration tool boundary.
//!
//! The lifecycle only ever asks two things of the container runtime: make
//! sure the shared network exists, and run one compose action against the
//! unified manifest. Success is the tool's exit status and nothing else.

pub mod client;
mod compose;

pub use client::DockerClient;
pub use compose::{services_from_containers, DockerCompose};

use crate::error::Result;
use async_trait::async_trait;
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComposeAction {
    /// `up -d --remove-orphans`
    Up,
    /// `down --remove-orphans`
    Down,
    /// `restart [service...]`, the whole project when empty
    Restart { services: Vec<String> },
    Ps,
    /// `logs -f [service]`
    Logs { service: Option<String> },
}

impl ComposeAction {
    pub fn name(&self) -> &'static str {
        match self {
            ComposeAction::Up => "up",
            ComposeAction::Down => "down",
            ComposeAction::Restart { .. } => "restart",
            ComposeAction::Ps => "ps",
            ComposeAction::Logs { .. } => "logs",
        }
    }

    pub fn args(&self) -> Vec<String> {
        let args: Vec<&str> = match self {
            ComposeAction::Up => vec!["up", "-d", "--remove-orphans"],
            ComposeAction::Down => vec!["down", "--remove-orphans"],
            ComposeAction::Ps => vec!["ps"],
            ComposeAction::Restart { services } => {
                let mut args = vec!["restart".to_string()];
                args.extend(services.iter().cloned());
                return args;
            }
            ComposeAction::Logs { service } => {
                let mut args = vec!["logs".to_string(), "-f".to_string()];
                args.extend(service.iter().cloned());
                return args;
            }
        };
        args.into_iter().map(String::from).collect()
    }
}

impl fmt::Display for ComposeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One call of the compose CLI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposeInvocation {
    pub project: String,
    pub manifest: Option<PathBuf>,
    pub env_file: Option<PathBuf>,
    pub action: ComposeAction,
}

impl ComposeInvocation {
    pub fn new(project: impl Into<String>, action: ComposeAction) -> Self {
        Self {
            project: project.into(),
            manifest: None,
            env_file: None,
            action,
        }
    }

    pub fn manifest(mut self, manifest: impl Into<PathBuf>) -> Self {
        self.manifest = Some(manifest.into());
        self
    }

    /// Attach the env file, skipped when it does not exist on disk.
    pub fn env_file(mut self, env_file: impl Into<PathBuf>) -> Self {
        let env_file = env_file.into();
        if env_file.exists() {
            self.env_file = Some(env_file);
        }
        self
    }

    /// Arguments following `docker compose`.
    pub fn args(&self) -> Vec<String> {
        let mut args = vec!["-p".to_string(), self.project.clone()];
        if let Some(manifest) = &self.manifest {
            args.push("-f".to_string());
            args.push(manifest.display().to_string());
        }
        if let Some(env_file) = &self.env_file {
            args.push("--env-file".to_string());
            args.push(env_file.display().to_string());
        }
        args.extend(self.action.args());
        args
    }
}

/// Runs the external orchestration tool.
#[async_trait]
pub trait ComposeRunner: Send + Sync {
    /// Make sure the externally managed network exists.
    async fn ensure_network(&self, network: &str) -> Result<()>;

    /// Run one compose action; a non-zero exit is `Error::ApplyFailed`.
    async fn apply(&self, invocation: &ComposeInvocation) -> Result<()>;
}
