//! Plain `docker` CLI calls used around the compose apply.
//!
//! These are short housekeeping commands (network management, restarting a
//! single container) so each one runs under a timeout. The compose apply
//! itself is not time-limited.

use crate::error::{Error, Result};
use std::process::Output;
use std::time::Duration;

const DOCKER_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Default)]
pub struct DockerClient;

impl DockerClient {
    pub fn new() -> Self {
        DockerClient
    }

    /// Run a docker command with a timeout, returning raw Output.
    async fn run(&self, args: &[&str]) -> Result<Output> {
        let cmd_str = format!("docker {}", args.join(" "));
        tracing::debug!("Running: {}", cmd_str);

        let result = tokio::time::timeout(
            DOCKER_TIMEOUT,
            tokio::process::Command::new("docker").args(args).output(),
        )
        .await;

        match result {
            Ok(Ok(output)) => Ok(output),
            Ok(Err(e)) => Err(Error::Docker(format!("Failed to run '{}': {}", cmd_str, e))),
            Err(_) => Err(Error::Docker(format!(
                "Timed out running '{}' (exceeded {} seconds)",
                cmd_str,
                DOCKER_TIMEOUT.as_secs()
            ))),
        }
    }

    /// Run a docker command, returning Output only if exit 0.
    async fn run_success(&self, args: &[&str]) -> Result<Output> {
        let output = self.run(args).await?;
        if output.status.success() {
            Ok(output)
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(Error::Docker(format!(
                "'docker {}' failed: {}",
                args.join(" "),
                stderr.trim()
            )))
        }
    }

    pub async fn network_names(&self) -> Result<Vec<String>> {
        let output = self
            .run_success(&["network", "ls", "--format", "{{.Name}}"])
            .await?;
        Ok(stdout_lines(&output))
    }

    /// Create `network` unless a network of that name already exists.
    pub async fn ensure_network(&self, network: &str) -> Result<()> {
        if self.network_names().await?.iter().any(|n| n == network) {
            return Ok(());
        }
        tracing::info!("Creating network {}...", network);
        self.run_success(&["network", "create", network]).await?;
        Ok(())
    }

    pub async fn restart_container(&self, container: &str) -> Result<()> {
        self.run_success(&["restart", container]).await?;
        Ok(())
    }
}

/// Non-empty, trimmed stdout lines.
pub(crate) fn stdout_lines(output: &Output) -> Vec<String> {
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
