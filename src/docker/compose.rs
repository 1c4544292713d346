use super::client::{stdout_lines, DockerClient};
use super::{ComposeInvocation, ComposeRunner};
use crate::error::{Error, Result};
use async_trait::async_trait;
use std::process::Output;
use tokio::sync::OnceCell;

/// Docker Compose command type (v1 or v2)
#[derive(Debug, Clone, Copy)]
enum ComposeCommand {
    V2, // docker compose
    V1, // docker-compose
}

/// Global cache for compose command detection
static COMPOSE_COMMAND: OnceCell<ComposeCommand> = OnceCell::const_new();

impl ComposeCommand {
    /// Detect which docker compose command is available
    async fn detect() -> Result<ComposeCommand> {
        // Try docker compose (v2) first
        let v2_check = tokio::process::Command::new("docker")
            .args(["compose", "version"])
            .output()
            .await;

        if let Ok(output) = v2_check {
            if output.status.success() {
                return Ok(ComposeCommand::V2);
            }
        }

        // Try docker-compose (v1) as fallback
        let v1_check = tokio::process::Command::new("docker-compose")
            .args(["--version"])
            .output()
            .await;

        if let Ok(output) = v1_check {
            if output.status.success() {
                return Ok(ComposeCommand::V1);
            }
        }

        Err(Error::DockerCompose(
            "Neither 'docker compose' (v2) nor 'docker-compose' (v1) found. Please install Docker Compose.".to_string(),
        ))
    }

    /// Get the compose command (cached)
    async fn get() -> Result<ComposeCommand> {
        COMPOSE_COMMAND
            .get_or_try_init(|| async { Self::detect().await })
            .await
            .copied()
    }

    /// Get command and args for running compose
    fn command_and_args(&self) -> (&str, Vec<&str>) {
        match self {
            ComposeCommand::V2 => ("docker", vec!["compose"]),
            ComposeCommand::V1 => ("docker-compose", vec![]),
        }
    }
}

/// [`ComposeRunner`] backed by the real `docker compose` CLI.
///
/// Applies inherit stdio so the operator sees compose's own progress output.
#[derive(Debug, Clone, Default)]
pub struct DockerCompose {
    client: DockerClient,
}

impl DockerCompose {
    pub fn new() -> Self {
        Self {
            client: DockerClient::new(),
        }
    }

    pub fn client(&self) -> &DockerClient {
        &self.client
    }

    async fn build_command(&self, args: &[String]) -> Result<tokio::process::Command> {
        let compose_cmd = ComposeCommand::get().await?;
        let (cmd, base_args) = compose_cmd.command_and_args();

        let mut command = tokio::process::Command::new(cmd);
        command.args(base_args).args(args);
        Ok(command)
    }

    async fn capture(&self, project: &str, args: &[&str]) -> Result<Output> {
        let mut full = vec!["-p".to_string(), project.to_string()];
        full.extend(args.iter().map(|a| a.to_string()));

        let output = self
            .build_command(&full)
            .await?
            .output()
            .await
            .map_err(|e| Error::DockerCompose(e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::DockerCompose(stderr.trim().to_string()));
        }
        Ok(output)
    }

    /// `ps` rendered as a name/status table, `None` when nothing runs.
    pub async fn status_table(&self, project: &str) -> Result<Option<String>> {
        let output = self
            .capture(project, &["ps", "--format", "table {{.Name}}\t{{.Status}}"])
            .await?;
        let table = String::from_utf8_lossy(&output.stdout).to_string();
        if table.trim().is_empty() {
            Ok(None)
        } else {
            Ok(Some(table))
        }
    }

    /// Names of the project's containers.
    pub async fn container_names(&self, project: &str) -> Result<Vec<String>> {
        let output = self
            .capture(project, &["ps", "--format", "{{.Name}}"])
            .await?;
        Ok(stdout_lines(&output))
    }

    /// Services with a running container in the project, sorted.
    pub async fn running_services(&self, project: &str) -> Result<Vec<String>> {
        let containers = self.container_names(project).await?;
        Ok(services_from_containers(&containers, project))
    }
}

#[async_trait]
impl ComposeRunner for DockerCompose {
    async fn ensure_network(&self, network: &str) -> Result<()> {
        self.client.ensure_network(network).await
    }

    async fn apply(&self, invocation: &ComposeInvocation) -> Result<()> {
        let args = invocation.args();
        tracing::debug!("Running compose with args: {}", args.join(" "));

        let mut command = self.build_command(&args).await?;
        if let Some(dir) = invocation.manifest.as_ref().and_then(|m| m.parent()) {
            command.current_dir(dir);
        }

        let status = command
            .status()
            .await
            .map_err(|e| Error::DockerCompose(e.to_string()))?;

        if status.success() {
            Ok(())
        } else {
            Err(Error::ApplyFailed {
                action: invocation.action.name().to_string(),
                exit_code: status.code(),
            })
        }
    }
}

/// Containers are named `<service>-<project>`; keep the ones that follow
/// the convention and strip the suffix.
pub fn services_from_containers(containers: &[String], project: &str) -> Vec<String> {
    let suffix = format!("-{}", project);
    let mut services: Vec<String> = containers
        .iter()
        .filter_map(|c| c.strip_suffix(&suffix))
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect();
    services.sort();
    services.dedup();
    services
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_services_from_containers_filters_by_project_suffix() {
        let containers = vec![
            "grafana-infra".to_string(),
            "postgres-infra".to_string(),
            "unrelated-db".to_string(),
            "-infra".to_string(),
        ];
        assert_eq!(
            services_from_containers(&containers, "infra"),
            vec!["grafana", "postgres"]
        );
    }

    #[test]
    fn test_services_from_containers_other_project() {
        let containers = vec!["grafana-lab".to_string(), "grafana-infra".to_string()];
        assert_eq!(services_from_containers(&containers, "lab"), vec!["grafana"]);
    }
}
