use miette::Diagnostic;
use std::io;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    #[diagnostic(
        code(devstack::config::error),
        help("Check devstack.yaml and the files under config/")
    )]
    Config(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Filesystem error: {0}")]
    #[diagnostic(code(devstack::filesystem::error))]
    Filesystem(String),

    #[error("Service not found: {0}")]
    #[diagnostic(
        code(devstack::service::not_found),
        help("List available services with `devstack list`")
    )]
    ServiceNotFound(String),

    #[error("Profile not found: {0}")]
    #[diagnostic(
        code(devstack::profile::not_found),
        help("List available profiles with `devstack profile --list`")
    )]
    ProfileNotFound(String),

    #[error("Profile '{0}' has no services")]
    #[diagnostic(code(devstack::profile::empty))]
    EmptyProfile(String),

    #[error("docker compose {action} failed{}",
        .exit_code
            .map(|code| format!(" with exit code {}", code))
            .unwrap_or_else(|| " (terminated by signal)".to_string())
    )]
    #[diagnostic(
        code(devstack::compose::apply_failed),
        help("Inspect the output above; the active service set was left unchanged")
    )]
    ApplyFailed {
        action: String,
        exit_code: Option<i32>,
    },

    #[error("Docker error: {0}")]
    #[diagnostic(
        code(devstack::docker::error),
        help("Check that Docker is running with `docker ps`")
    )]
    Docker(String),

    #[error("Docker Compose error: {0}")]
    #[diagnostic(
        code(devstack::compose::unavailable),
        help("Verify Docker is running with `docker ps`")
    )]
    DockerCompose(String),

    #[error("{0}")]
    #[diagnostic(code(devstack::usage))]
    Usage(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Returns a helpful suggestion for resolving this error, if available.
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Error::ServiceNotFound(name) => Some(format!(
                "No service directory named '{}' was discovered. Run 'devstack list' to see what is available.",
                name
            )),
            Error::ProfileNotFound(name) => Some(format!(
                "Create profiles/{}.yaml or run 'devstack profile --list'.",
                name
            )),
            Error::ApplyFailed { .. } => Some(
                "Fix the reported problem and re-run the command; nothing was recorded as active."
                    .to_string(),
            ),
            Error::DockerCompose(_) => {
                Some("Install Docker Compose v2 (`docker compose`) or v1 (`docker-compose`).".to_string())
            }
            Error::Usage(_) => Some("Run 'devstack --help' for usage.".to_string()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_failed_message_includes_exit_code() {
        let err = Error::ApplyFailed {
            action: "up".to_string(),
            exit_code: Some(17),
        };
        assert_eq!(err.to_string(), "docker compose up failed with exit code 17");
        assert!(err.suggestion().is_some());
    }

    #[test]
    fn test_apply_failed_without_exit_code() {
        let err = Error::ApplyFailed {
            action: "restart".to_string(),
            exit_code: None,
        };
        assert!(err.to_string().contains("terminated by signal"));
    }

    #[test]
    fn test_parse_has_no_suggestion() {
        assert!(Error::Parse("bad".to_string()).suggestion().is_none());
    }
}
