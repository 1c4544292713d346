use super::confirm::{Confirm, TerminalConfirm};
use super::Lifecycle;
use crate::config::Workspace;
use crate::dashboard::{ContainerDashboardNotifier, DashboardNotifier};
use crate::docker::{ComposeRunner, DockerCompose};
use crate::error::{Error, Result};
use crate::state::StateStore;
use std::sync::Arc;

/// Builder for constructing a [`Lifecycle`] with a fluent API.
///
/// Only the workspace is required. Collaborators left unset default to the
/// real ones: `docker compose`, container-restart dashboards and a terminal
/// prompt.
///
/// # Example
///
/// ```no_run
/// use devstack::config::Workspace;
/// use devstack::orchestrator::{AlwaysConfirm, Lifecycle, LifecycleCommand};
///
/// # async fn example() -> Result<(), devstack::Error> {
/// let lifecycle = Lifecycle::builder()
///     .workspace(Workspace::locate(None)?)
///     .confirm(AlwaysConfirm)
///     .build()?;
/// lifecycle.run(LifecycleCommand::CoreUp).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct LifecycleBuilder {
    workspace: Option<Workspace>,
    runner: Option<Arc<dyn ComposeRunner>>,
    notifier: Option<Arc<dyn DashboardNotifier>>,
    confirm: Option<Arc<dyn Confirm>>,
}

impl LifecycleBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the workspace. Required.
    pub fn workspace(mut self, workspace: Workspace) -> Self {
        self.workspace = Some(workspace);
        self
    }

    /// Set the runner used for network checks and compose applies.
    pub fn runner(mut self, runner: impl ComposeRunner + 'static) -> Self {
        self.runner = Some(Arc::new(runner));
        self
    }

    pub fn notifier(mut self, notifier: impl DashboardNotifier + 'static) -> Self {
        self.notifier = Some(Arc::new(notifier));
        self
    }

    pub fn confirm(mut self, confirm: impl Confirm + 'static) -> Self {
        self.confirm = Some(Arc::new(confirm));
        self
    }

    /// # Errors
    ///
    /// Returns an error if no workspace was set or `config/dashboard.yaml`
    /// cannot be parsed.
    pub fn build(self) -> Result<Lifecycle> {
        let workspace = self
            .workspace
            .ok_or_else(|| Error::Config("workspace is required".to_string()))?;

        let notifier = match self.notifier {
            Some(notifier) => notifier,
            None => Arc::new(ContainerDashboardNotifier::from_workspace(&workspace)?),
        };

        Ok(Lifecycle {
            store: StateStore::new(workspace.state_file()),
            runner: self.runner.unwrap_or_else(|| Arc::new(DockerCompose::new())),
            notifier,
            confirm: self.confirm.unwrap_or_else(|| Arc::new(TerminalConfirm)),
            workspace,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::dashboard::NoopNotifier;

    #[test]
    fn test_build_requires_workspace() {
        assert!(matches!(
            LifecycleBuilder::new().build(),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_state_store_lives_in_workspace() {
        let temp = tempfile::tempdir().unwrap();
        let lifecycle = Lifecycle::builder()
            .workspace(Workspace::new(temp.path(), Settings::default()))
            .notifier(NoopNotifier)
            .build()
            .unwrap();
        assert_eq!(lifecycle.store().path(), temp.path().join(".state.json"));
    }
}
