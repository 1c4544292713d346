//! Dashboard notification boundary.
//!
//! After the active set changes the dashboards are told about it. The
//! notifier only sees the final list of active names and the catalog; how a
//! dashboard renders them is its own business.

use crate::catalog::{Catalog, ServiceDescriptor};
use crate::config::{DashboardConfig, Parser, Settings, Workspace};
use crate::docker::DockerClient;
use crate::error::{Error, Result};
use async_trait::async_trait;

#[async_trait]
pub trait DashboardNotifier: Send + Sync {
    /// `active` is the committed active set; `include_core` asks for core
    /// services to be listed as well.
    async fn notify(&self, active: &[String], catalog: &Catalog, include_core: bool) -> Result<()>;
}

/// Services a dashboard should list: core first when requested, then the
/// active services known to the catalog, all in catalog order.
pub fn visible_services<'a>(
    active: &[String],
    catalog: &'a Catalog,
    include_core: bool,
) -> Vec<&'a ServiceDescriptor> {
    catalog
        .iter()
        .filter(|d| (include_core && d.category.is_core()) || active.contains(&d.name))
        .collect()
}

/// Restarts each enabled dashboard's container so it picks up the new
/// service list.
pub struct ContainerDashboardNotifier {
    client: DockerClient,
    settings: Settings,
    config: DashboardConfig,
}

impl ContainerDashboardNotifier {
    pub fn new(settings: Settings, config: DashboardConfig) -> Self {
        Self {
            client: DockerClient::new(),
            settings,
            config,
        }
    }

    /// Reads `config/dashboard.yaml`, falling back to defaults.
    pub fn from_workspace(workspace: &Workspace) -> Result<Self> {
        let config = Parser::new().load_dashboard_config(&workspace.dashboard_config())?;
        Ok(Self::new(workspace.settings().clone(), config))
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }
}

#[async_trait]
impl DashboardNotifier for ContainerDashboardNotifier {
    async fn notify(&self, active: &[String], catalog: &Catalog, include_core: bool) -> Result<()> {
        let visible = visible_services(active, catalog, include_core);
        tracing::debug!(
            "Updating dashboards with {} service(s)",
            visible.len()
        );

        let mut failed = Vec::new();
        for dashboard in &self.config.enabled_dashboards {
            if !catalog.contains(dashboard) {
                tracing::debug!("Dashboard '{}' is not a discovered service, skipping", dashboard);
                continue;
            }
            let container = self.settings.container_name(dashboard);
            match self.client.restart_container(&container).await {
                Ok(()) => tracing::info!("Restarted dashboard {}", container),
                Err(e) => {
                    tracing::warn!("Failed to restart dashboard {}: {}", container, e);
                    failed.push(container);
                }
            }
        }

        if failed.is_empty() {
            Ok(())
        } else {
            Err(Error::Docker(format!(
                "failed to restart dashboard(s): {}",
                failed.join(", ")
            )))
        }
    }
}

/// Notifier that does nothing, for commands run without dashboards.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotifier;

#[async_trait]
impl DashboardNotifier for NoopNotifier {
    async fn notify(&self, _active: &[String], _catalog: &Catalog, _include_core: bool) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Category;

    fn catalog() -> Catalog {
        Catalog::from_descriptors([
            ServiceDescriptor::new("dashy", Category::Core, "/w/core/dashy"),
            ServiceDescriptor::new("traefik", Category::Core, "/w/core/traefik"),
            ServiceDescriptor::new("grafana", Category::Infra("monitoring".into()), "/w/infra/monitoring/grafana"),
            ServiceDescriptor::new("redis", Category::Infra("databases".into()), "/w/infra/databases/redis"),
        ])
    }

    #[test]
    fn test_visible_services_without_core() {
        let catalog = catalog();
        let active = vec!["grafana".to_string(), "unknown".to_string()];
        let names: Vec<&str> = visible_services(&active, &catalog, false)
            .iter()
            .map(|d| d.name.as_str())
            .collect();
        assert_eq!(names, vec!["grafana"]);
    }

    #[test]
    fn test_visible_services_with_core_first() {
        let catalog = catalog();
        let names: Vec<&str> = visible_services(&["redis".to_string()], &catalog, true)
            .iter()
            .map(|d| d.name.as_str())
            .collect();
        assert_eq!(names, vec!["dashy", "traefik", "redis"]);
    }

    #[tokio::test]
    async fn test_notifier_skips_dashboards_missing_from_catalog() {
        let config = DashboardConfig {
            enabled_dashboards: vec!["homepage".to_string()],
            ..DashboardConfig::default()
        };
        let notifier = ContainerDashboardNotifier::new(Settings::default(), config);
        notifier.notify(&[], &catalog(), false).await.unwrap();
    }
}
