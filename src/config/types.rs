use serde::{Deserialize, Serialize};

pub const DEFAULT_NETWORK: &str = "infra-network";
pub const DEFAULT_PROJECT: &str = "infra";
pub const DEFAULT_MANIFEST_FILE: &str = "docker-compose.yml";
pub const DEFAULT_METADATA_FILE: &str = "service.json";
pub const DEFAULT_URL_TEMPLATE: &str = "http://{name}.127.0.0.1.traefik.me:9000";

/// Workspace-wide settings read from `devstack.yaml`.
///
/// Every field is optional in the file; missing fields take the defaults
/// above so an absent settings file behaves exactly like an empty one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Externally managed network every merged service attaches to.
    pub network: String,
    /// Compose project name passed as `-p`.
    pub project: String,
    /// File name that marks a directory as a service.
    pub manifest_file: String,
    /// Optional per-service metadata file (JSON).
    pub metadata_file: String,
    /// URL shown for started services; `{name}` is replaced by the service name.
    pub url_template: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            network: DEFAULT_NETWORK.to_string(),
            project: DEFAULT_PROJECT.to_string(),
            manifest_file: DEFAULT_MANIFEST_FILE.to_string(),
            metadata_file: DEFAULT_METADATA_FILE.to_string(),
            url_template: DEFAULT_URL_TEMPLATE.to_string(),
        }
    }
}

impl Settings {
    pub fn url_for(&self, service: &str) -> String {
        self.url_template.replace("{name}", service)
    }

    /// Container name the project gives a service (`<service>-<project>`).
    pub fn container_name(&self, service: &str) -> String {
        format!("{}-{}", service, self.project)
    }
}

/// `config/dashboard.yaml`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub enabled_dashboards: Vec<String>,
    pub theme: String,
    pub title: String,
    pub description: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            enabled_dashboards: vec!["dashy".to_string()],
            theme: "glass".to_string(),
            title: "Dev Infrastructure".to_string(),
            description: "Development Dashboard".to_string(),
        }
    }
}

/// A named, reusable service selection stored under `profiles/<name>.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    #[serde(skip)]
    pub name: String,
    pub description: String,
    pub services: Vec<String>,
}
