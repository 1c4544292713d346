use super::{Parser, Profile, Settings};
use crate::error::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};

pub const SETTINGS_FILE: &str = "devstack.yaml";

/// The fixed on-disk layout of a development environment.
///
/// ```text
/// <root>/
///   devstack.yaml                optional settings
///   core/<service>/              always started
///   infra/<category>/<service>/
///   modules/<category>/<service>/
///   config/dependencies.yaml     single-level dependency table
///   config/credentials.env
///   config/services.env
///   config/dashboard.yaml
///   profiles/<name>.yaml
///   .temp/                       generated manifest and env file
///   logs/
///   .state.json                  active service set
/// ```
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
    settings: Settings,
}

impl Workspace {
    pub fn new(root: impl Into<PathBuf>, settings: Settings) -> Self {
        Self {
            root: root.into(),
            settings,
        }
    }

    /// Locate the workspace root and load its settings.
    ///
    /// Priority:
    /// 1. the explicit `--workdir`
    /// 2. the nearest ancestor of the current directory holding `devstack.yaml`
    /// 3. the current directory
    pub fn locate(workdir: Option<PathBuf>) -> Result<Self> {
        let root = match workdir {
            Some(dir) => dir,
            None => {
                let cwd = std::env::current_dir()?;
                Parser::find_settings_in_dir(&cwd)
                    .and_then(|path| path.parent().map(Path::to_path_buf))
                    .unwrap_or(cwd)
            }
        };
        let root = root.canonicalize().unwrap_or(root);
        Self::open(root)
    }

    /// Open a workspace at `root`, reading `devstack.yaml` if present.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let settings = Parser::new().load_settings(&root.join(SETTINGS_FILE))?;
        Ok(Self::new(root, settings))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn core_dir(&self) -> PathBuf {
        self.root.join("core")
    }

    pub fn infra_dir(&self) -> PathBuf {
        self.root.join("infra")
    }

    pub fn modules_dir(&self) -> PathBuf {
        self.root.join("modules")
    }

    pub fn config_dir(&self) -> PathBuf {
        self.root.join("config")
    }

    pub fn profiles_dir(&self) -> PathBuf {
        self.root.join("profiles")
    }

    pub fn temp_dir(&self) -> PathBuf {
        self.root.join(".temp")
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.root.join("logs")
    }

    pub fn dependencies_file(&self) -> PathBuf {
        self.config_dir().join("dependencies.yaml")
    }

    pub fn credentials_env(&self) -> PathBuf {
        self.config_dir().join("credentials.env")
    }

    pub fn services_env(&self) -> PathBuf {
        self.config_dir().join("services.env")
    }

    pub fn dashboard_config(&self) -> PathBuf {
        self.config_dir().join("dashboard.yaml")
    }

    pub fn state_file(&self) -> PathBuf {
        self.root.join(".state.json")
    }

    /// Unified manifest handed to `docker compose -f`.
    pub fn manifest_path(&self) -> PathBuf {
        self.temp_dir().join("docker-compose.yml")
    }

    pub fn env_file_path(&self) -> PathBuf {
        self.temp_dir().join(".env")
    }

    pub fn profile_path(&self, name: &str) -> PathBuf {
        self.profiles_dir().join(format!("{}.yaml", name))
    }

    /// Load a profile that can be started: it must exist and list services.
    pub fn profile(&self, name: &str) -> Result<Profile> {
        let path = self.profile_path(name);
        if !path.exists() {
            return Err(Error::ProfileNotFound(name.to_string()));
        }
        let profile = Parser::new().load_profile(&path)?;
        if profile.services.is_empty() {
            return Err(Error::EmptyProfile(name.to_string()));
        }
        Ok(profile)
    }

    /// Every `profiles/*.yaml`, sorted by name. Unparseable files are
    /// skipped with a warning.
    pub fn profiles(&self) -> Result<Vec<Profile>> {
        let dir = self.profiles_dir();
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let parser = Parser::new();
        let mut profiles = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("yaml") {
                continue;
            }
            match parser.load_profile(&path) {
                Ok(profile) => profiles.push(profile),
                Err(e) => tracing::warn!("Skipping profile {}: {}", path.display(), e),
            }
        }
        profiles.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(profiles)
    }
}
