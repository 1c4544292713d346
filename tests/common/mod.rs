#![allow(dead_code)]

use async_trait::async_trait;
use devstack::catalog::Catalog;
use devstack::config::{Settings, Workspace};
use devstack::dashboard::DashboardNotifier;
use devstack::docker::{ComposeInvocation, ComposeRunner};
use devstack::orchestrator::{Confirm, Lifecycle};
use devstack::{Error, Result};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// One `apply` as the runner saw it, with the manifest as it was on disk.
#[derive(Debug, Clone)]
pub struct Applied {
    pub invocation: ComposeInvocation,
    pub manifest: Option<String>,
}

#[derive(Default)]
struct RunnerLog {
    applied: Vec<Applied>,
    networks: Vec<String>,
    fail_with: Option<Option<i32>>,
}

/// In-memory stand-in for `docker compose`.
#[derive(Clone, Default)]
pub struct FakeRunner {
    log: Arc<Mutex<RunnerLog>>,
}

impl FakeRunner {
    /// Make every following apply fail with `exit_code`.
    pub fn fail_with(&self, exit_code: Option<i32>) {
        self.log.lock().unwrap().fail_with = Some(exit_code);
    }

    pub fn succeed(&self) {
        self.log.lock().unwrap().fail_with = None;
    }

    pub fn applied(&self) -> Vec<Applied> {
        self.log.lock().unwrap().applied.clone()
    }

    pub fn actions(&self) -> Vec<String> {
        self.applied()
            .iter()
            .map(|a| a.invocation.action.name().to_string())
            .collect()
    }

    pub fn last_manifest(&self) -> Option<String> {
        self.applied().last().and_then(|a| a.manifest.clone())
    }

    pub fn networks(&self) -> Vec<String> {
        self.log.lock().unwrap().networks.clone()
    }
}

#[async_trait]
impl ComposeRunner for FakeRunner {
    async fn ensure_network(&self, network: &str) -> Result<()> {
        self.log.lock().unwrap().networks.push(network.to_string());
        Ok(())
    }

    async fn apply(&self, invocation: &ComposeInvocation) -> Result<()> {
        let manifest = invocation
            .manifest
            .as_ref()
            .and_then(|p| fs::read_to_string(p).ok());
        let mut log = self.log.lock().unwrap();
        log.applied.push(Applied {
            invocation: invocation.clone(),
            manifest,
        });
        match log.fail_with {
            Some(exit_code) => Err(Error::ApplyFailed {
                action: invocation.action.name().to_string(),
                exit_code,
            }),
            None => Ok(()),
        }
    }
}

/// A dashboard notification as received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub active: Vec<String>,
    pub include_core: bool,
}

#[derive(Clone, Default)]
pub struct RecordingNotifier {
    calls: Arc<Mutex<Vec<Notification>>>,
    fail: bool,
}

impl RecordingNotifier {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<Notification> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl DashboardNotifier for RecordingNotifier {
    async fn notify(&self, active: &[String], _catalog: &Catalog, include_core: bool) -> Result<()> {
        self.calls.lock().unwrap().push(Notification {
            active: active.to_vec(),
            include_core,
        });
        if self.fail {
            Err(Error::Docker("dashboard unavailable".to_string()))
        } else {
            Ok(())
        }
    }
}

/// Answers the confirmation prompt with a fixed value and counts questions.
#[derive(Clone)]
pub struct ScriptedConfirm {
    answer: bool,
    asked: Arc<AtomicUsize>,
}

impl ScriptedConfirm {
    pub fn answering(answer: bool) -> Self {
        Self {
            answer,
            asked: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn asked(&self) -> usize {
        self.asked.load(Ordering::SeqCst)
    }
}

impl Confirm for ScriptedConfirm {
    fn confirm(&self, _current: &BTreeSet<String>, _requested: &BTreeSet<String>) -> bool {
        self.asked.fetch_add(1, Ordering::SeqCst);
        self.answer
    }
}

pub fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

/// `<root>/<rel>/docker-compose.yml` defining one service named after the
/// last path segment.
pub fn add_service(root: &Path, rel: &str) {
    let name = rel.rsplit('/').next().unwrap();
    write_file(
        &root.join(rel).join("docker-compose.yml"),
        &format!("services:\n  {name}:\n    image: {name}:latest\n"),
    );
}

/// A workspace with two core services, four infra services, one module
/// and a dependency table.
pub fn sample_workspace() -> TempDir {
    let temp = tempfile::tempdir().unwrap();
    let root = temp.path();

    add_service(root, "core/traefik");
    add_service(root, "core/dashy");
    add_service(root, "infra/databases/redis");
    add_service(root, "infra/monitoring/grafana");
    add_service(root, "infra/monitoring/prometheus");
    add_service(root, "modules/automation/n8n");
    write_file(
        &root.join("infra/databases/postgres/docker-compose.yml"),
        "services:\n  postgres:\n    image: postgres:16\n    volumes:\n      - ./data:/var/lib/postgresql/data\n      - pgdata:/backup\nvolumes:\n  pgdata: {}\n",
    );
    write_file(
        &root.join("config/dependencies.yaml"),
        "n8n: [postgres, redis]\ngrafana: [prometheus]\nprometheus: [node-exporter]\nredis:\n",
    );
    write_file(&root.join("config/credentials.env"), "DB_PASSWORD=secret\n");

    temp
}

pub struct Harness {
    pub lifecycle: Lifecycle,
    pub runner: FakeRunner,
    pub notifier: RecordingNotifier,
    pub confirm: ScriptedConfirm,
}

pub fn harness(root: &Path) -> Harness {
    harness_with(root, RecordingNotifier::default(), ScriptedConfirm::answering(false))
}

pub fn harness_with(root: &Path, notifier: RecordingNotifier, confirm: ScriptedConfirm) -> Harness {
    let runner = FakeRunner::default();
    let lifecycle = Lifecycle::builder()
        .workspace(Workspace::new(root, Settings::default()))
        .runner(runner.clone())
        .notifier(notifier.clone())
        .confirm(confirm.clone())
        .build()
        .unwrap();
    Harness {
        lifecycle,
        runner,
        notifier,
        confirm,
    }
}

pub fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}
