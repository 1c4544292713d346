use super::builder::LifecycleBuilder;
use super::confirm::Confirm;
use crate::catalog::{discover, Catalog};
use crate::compose::{CompositionMerger, MergeWarning};
use crate::config::{generate_env_file, Workspace};
use crate::dashboard::DashboardNotifier;
use crate::dependency::{expand, DependencyTable};
use crate::docker::{ComposeAction, ComposeInvocation, ComposeRunner};
use crate::error::{Error, Result};
use crate::state::{ActiveState, StateStore};
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;

/// What `down` should stop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownTarget {
    All,
    Services(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleCommand {
    CoreUp,
    CoreDown,
    CoreRestart,
    /// Replace the active set with `services` and their dependencies.
    Up { services: Vec<String>, force: bool },
    /// Extend the active set.
    Add { services: Vec<String> },
    Down(DownTarget),
    /// Restart `services`, or everything running when empty.
    Restart { services: Vec<String> },
}

impl LifecycleCommand {
    pub fn name(&self) -> &'static str {
        match self {
            LifecycleCommand::CoreUp => "core up",
            LifecycleCommand::CoreDown => "core down",
            LifecycleCommand::CoreRestart => "core restart",
            LifecycleCommand::Up { .. } => "up",
            LifecycleCommand::Add { .. } => "add",
            LifecycleCommand::Down(_) => "down",
            LifecycleCommand::Restart { .. } => "restart",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The external tool ran and succeeded.
    Applied,
    /// Nothing to do; no side effects.
    NoChange,
    /// The operator declined the confirmation; no side effects.
    Declined,
}

/// Result of one lifecycle command.
#[derive(Debug, Clone)]
pub struct Report {
    pub outcome: Outcome,
    /// Active set after the command.
    pub active: ActiveState,
    /// Dependencies pulled in on top of the requested services.
    pub dependencies: BTreeSet<String>,
    /// Services newly requested by this command.
    pub added: BTreeSet<String>,
    /// Every service handed to the merge, core included.
    pub applied: BTreeSet<String>,
    /// Generated unified manifest, when one was written.
    pub manifest: Option<PathBuf>,
    pub merge_warnings: Vec<MergeWarning>,
}

/// Which dashboard view a command refreshes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NotifyScope {
    /// Core services only.
    Core,
    /// The committed active set, core included.
    Active,
}

/// One external apply: which services go into the manifest and what to do
/// with them.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Apply {
    services: BTreeSet<String>,
    action: ComposeAction,
    ensure_network: bool,
}

/// The plan a handler hands back to [`Lifecycle::run`]: an optional apply,
/// the state to commit after it succeeds, and whom to notify.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Transition {
    outcome: Outcome,
    apply: Option<Apply>,
    next: Option<ActiveState>,
    notify: Option<NotifyScope>,
    dependencies: BTreeSet<String>,
    added: BTreeSet<String>,
}

impl Transition {
    fn idle(outcome: Outcome) -> Self {
        Self {
            outcome,
            apply: None,
            next: None,
            notify: None,
            dependencies: BTreeSet::new(),
            added: BTreeSet::new(),
        }
    }

    fn apply(services: BTreeSet<String>, action: ComposeAction) -> Self {
        Self {
            outcome: Outcome::Applied,
            apply: Some(Apply {
                services,
                action,
                ensure_network: false,
            }),
            ..Self::idle(Outcome::Applied)
        }
    }

    fn ensuring_network(mut self) -> Self {
        if let Some(apply) = self.apply.as_mut() {
            apply.ensure_network = true;
        }
        self
    }

    fn commit(mut self, next: ActiveState) -> Self {
        self.next = Some(next);
        self
    }

    fn notify(mut self, scope: NotifyScope) -> Self {
        self.notify = Some(scope);
        self
    }
}

/// Read-only inputs every handler sees.
struct Context<'a> {
    catalog: &'a Catalog,
    table: &'a DependencyTable,
    current: &'a ActiveState,
    core: BTreeSet<String>,
}

/// The active-state lifecycle controller.
///
/// Every command loads the active set, plans a [`Transition`], runs at most
/// one external apply, and commits the new active set only after that apply
/// succeeded. Dashboards are notified last; a failed notification never
/// undoes a commit.
pub struct Lifecycle {
    pub(super) workspace: Workspace,
    pub(super) store: StateStore,
    pub(super) runner: Arc<dyn ComposeRunner>,
    pub(super) notifier: Arc<dyn DashboardNotifier>,
    pub(super) confirm: Arc<dyn Confirm>,
}

impl Lifecycle {
    pub fn builder() -> LifecycleBuilder {
        LifecycleBuilder::new()
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn store(&self) -> &StateStore {
        &self.store
    }

    pub async fn run(&self, command: LifecycleCommand) -> Result<Report> {
        let catalog = discover(&self.workspace);
        let table = DependencyTable::load(&self.workspace.dependencies_file())?;
        let current = self.store.load();

        tracing::debug!(
            "{}: {} active service(s), {} discovered",
            command.name(),
            current.len(),
            catalog.len()
        );

        let transition = {
            let ctx = Context {
                catalog: &catalog,
                table: &table,
                current: &current,
                core: catalog.core_names(),
            };
            self.plan(&command, &ctx)?
        };

        self.execute(transition, current, &catalog).await
    }

    fn plan(&self, command: &LifecycleCommand, ctx: &Context<'_>) -> Result<Transition> {
        match command {
            LifecycleCommand::CoreUp => Ok(core_up(ctx)),
            LifecycleCommand::CoreDown => Ok(core_down(ctx)),
            LifecycleCommand::CoreRestart => Ok(core_restart(ctx)),
            LifecycleCommand::Up { services, force } => {
                let requested = requested_set("up", services, ctx.catalog)?;
                Ok(up(ctx, requested, *force, self.confirm.as_ref()))
            }
            LifecycleCommand::Add { services } => {
                let requested = requested_set("add", services, ctx.catalog)?;
                Ok(add(ctx, requested))
            }
            LifecycleCommand::Down(DownTarget::All) => Ok(down_all(ctx)),
            LifecycleCommand::Down(DownTarget::Services(services)) => {
                if services.is_empty() {
                    return Err(Error::Usage(
                        "Specify services to stop or use --all".to_string(),
                    ));
                }
                Ok(down_services(ctx, services.iter().cloned().collect()))
            }
            LifecycleCommand::Restart { services } => Ok(restart(ctx, services)),
        }
    }

    async fn execute(
        &self,
        transition: Transition,
        current: ActiveState,
        catalog: &Catalog,
    ) -> Result<Report> {
        let mut manifest = None;
        let mut merge_warnings = Vec::new();
        let mut applied = BTreeSet::new();

        if let Some(apply) = &transition.apply {
            let settings = self.workspace.settings();
            if apply.ensure_network {
                if let Err(e) = self.runner.ensure_network(&settings.network).await {
                    tracing::warn!("Could not ensure network {}: {}", settings.network, e);
                }
            }

            let env_file = generate_env_file(&self.workspace)?;
            let outcome = CompositionMerger::from_settings(settings)
                .merge(&catalog.paths_for(&apply.services));
            let manifest_path = self.workspace.manifest_path();
            outcome.composition.write(&manifest_path)?;
            tracing::debug!(
                "Wrote {} with {} service(s)",
                manifest_path.display(),
                outcome.composition.services().len()
            );

            let invocation = ComposeInvocation::new(&settings.project, apply.action.clone())
                .manifest(&manifest_path)
                .env_file(env_file);
            self.runner.apply(&invocation).await?;

            applied = apply.services.clone();
            merge_warnings = outcome.warnings;
            manifest = Some(manifest_path);
        }

        let active = match transition.next {
            Some(next) => {
                self.store.save(&next)?;
                next
            }
            None => current,
        };

        if let Some(scope) = transition.notify {
            let names = match scope {
                NotifyScope::Core => Vec::new(),
                NotifyScope::Active => active.names(),
            };
            if let Err(e) = self.notifier.notify(&names, catalog, true).await {
                tracing::warn!("Dashboard update failed: {}", e);
            }
        }

        Ok(Report {
            outcome: transition.outcome,
            active,
            dependencies: transition.dependencies,
            added: transition.added,
            applied,
            manifest,
            merge_warnings,
        })
    }
}

fn requested_set(command: &str, services: &[String], catalog: &Catalog) -> Result<BTreeSet<String>> {
    if services.is_empty() {
        return Err(Error::Usage(format!(
            "`{}` needs at least one service",
            command
        )));
    }
    for unknown in services.iter().filter(|s| !catalog.contains(s)) {
        tracing::warn!("'{}' is not a discovered service", unknown);
    }
    Ok(services.iter().cloned().collect())
}

fn union<'a>(sets: impl IntoIterator<Item = &'a BTreeSet<String>>) -> BTreeSet<String> {
    sets.into_iter().flatten().cloned().collect()
}

fn core_up(ctx: &Context<'_>) -> Transition {
    Transition::apply(ctx.core.clone(), ComposeAction::Up)
        .ensuring_network()
        .notify(NotifyScope::Core)
}

fn core_down(ctx: &Context<'_>) -> Transition {
    let services = union([ctx.current.services(), &ctx.core]);
    Transition::apply(services, ComposeAction::Down)
}

fn core_restart(ctx: &Context<'_>) -> Transition {
    let services = union([ctx.current.services(), &ctx.core]);
    let targets = ctx.core.iter().cloned().collect();
    Transition::apply(services, ComposeAction::Restart { services: targets })
}

fn up(
    ctx: &Context<'_>,
    requested: BTreeSet<String>,
    force: bool,
    confirm: &dyn Confirm,
) -> Transition {
    let current = ctx.current.services();
    if !current.is_empty() && *current != requested && !force && !confirm.confirm(current, &requested) {
        return Transition::idle(Outcome::Declined);
    }

    let wanted = expand(&requested, ctx.table);
    let dependencies: BTreeSet<String> = wanted.difference(&requested).cloned().collect();
    let next = ActiveState::from(wanted.clone()).without(&ctx.core);

    let mut transition = Transition::apply(union([&wanted, &ctx.core]), ComposeAction::Up)
        .ensuring_network()
        .commit(next)
        .notify(NotifyScope::Active);
    transition.dependencies = dependencies;
    transition.added = requested;
    transition
}

fn add(ctx: &Context<'_>, requested: BTreeSet<String>) -> Transition {
    let current = ctx.current.services();
    let new: BTreeSet<String> = requested.difference(current).cloned().collect();
    if new.is_empty() {
        return Transition::idle(Outcome::NoChange);
    }

    let dependencies: BTreeSet<String> = expand(&new, ctx.table)
        .into_iter()
        .filter(|name| !new.contains(name) && !current.contains(name))
        .collect();
    let wanted = union([current, &new, &dependencies]);
    let next = ActiveState::from(wanted.clone()).without(&ctx.core);

    let mut transition = Transition::apply(union([&wanted, &ctx.core]), ComposeAction::Up)
        .ensuring_network()
        .commit(next)
        .notify(NotifyScope::Active);
    transition.dependencies = dependencies;
    transition.added = new;
    transition
}

fn down_all(ctx: &Context<'_>) -> Transition {
    let services = union([ctx.current.services(), &ctx.core]);
    Transition::apply(services, ComposeAction::Down)
        .commit(ActiveState::new())
        .notify(NotifyScope::Active)
}

fn down_services(ctx: &Context<'_>, targets: BTreeSet<String>) -> Transition {
    let remaining = ctx.current.without(&targets);
    let services = union([remaining.services(), &ctx.core]);
    Transition::apply(services, ComposeAction::Up)
        .commit(remaining)
        .notify(NotifyScope::Active)
}

fn restart(ctx: &Context<'_>, targets: &[String]) -> Transition {
    let services = union([ctx.current.services(), &ctx.core]);
    Transition::apply(
        services,
        ComposeAction::Restart {
            services: targets.to_vec(),
        },
    )
}
