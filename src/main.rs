mod cli;
mod commands;
mod output;

use clap::{CommandFactory, Parser};
use cli::{Cli, Commands};
use devstack::config::Workspace;
use devstack::docker::DockerCompose;
use devstack::orchestrator::Lifecycle;
use devstack::Error as DevstackError;
use std::path::Path;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

const LOG_FILE: &str = "devstack.log";

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        if let Some(error) = e.downcast_ref::<DevstackError>() {
            eprintln!("Error: {}", error);
            if let Some(suggestion) = error.suggestion() {
                eprintln!("\nHint: {}", suggestion);
            }
        } else {
            eprintln!("Error: {:#}", e);
        }
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let out = &output::CliOutput;

    // ── Tier 1: Commands that need NO workspace ──────────────────────
    if let Commands::Completions { shell } = cli.command {
        print_completions(shell);
        return Ok(());
    }

    let workspace = Workspace::locate(cli.workdir.clone())?;
    init_tracing(&workspace.logs_dir());
    tracing::debug!("Workspace root: {}", workspace.root().display());

    match cli.command {
        Commands::Completions { shell } => {
            print_completions(shell);
            Ok(())
        }

        // ── Tier 2: Read-only commands and direct compose calls ─────
        Commands::List { category } => commands::run_list(&workspace, category, out),
        Commands::Info { service } => commands::run_info(&workspace, &service, out),
        Commands::Status => commands::run_status(&workspace, &DockerCompose::new(), out).await,
        Commands::Running => {
            commands::run_running(&workspace, &DockerCompose::new(), out).await
        }
        Commands::Logs { service } => {
            commands::run_logs(&workspace, &DockerCompose::new(), service, out).await
        }
        Commands::Clean => commands::run_clean(&workspace, &DockerCompose::new(), out).await,

        // ── Tier 3: Commands that change the active set ─────────────
        Commands::Core(action) => commands::run_core(&lifecycle(workspace)?, action, out).await,
        Commands::Up { services, force } => {
            commands::run_up(&lifecycle(workspace)?, services, force, out).await
        }
        Commands::Add { services } => {
            commands::run_add(&lifecycle(workspace)?, services, out).await
        }
        Commands::Down { services, all } => {
            commands::run_down(&lifecycle(workspace)?, services, all, out).await
        }
        Commands::Restart { services } => {
            commands::run_restart(&lifecycle(workspace)?, services, out).await
        }
        Commands::Profile { name, list } => {
            commands::run_profile(&lifecycle(workspace)?, name, list, out).await
        }
    }
}

fn lifecycle(workspace: Workspace) -> devstack::Result<Lifecycle> {
    Lifecycle::builder().workspace(workspace).build()
}

fn print_completions(shell: clap_complete::Shell) {
    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    clap_complete::generate(shell, &mut cmd, bin_name, &mut std::io::stdout());
}

/// Console logging on stderr (`RUST_LOG`, default `info`) plus a debug-level
/// log file under the workspace's `logs/` directory.
fn init_tracing(log_dir: &Path) {
    let console = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        );

    let log_file = std::fs::create_dir_all(log_dir).and_then(|_| {
        std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_dir.join(LOG_FILE))
    });

    match log_file {
        Ok(file) => {
            let file_layer = tracing_subscriber::fmt::layer()
                .with_writer(std::sync::Mutex::new(file))
                .with_ansi(false)
                .with_filter(EnvFilter::new("devstack=debug"));
            tracing_subscriber::registry()
                .with(console)
                .with(file_layer)
                .init();
        }
        Err(e) => {
            tracing_subscriber::registry().with(console).init();
            tracing::warn!("File logging disabled ({}): {}", log_dir.display(), e);
        }
    }
}
