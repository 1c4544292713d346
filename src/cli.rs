use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "devstack")]
#[command(about = "Manage a local multi-service development environment")]
#[command(version)]
pub struct Cli {
    /// Workspace root (defaults to the nearest directory with devstack.yaml)
    #[arg(short, long, global = true)]
    pub workdir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage core services
    #[command(subcommand)]
    Core(CoreCommands),
    /// Start services, replacing the active set
    Up {
        /// Services to start
        #[arg(required = true)]
        services: Vec<String>,

        /// Replace running services without asking
        #[arg(short, long)]
        force: bool,
    },
    /// Add services to the active set
    Add {
        /// Services to add
        #[arg(required = true)]
        services: Vec<String>,
    },
    /// Stop services
    Down {
        /// Services to stop
        services: Vec<String>,

        /// Stop everything, core included
        #[arg(short, long, conflicts_with = "services")]
        all: bool,
    },
    /// Restart services (defaults to all running)
    Restart {
        /// Services to restart
        services: Vec<String>,
    },
    /// Show container status and active services
    Status,
    /// List services with a running container
    Running,
    /// List discovered services
    List {
        /// Only show services whose category contains this text
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Show details about a service
    Info {
        /// Service name
        service: String,
    },
    /// Start a saved profile, or list profiles
    Profile {
        /// Profile name
        name: Option<String>,

        /// List available profiles
        #[arg(short, long)]
        list: bool,
    },
    /// Follow service logs
    Logs {
        /// Service name (defaults to all)
        service: Option<String>,
    },
    /// Stop everything and remove generated files and state
    Clean,
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Clone, Copy)]
pub enum CoreCommands {
    /// Start core services
    Up,
    /// Stop the project
    Down,
    /// Restart core services
    Restart,
}
