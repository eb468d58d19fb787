//! Warden command-line tool.
//!
//! Validates access configuration and runs access checks against it without
//! a server.
//!
//! # Quick Start
//!
//! ```bash
//! # Write a warden.toml with the demo accounts
//! warden init .
//!
//! # Validate it
//! warden check
//!
//! # Would managerFinance reach /finance-manager?
//! warden simulate managerFinance --secret password123 --path /finance-manager
//! ```

mod commands;
mod table;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Warden - session-gated attribute-based access control.
#[derive(Parser)]
#[command(name = "warden")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show version information.
    Version,

    /// Write a warden.toml with the demo accounts and routes.
    Init {
        /// Project directory.
        #[arg(default_value = ".")]
        path: String,
    },

    /// Load the configuration and build the access service.
    Check {
        /// Project directory.
        #[arg(short, long, default_value = ".")]
        project: String,

        /// Use the built-in demo accounts when none are configured.
        #[arg(long)]
        demo: bool,
    },

    /// Configuration commands.
    #[command(subcommand)]
    Config(ConfigCommands),

    /// List registered policies and their rules.
    Policies {
        /// Project directory.
        #[arg(short, long, default_value = ".")]
        project: String,
    },

    /// List protected resources.
    Resources {
        /// Project directory.
        #[arg(short, long, default_value = ".")]
        project: String,
    },

    /// Log in as an identity and check one policy or resource.
    Simulate {
        /// Identity to log in as.
        identity: String,

        /// Secret for the identity.
        #[arg(short, long)]
        secret: String,

        /// Policy name to check.
        #[arg(long, conflicts_with = "path", required_unless_present = "path")]
        policy: Option<String>,

        /// Resource path to check.
        #[arg(long)]
        path: Option<String>,

        /// Project directory.
        #[arg(short, long, default_value = ".")]
        project: String,

        /// Use the built-in demo accounts when none are configured.
        #[arg(long)]
        demo: bool,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show the merged configuration.
    Show {
        /// Project directory.
        #[arg(short, long, default_value = ".")]
        project: String,

        /// Output format (text, json, toml).
        #[arg(short, long, default_value = "text")]
        format: String,
    },
}

fn main() -> Result<()> {
    // Logs go to stderr so command output stays pipeable.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Version => {
            commands::version::run();
            Ok(())
        }
        Commands::Init { path } => commands::init::run(&path),
        Commands::Check { project, demo } => commands::check::run(&project, demo),
        Commands::Config(cmd) => match cmd {
            ConfigCommands::Show { project, format } => commands::config::show(&project, &format),
        },
        Commands::Policies { project } => commands::listing::policies(&project),
        Commands::Resources { project } => commands::listing::resources(&project),
        Commands::Simulate {
            identity,
            secret,
            policy,
            path,
            project,
            demo,
        } => {
            let target = match (policy, path) {
                (Some(policy), _) => commands::simulate::Target::Policy(policy),
                (None, Some(path)) => commands::simulate::Target::Path(path),
                (None, None) => anyhow::bail!("one of --policy or --path is required"),
            };
            commands::simulate::run(&project, demo, &identity, &secret, &target)
        }
    }
}
