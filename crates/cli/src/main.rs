//! TapNex CLI - Command-line interface for TapNex access control
//!
//! Usage:
//!   tapnex                          - Start interactive mode
//!   tapnex role <email>             - Show the role an email resolves to
//!   tapnex tabs <role>              - List the dashboard tabs of a role
//!   tapnex permissions <role>       - List what a role may do
//!   tapnex guard --allow admin      - Evaluate a page guard for a simulated session
//!   tapnex demo                     - Run a scripted session against the in-memory backend

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use cli::commands::{
    load_config, DemoCommand, GuardCommand, PermissionsCommand, RoleCommand, TabsCommand,
};
use cli::interactive::InteractiveCli;

#[derive(Parser)]
#[command(name = "tapnex")]
#[command(about = "TapNex - role-based access for the event dashboard")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file (.json, .yaml or .yml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve the role for an email address
    Role(RoleCommand),
    /// Dashboard tabs visible to a role
    Tabs(TabsCommand),
    /// Permissions granted to a role
    Permissions(PermissionsCommand),
    /// Evaluate the access guard
    Guard(GuardCommand),
    /// Scripted sign-in walkthrough
    Demo(DemoCommand),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so `--json` output stays clean
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Some(Commands::Role(cmd)) => cmd.run(&config, cli.json),
        Some(Commands::Tabs(cmd)) => cmd.run(cli.json),
        Some(Commands::Permissions(cmd)) => cmd.run(cli.json),
        Some(Commands::Guard(cmd)) => cmd.run(&config, cli.json),
        Some(Commands::Demo(cmd)) => cmd.run(&config).await,
        None => {
            // No subcommand - start interactive mode
            let mut interactive = InteractiveCli::new(&config);
            interactive.run().await
        }
    }
}
