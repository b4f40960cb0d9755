//! chapterctl - operator CLI for chapter access control
//!
//! This CLI gives chapter administrators a terminal interface to:
//! - Inspect the role and position catalogs
//! - Check individual permissions against the policy
//! - View, override and reset the permission matrix
//! - Validate, save and inspect officer terms

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod context;
mod output;

use chapter_types::{Action, Module, Role};
use commands::{catalog, matrix, term};
use config::ChapterConfig;
use context::Context;

/// chapterctl application
#[derive(Parser)]
#[command(name = "chapterctl")]
#[command(about = "Chapter permissions and officer terms", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "CHAPTER_CONFIG")]
    config: Option<String>,

    /// Output format (table, json)
    #[arg(short, long, default_value = "table")]
    output: output::OutputFormat,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// List roles with their kind and grants
    Roles,

    /// List board positions and their cadre counterparts
    Positions,

    /// Check whether a role may perform an action on a module
    Check {
        role: Role,
        module: Module,
        action: Action,
    },

    /// Permission matrix
    Matrix {
        #[command(subcommand)]
        command: matrix::MatrixCommands,
    },

    /// Officer terms
    Term {
        #[command(subcommand)]
        command: term::TermCommands,
    },

    /// Show configuration
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = ChapterConfig::load(cli.config.as_deref())?;

    // Initialize tracing
    let level = if cli.verbose {
        "debug".to_string()
    } else {
        config.logging.level.clone()
    };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| level.into());

    if cli.json_logs || config.logging.json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .without_time()
                    .with_writer(std::io::stderr),
            )
            .init();
    }

    let context = Context::from_config(config).await?;

    match cli.command {
        Commands::Roles => catalog::roles(&context.policy, cli.output),
        Commands::Positions => catalog::positions(cli.output),
        Commands::Check {
            role,
            module,
            action,
        } => catalog::check(&context.policy, role, module, action, cli.output),
        Commands::Matrix { command } => matrix::execute(command, &context, cli.output).await,
        Commands::Term { command } => term::execute(command, &context, cli.output).await,
        Commands::Config => output::print_single(&context.config),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_check() {
        let cli = Cli::try_parse_from([
            "chapterctl",
            "check",
            "treasurer",
            "finance-management",
            "delete",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Commands::Check {
                role: Role::TREASURER,
                module: Module::FinanceManagement,
                action: Action::Delete,
            }
        ));
    }

    #[test]
    fn test_parse_rejects_unknown_role() {
        assert!(Cli::try_parse_from(["chapterctl", "check", "chancellor", "profile", "read"]).is_err());
    }

    #[test]
    fn test_parse_term_acting() {
        let cli = Cli::try_parse_from([
            "chapterctl",
            "term",
            "acting",
            "vp_programs:2026:M2",
            "--for",
            "president",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Commands::Term {
                command: term::TermCommands::Acting {
                    acting_for: Some(chapter_types::BoardPosition::President),
                    ..
                }
            }
        ));
    }
}
