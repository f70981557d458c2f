//! CLI command definitions and dispatch.

pub mod migrate;
pub mod plugin;
pub mod token;

use clap::{Parser, Subcommand};

use crate::output::OutputFormat;
use pluginhub_core::config::AppConfig;
use pluginhub_core::error::AppError;

/// PluginHub: plugin marketplace backend
#[derive(Debug, Parser)]
#[command(name = "pluginhub", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Configuration overlay, loaded from `config/<env>.toml`
    #[arg(short, long, env = "PLUGINHUB_ENV", default_value = "development")]
    pub env: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Database migration management
    Migrate(migrate::MigrateArgs),
    /// Access token management
    Token(token::TokenArgs),
    /// Plugin catalog operations
    Plugin(plugin::PluginArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        let config = AppConfig::load(&self.config, &self.env)?;
        match &self.command {
            Commands::Migrate(args) => migrate::execute(args, &config).await,
            Commands::Token(args) => token::execute(args, &config, self.format),
            Commands::Plugin(args) => plugin::execute(args, config, self.format).await,
        }
    }
}
