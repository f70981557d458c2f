//! Access token commands.

use clap::{Args, Subcommand};
use serde::Serialize;

use crate::output::{self, OutputFormat};
use pluginhub_auth::JwtEncoder;
use pluginhub_auth::rbac::permissions::WILDCARD;
use pluginhub_core::config::AppConfig;
use pluginhub_core::error::AppError;

/// Arguments for token commands
#[derive(Debug, Args)]
pub struct TokenArgs {
    /// Token subcommand
    #[command(subcommand)]
    pub command: TokenCommand,
}

/// Token subcommands
#[derive(Debug, Subcommand)]
pub enum TokenCommand {
    /// Issue a signed bearer token
    Issue {
        /// User id carried in `sub`
        #[arg(long, default_value_t = 1)]
        user_id: i64,
        /// Username
        #[arg(long, default_value = "admin")]
        username: String,
        /// Permission code, repeatable; `*` grants everything
        #[arg(short, long = "permission")]
        permissions: Vec<String>,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct IssuedToken {
    token: String,
    expires_at: String,
    permissions: Vec<String>,
}

/// Execute token commands
pub fn execute(args: &TokenArgs, config: &AppConfig, format: OutputFormat) -> Result<(), AppError> {
    match &args.command {
        TokenCommand::Issue {
            user_id,
            username,
            permissions,
        } => {
            let permissions = if permissions.is_empty() {
                vec![WILDCARD.to_string()]
            } else {
                permissions.clone()
            };

            let encoder = JwtEncoder::new(&config.auth);
            let (token, expires_at) = encoder.issue(*user_id, username, &permissions)?;
            let issued = IssuedToken {
                token,
                expires_at: expires_at.to_rfc3339(),
                permissions,
            };

            match format {
                OutputFormat::Json => output::print_item(&issued, format),
                OutputFormat::Table => {
                    output::print_success(&format!("Token issued for '{}'", username));
                    output::print_kv("Expires", &issued.expires_at);
                    output::print_kv("Permissions", &issued.permissions.join(", "));
                    println!("{}", issued.token);
                }
            }
        }
    }

    Ok(())
}
