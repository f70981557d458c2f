//! Plugin catalog commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use serde_json::{Map, Value, json};
use tabled::Tabled;

use crate::output::{self, OutputFormat};
use pluginhub_api::build_state;
use pluginhub_core::config::AppConfig;
use pluginhub_core::error::AppError;
use pluginhub_entity::Plugin;
use pluginhub_service::RequestContext;

/// Arguments for plugin commands
#[derive(Debug, Args)]
pub struct PluginArgs {
    /// Plugin subcommand
    #[command(subcommand)]
    pub command: PluginCommand,
}

/// Plugin subcommands
#[derive(Debug, Subcommand)]
pub enum PluginCommand {
    /// Refresh the catalog from the remote search API
    Sync,
    /// List catalog entries
    List {
        /// Substring match on the plugin name
        #[arg(short, long)]
        name: Option<String>,
        /// Only downloaded (true) or not downloaded (false) plugins
        #[arg(long)]
        downloaded: Option<bool>,
        /// Only installed (true) or not installed (false) plugins
        #[arg(long)]
        installed: Option<bool>,
        /// Page number, 1-based
        #[arg(long, default_value_t = 1)]
        page: u64,
        /// Rows per page
        #[arg(long, default_value_t = 20)]
        page_size: u64,
    },
}

/// Plugin display row for table output
#[derive(Debug, Serialize, Tabled)]
struct PluginRow {
    /// Primary key
    id: i32,
    /// `group:artifact`
    plugin_id: String,
    /// Latest catalog version
    latest: String,
    /// Selected version
    current: String,
    /// Number of versions
    versions: i32,
    /// Download flag
    downloaded: bool,
    /// Install flag
    installed: bool,
}

impl From<&Plugin> for PluginRow {
    fn from(p: &Plugin) -> Self {
        Self {
            id: p.id,
            plugin_id: p.plugin_id.clone(),
            latest: p.latest_version.clone().unwrap_or_default(),
            current: p.current_version.clone().unwrap_or_default(),
            versions: p.version_count,
            downloaded: p.downloaded,
            installed: p.installed,
        }
    }
}

/// Execute plugin commands
pub async fn execute(
    args: &PluginArgs,
    config: AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let state = build_state(config).await?;
    let service = &state.plugin_market;

    match &args.command {
        PluginCommand::Sync => {
            println!("Synchronizing plugin catalog...");
            let report = service.sync_market_data(&RequestContext::system()).await?;
            match format {
                OutputFormat::Json => output::print_item(&report, format),
                OutputFormat::Table => {
                    output::print_success("Catalog synchronized.");
                    output::print_kv("Found", &report.num_found.to_string());
                    output::print_kv("Pages", &report.pages.to_string());
                    output::print_kv("Upserted", &report.upserted.to_string());
                }
            }
        }
        PluginCommand::List {
            name,
            downloaded,
            installed,
            page,
            page_size,
        } => {
            let mut params = Map::new();
            params.insert("current".into(), json!(page));
            params.insert("pageSize".into(), json!(page_size));
            if let Some(name) = name {
                params.insert("name".into(), json!(name));
            }
            if let Some(downloaded) = downloaded {
                params.insert("downloaded".into(), json!(downloaded));
            }
            if let Some(installed) = installed {
                params.insert("installed".into(), json!(installed));
            }

            let result = service.select_for_pro_table(&Value::Object(params)).await?;
            let rows: Vec<PluginRow> = result.items.iter().map(PluginRow::from).collect();

            output::print_list(&rows, format);
            if format == OutputFormat::Table {
                println!(
                    "Page {}/{} ({} total)",
                    result.page,
                    result.total_pages(),
                    result.total_items
                );
            }
        }
    }

    Ok(())
}
