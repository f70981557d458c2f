//! PostgreSQL plugin repository.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};

use pluginhub_core::error::{AppError, ErrorKind};
use pluginhub_core::result::AppResult;
use pluginhub_core::types::{FilterOp, FilterValue, PageResponse};
use pluginhub_entity::plugin::{CatalogEntry, Plugin, PluginColumn, PluginQuery};

use super::PluginStore;

/// Repository for the `plugin_marketing` table.
#[derive(Debug, Clone)]
pub struct PluginRepository {
    pool: PgPool,
}

impl PluginRepository {
    /// Create a new plugin repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn updated(id: i32, row: Option<Plugin>) -> AppResult<Plugin> {
    row.ok_or_else(|| AppError::not_found(format!("Plugin {id} not found")))
}

#[async_trait]
impl PluginStore for PluginRepository {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<Plugin>> {
        sqlx::query_as::<_, Plugin>("SELECT * FROM plugin_marketing WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find plugin", e))
    }

    async fn upsert_catalog_entry(&self, entry: &CatalogEntry) -> AppResult<Plugin> {
        sqlx::query_as::<_, Plugin>(
            "INSERT INTO plugin_marketing \
                (plugin_id, name, organization, repository_id, plugin_release_timestamp, \
                 group_id, artifact_id, packaging, latest_version, current_version, version_count) \
             VALUES ($1, $2, $3, $4, $5, $3, $2, $6, $7, $7, $8) \
             ON CONFLICT (plugin_id) DO UPDATE SET \
                organization = EXCLUDED.organization, \
                repository_id = EXCLUDED.repository_id, \
                plugin_release_timestamp = EXCLUDED.plugin_release_timestamp, \
                packaging = EXCLUDED.packaging, \
                latest_version = EXCLUDED.latest_version, \
                version_count = EXCLUDED.version_count, \
                current_version = CASE WHEN plugin_marketing.downloaded \
                    THEN plugin_marketing.current_version ELSE EXCLUDED.current_version END, \
                update_time = NOW() \
             RETURNING *",
        )
        .bind(entry.plugin_id())
        .bind(&entry.artifact_id)
        .bind(&entry.group_id)
        .bind(&entry.repository_id)
        .bind(entry.release_timestamp)
        .bind(&entry.packaging)
        .bind(&entry.latest_version)
        .bind(entry.version_count)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to upsert plugin", e))
    }

    async fn query(&self, query: &PluginQuery) -> AppResult<PageResponse<Plugin>> {
        let mut count_qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM plugin_marketing");
        push_conditions(&mut count_qb, query);
        let total: i64 = count_qb
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count plugins", e))?;

        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM plugin_marketing");
        push_conditions(&mut qb, query);
        push_order(&mut qb, query);
        qb.push(" LIMIT ")
            .push_bind(bind_u64(query.page.limit()))
            .push(" OFFSET ")
            .push_bind(bind_u64(query.page.offset()));

        let items = qb
            .build_query_as::<Plugin>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list plugins", e))?;

        Ok(PageResponse::new(items, &query.page, total.max(0) as u64))
    }

    async fn mark_downloaded(
        &self,
        id: i32,
        version: &str,
        local_path: &str,
        download_url: &str,
    ) -> AppResult<Plugin> {
        let row = sqlx::query_as::<_, Plugin>(
            "UPDATE plugin_marketing SET downloaded = TRUE, current_version = $2, \
             plugin_local_storage_full_path = $3, plugin_download_url = $4, update_time = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(version)
        .bind(local_path)
        .bind(download_url)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to record download", e))?;
        updated(id, row)
    }

    async fn clear_download(&self, id: i32) -> AppResult<Plugin> {
        let row = sqlx::query_as::<_, Plugin>(
            "UPDATE plugin_marketing SET downloaded = FALSE, \
             plugin_local_storage_full_path = NULL, current_version = latest_version, \
             update_time = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to clear download", e))?;
        updated(id, row)
    }

    async fn mark_installed(&self, id: i32, install_path: &str) -> AppResult<Plugin> {
        let row = sqlx::query_as::<_, Plugin>(
            "UPDATE plugin_marketing SET installed = TRUE, plugin_install_full_path = $2, \
             update_time = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(install_path)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to record install", e))?;
        updated(id, row)
    }

    async fn mark_uninstalled(&self, id: i32) -> AppResult<Plugin> {
        let row = sqlx::query_as::<_, Plugin>(
            "UPDATE plugin_marketing SET installed = FALSE, plugin_install_full_path = NULL, \
             update_time = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to record uninstall", e))?;
        updated(id, row)
    }

    async fn count(&self) -> AppResult<u64> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM plugin_marketing")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count plugins", e))?;
        Ok(total.max(0) as u64)
    }
}

/// Append a `WHERE` clause for every filter on a known column. Values are
/// compared on the column's text rendering so one code path serves text,
/// numeric and boolean columns.
fn push_conditions(qb: &mut QueryBuilder<'_, Postgres>, query: &PluginQuery) {
    let mut first = true;
    for filter in &query.filters {
        let Some(column) = PluginColumn::from_field_name(&filter.field) else {
            continue;
        };
        qb.push(if first { " WHERE " } else { " AND " });
        first = false;

        match filter.op {
            FilterOp::Contains => {
                qb.push(column.as_sql())
                    .push("::text ILIKE ")
                    .push_bind(format!("%{}%", escape_like(&filter.value.as_text())));
            }
            FilterOp::Eq => {
                qb.push(column.as_sql())
                    .push("::text = ")
                    .push_bind(normalize(column, &filter.value));
            }
            FilterOp::In => {
                let values: Vec<String> = match &filter.value {
                    FilterValue::List(items) => {
                        items.iter().map(|v| normalize(column, v)).collect()
                    }
                    single => vec![normalize(column, single)],
                };
                if values.is_empty() {
                    qb.push("FALSE");
                    continue;
                }
                qb.push(column.as_sql()).push("::text IN (");
                let mut separated = qb.separated(", ");
                for value in values {
                    separated.push_bind(value);
                }
                separated.push_unseparated(")");
            }
        }
    }
}

fn push_order(qb: &mut QueryBuilder<'_, Postgres>, query: &PluginQuery) {
    qb.push(" ORDER BY ");
    for sort in &query.sorts {
        if let Some(column) = PluginColumn::from_field_name(&sort.field) {
            qb.push(column.as_sql())
                .push(" ")
                .push(sort.direction.as_sql())
                .push(", ");
        }
    }
    qb.push("id DESC");
}

fn normalize(column: PluginColumn, value: &FilterValue) -> String {
    let text = value.as_text();
    if column.is_bool() {
        match text.to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => "true".to_string(),
            _ => "false".to_string(),
        }
    } else {
        text
    }
}

fn escape_like(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// `LIMIT`/`OFFSET` bind value; Postgres takes a signed bigint.
fn bind_u64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}
