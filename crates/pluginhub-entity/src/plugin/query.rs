//! Typed plugin list queries.
//!
//! Field names coming from the table widget are resolved against
//! [`PluginColumn`]; only known columns ever reach SQL.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use pluginhub_core::types::{FilterField, FilterOp, FilterValue, PageRequest, SortField};

use super::model::Plugin;

/// Queryable columns of the `plugin_marketing` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PluginColumn {
    Id,
    PluginId,
    Name,
    Organization,
    RepositoryId,
    Description,
    GroupId,
    ArtifactId,
    Packaging,
    LatestVersion,
    CurrentVersion,
    VersionCount,
    Downloaded,
    Installed,
    PluginReleaseTimestamp,
    CreateTime,
    UpdateTime,
}

impl PluginColumn {
    /// Every queryable column.
    pub const ALL: [PluginColumn; 17] = [
        Self::Id,
        Self::PluginId,
        Self::Name,
        Self::Organization,
        Self::RepositoryId,
        Self::Description,
        Self::GroupId,
        Self::ArtifactId,
        Self::Packaging,
        Self::LatestVersion,
        Self::CurrentVersion,
        Self::VersionCount,
        Self::Downloaded,
        Self::Installed,
        Self::PluginReleaseTimestamp,
        Self::CreateTime,
        Self::UpdateTime,
    ];

    /// SQL column name.
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::PluginId => "plugin_id",
            Self::Name => "name",
            Self::Organization => "organization",
            Self::RepositoryId => "repository_id",
            Self::Description => "description",
            Self::GroupId => "group_id",
            Self::ArtifactId => "artifact_id",
            Self::Packaging => "packaging",
            Self::LatestVersion => "latest_version",
            Self::CurrentVersion => "current_version",
            Self::VersionCount => "version_count",
            Self::Downloaded => "downloaded",
            Self::Installed => "installed",
            Self::PluginReleaseTimestamp => "plugin_release_timestamp",
            Self::CreateTime => "create_time",
            Self::UpdateTime => "update_time",
        }
    }

    /// Resolve a camelCase or snake_case field name.
    pub fn from_field_name(name: &str) -> Option<Self> {
        let snake = to_snake_case(name.trim());
        Self::ALL.into_iter().find(|c| c.as_sql() == snake)
    }

    /// Whether the column holds free text (substring matching applies).
    pub fn is_text(&self) -> bool {
        matches!(
            self,
            Self::PluginId
                | Self::Name
                | Self::Organization
                | Self::RepositoryId
                | Self::Description
                | Self::GroupId
                | Self::ArtifactId
                | Self::Packaging
                | Self::LatestVersion
                | Self::CurrentVersion
        )
    }

    /// Whether the column is boolean.
    pub fn is_bool(&self) -> bool {
        matches!(self, Self::Downloaded | Self::Installed)
    }

    /// Whether the column holds a timestamp.
    pub fn is_timestamp(&self) -> bool {
        matches!(
            self,
            Self::PluginReleaseTimestamp | Self::CreateTime | Self::UpdateTime
        )
    }

    /// Read this column from an in-memory row. Timestamps are rendered as
    /// milliseconds so they compare numerically.
    pub fn value_of(&self, plugin: &Plugin) -> Option<FilterValue> {
        let text = |s: &str| Some(FilterValue::String(s.to_string()));
        match self {
            Self::Id => Some(FilterValue::Integer(i64::from(plugin.id))),
            Self::PluginId => text(&plugin.plugin_id),
            Self::Name => text(&plugin.name),
            Self::Organization => plugin.organization.as_deref().and_then(text),
            Self::RepositoryId => plugin.repository_id.as_deref().and_then(text),
            Self::Description => plugin.description.as_deref().and_then(text),
            Self::GroupId => text(&plugin.group_id),
            Self::ArtifactId => text(&plugin.artifact_id),
            Self::Packaging => text(&plugin.packaging),
            Self::LatestVersion => plugin.latest_version.as_deref().and_then(text),
            Self::CurrentVersion => plugin.current_version.as_deref().and_then(text),
            Self::VersionCount => Some(FilterValue::Integer(i64::from(plugin.version_count))),
            Self::Downloaded => Some(FilterValue::Boolean(plugin.downloaded)),
            Self::Installed => Some(FilterValue::Boolean(plugin.installed)),
            Self::PluginReleaseTimestamp => plugin
                .plugin_release_timestamp
                .map(|t| FilterValue::Integer(t.timestamp_millis())),
            Self::CreateTime => Some(FilterValue::Integer(plugin.create_time.timestamp_millis())),
            Self::UpdateTime => Some(FilterValue::Integer(plugin.update_time.timestamp_millis())),
        }
    }
}

/// A validated list query: filters and sorts reference [`PluginColumn`]
/// SQL names only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PluginQuery {
    /// Requested page.
    pub page: PageRequest,
    /// Conjunction of conditions.
    pub filters: Vec<FilterField>,
    /// Sort order, first entry most significant. Empty means `id DESC`.
    pub sorts: Vec<SortField>,
}

impl PluginQuery {
    /// Whether an in-memory row satisfies every filter.
    pub fn matches(&self, plugin: &Plugin) -> bool {
        self.filters.iter().all(|filter| {
            let Some(column) = PluginColumn::from_field_name(&filter.field) else {
                return true;
            };
            let Some(actual) = column.value_of(plugin) else {
                return false;
            };
            match filter.op {
                FilterOp::Eq => loosely_equal(&actual, &filter.value),
                FilterOp::Contains => actual
                    .as_text()
                    .to_lowercase()
                    .contains(&filter.value.as_text().to_lowercase()),
                FilterOp::In => match &filter.value {
                    FilterValue::List(items) => {
                        items.iter().any(|item| loosely_equal(&actual, item))
                    }
                    single => loosely_equal(&actual, single),
                },
            }
        })
    }

    /// Compare two rows according to `sorts` (falling back to `id DESC`).
    pub fn compare(&self, a: &Plugin, b: &Plugin) -> Ordering {
        for sort in &self.sorts {
            let Some(column) = PluginColumn::from_field_name(&sort.field) else {
                continue;
            };
            let ordering = compare_values(column.value_of(a), column.value_of(b));
            let ordering = match sort.direction {
                pluginhub_core::types::SortDirection::Asc => ordering,
                pluginhub_core::types::SortDirection::Desc => ordering.reverse(),
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        b.id.cmp(&a.id)
    }
}

fn loosely_equal(actual: &FilterValue, expected: &FilterValue) -> bool {
    match (actual, expected) {
        (FilterValue::String(a), FilterValue::String(b)) => a == b,
        _ => actual.as_text().eq_ignore_ascii_case(&expected.as_text()),
    }
}

/// Nulls sort last ascending and first descending, as Postgres orders them.
fn compare_values(a: Option<FilterValue>, b: Option<FilterValue>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(FilterValue::Integer(x)), Some(FilterValue::Integer(y))) => x.cmp(&y),
        (Some(FilterValue::Boolean(x)), Some(FilterValue::Boolean(y))) => x.cmp(&y),
        (Some(x), Some(y)) => x.as_text().cmp(&y.as_text()),
    }
}

fn to_snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (i, c) in name.chars().enumerate() {
        if c.is_ascii_uppercase() {
            if i > 0 {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}
