//! Translation of ProTable request parameters into a [`PluginQuery`].
//!
//! The table widget posts a flat JSON object: paging keys, an optional
//! `sorter` (`{field: "ascend" | "descend"}`), an optional `filter`
//! (`{field: [values]}`) and one key per search-form field. `sorter` and
//! `filter` may also arrive JSON-encoded as strings.

use serde_json::{Map, Value};

use pluginhub_core::types::pagination::DEFAULT_PAGE_SIZE;
use pluginhub_core::types::{
    FilterField, FilterOp, FilterValue, PageRequest, SortDirection, SortField,
};
use pluginhub_entity::plugin::{PluginColumn, PluginQuery};

const RESERVED_KEYS: [&str; 4] = ["current", "pageSize", "sorter", "filter"];

/// Build a query from ProTable parameters. Unknown fields are ignored.
pub fn parse_pro_table(params: &Value) -> PluginQuery {
    let empty = Map::new();
    let object = params.as_object().unwrap_or(&empty);

    let page = object.get("current").and_then(as_u64).unwrap_or(1);
    let page_size = object
        .get("pageSize")
        .and_then(as_u64)
        .unwrap_or(DEFAULT_PAGE_SIZE);

    let mut filters = Vec::new();
    for (key, value) in object {
        if RESERVED_KEYS.contains(&key.as_str()) {
            continue;
        }
        if let Some(filter) = search_field(key, value) {
            filters.push(filter);
        }
    }
    if let Some(filter) = object.get("filter").and_then(decode_nested) {
        filters.extend(column_filters(&filter));
    }

    let sorts = object
        .get("sorter")
        .and_then(decode_nested)
        .map(|sorter| sort_fields(&sorter))
        .unwrap_or_default();

    PluginQuery {
        page: PageRequest::new(page, page_size),
        filters,
        sorts,
    }
}

fn as_u64(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// `sorter` and `filter` arrive either as objects or as JSON strings.
fn decode_nested(value: &Value) -> Option<Map<String, Value>> {
    match value {
        Value::Object(map) => Some(map.clone()),
        Value::String(s) if !s.trim().is_empty() => match serde_json::from_str(s) {
            Ok(Value::Object(map)) => Some(map),
            _ => None,
        },
        _ => None,
    }
}

/// A search-form field: substring match on text columns, equality
/// otherwise. Blank values and timestamp columns are skipped.
fn search_field(key: &str, value: &Value) -> Option<FilterField> {
    let column = PluginColumn::from_field_name(key)?;
    if column.is_timestamp() {
        return None;
    }
    let value = FilterValue::from_json_scalar(value)?;
    if let FilterValue::String(s) = &value {
        if s.trim().is_empty() {
            return None;
        }
        if column.is_text() {
            return Some(FilterField::contains(column.as_sql(), s.trim()));
        }
    }
    Some(FilterField::eq(column.as_sql(), value))
}

fn column_filters(filter: &Map<String, Value>) -> Vec<FilterField> {
    filter
        .iter()
        .filter_map(|(key, values)| {
            let column = PluginColumn::from_field_name(key)?;
            let items: Vec<FilterValue> = match values {
                Value::Array(items) => items.iter().filter_map(FilterValue::from_json_scalar).collect(),
                other => FilterValue::from_json_scalar(other).into_iter().collect(),
            };
            if items.is_empty() {
                return None;
            }
            Some(FilterField::new(
                column.as_sql(),
                FilterOp::In,
                FilterValue::List(items),
            ))
        })
        .collect()
}

fn sort_fields(sorter: &Map<String, Value>) -> Vec<SortField> {
    sorter
        .iter()
        .filter_map(|(key, direction)| {
            let column = PluginColumn::from_field_name(key)?;
            let direction = SortDirection::parse(direction.as_str()?)?;
            Some(SortField::new(column.as_sql(), direction))
        })
        .collect()
}
