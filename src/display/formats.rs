//! JSON and CSV renderers
//!
//! CSV output uses a fixed column list per resource. Missing keys and JSON
//! nulls become empty cells, strings are written as-is and any other value is
//! written as compact JSON.

use crate::error::DisplayError;
use serde_json::Value;

pub const SEARCH_CSV_FIELDS: &[&str] = &[
    "score",
    "distance",
    "keyword_score",
    "patient_id",
    "encounter_id",
    "note_id",
    "note_date",
    "note_type",
    "text_chunk",
    "chunk_id",
    "chunk_index",
    "chunk_count",
    "note_quality_score",
    "chunk_quality_score",
];

pub const HISTORY_CSV_FIELDS: &[&str] = &[
    "id",
    "search_type",
    "query",
    "result_count",
    "duration_ms",
    "status_code",
    "user_id",
    "created_at",
];

pub const COHORT_CSV_FIELDS: &[&str] = &[
    "cohort_id",
    "cohort_name",
    "namespace",
    "chunk_count",
    "index_status",
];

pub const NOTE_TYPE_CSV_FIELDS: &[&str] =
    &["id", "note_type", "note_count", "first_seen_at", "last_seen_at"];

pub const FILTER_FIELD_CSV_FIELDS: &[&str] = &["field_name", "field_category", "value_count"];

pub const FILTER_VALUE_CSV_FIELDS: &[&str] = &["text_value", "cui", "occurrence_count"];

pub const CATALOG_CSV_FIELDS: &[&str] = &["name", "description"];

/// Pretty-printed JSON, two-space indent
pub fn render_json(value: &Value) -> Result<String, DisplayError> {
    serde_json::to_string_pretty(value).map_err(|e| DisplayError::Json(e.to_string()))
}

/// Header plus one row per item. An empty list renders as an empty string.
pub fn render_csv(items: &[Value], fields: &[&str]) -> Result<String, DisplayError> {
    if items.is_empty() {
        return Ok(String::new());
    }

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(fields)
        .map_err(|e| DisplayError::Csv(e.to_string()))?;

    for item in items {
        let row = fields.iter().map(|field| csv_cell(item.get(*field)));
        writer
            .write_record(row)
            .map_err(|e| DisplayError::Csv(e.to_string()))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| DisplayError::Csv(e.to_string()))?;
    let text = String::from_utf8(bytes).map_err(|e| DisplayError::Csv(e.to_string()))?;

    Ok(text.trim_end().to_string())
}

fn csv_cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
