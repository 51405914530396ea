use clap::ValueEnum;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SearchType {
    #[default]
    Hybrid,
    Semantic,
    Keyword,
}

impl SearchType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchType::Hybrid => "hybrid",
            SearchType::Semantic => "semantic",
            SearchType::Keyword => "keyword",
        }
    }
}

/// Server-side de-duplication granularity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum DistinctMode {
    #[default]
    Encounter,
    Patient,
    Note,
    #[value(name = "none")]
    Off,
}

impl DistinctMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DistinctMode::Encounter => "encounter",
            DistinctMode::Patient => "patient",
            DistinctMode::Note => "note",
            DistinctMode::Off => "none",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FieldCategory {
    Entity,
    Assertion,
    #[value(name = "entity_assertion")]
    EntityAssertion,
}

impl FieldCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldCategory::Entity => "entity",
            FieldCategory::Assertion => "assertion",
            FieldCategory::EntityAssertion => "entity_assertion",
        }
    }
}

// Responses are passed through as raw JSON; these helpers only look keys up.

/// Array under `key`, or an empty slice when missing or not an array
pub fn list_items<'a>(response: &'a Value, key: &str) -> &'a [Value] {
    response
        .get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// Unsigned integer under `key`, or `fallback`
pub fn count_field(response: &Value, key: &str, fallback: u64) -> u64 {
    response.get(key).and_then(Value::as_u64).unwrap_or(fallback)
}

pub fn bool_field(response: &Value, key: &str) -> bool {
    response.get(key).and_then(Value::as_bool).unwrap_or(false)
}
