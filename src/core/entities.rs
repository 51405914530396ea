//! Entity and assertion types accepted by `--entity-filters`.
//!
//! The catalog is static, so `list entities` never needs API access.

use serde::Serialize;
use serde_json::{Value, json};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    pub name: &'static str,
    pub description: &'static str,
}

const fn entry(name: &'static str, description: &'static str) -> CatalogEntry {
    CatalogEntry { name, description }
}

pub const ENTITY_TYPES: &[CatalogEntry] = &[
    entry("symptoms", "Clinical symptoms (e.g., fever, cough)"),
    entry("diagnoses", "Medical diagnoses (e.g., pneumonia, diabetes)"),
    entry("medications", "Medications and drugs"),
    entry("procedures", "Medical procedures"),
    entry("lab_tests", "Laboratory tests"),
    entry("allergies", "Allergies and sensitivities"),
    entry("vitals", "Vital signs"),
    entry("anatomy", "Anatomical structures"),
    entry("devices", "Medical devices"),
    entry("organisms", "Organisms (bacteria, viruses)"),
    entry("substances", "Chemical substances"),
    entry("observations", "Clinical observations"),
    entry("social", "Social history factors"),
];

pub const ASSERTION_TYPES: &[CatalogEntry] = &[
    entry("present", "Entity is present/confirmed"),
    entry("negated", "Entity is negated/absent"),
    entry("historical", "Entity is from patient history"),
    entry("hypothetical", "Entity is hypothetical/possible"),
    entry("family", "Entity relates to family history"),
];

pub const COMBINATION_HINT: &str =
    "Combine entity and assertion types in filters like: symptoms_present, diagnoses_negated";

pub fn catalog_as_json() -> Value {
    json!({
        "entity_types": ENTITY_TYPES,
        "assertion_types": ASSERTION_TYPES,
    })
}

pub fn entries_as_json(entries: &[CatalogEntry]) -> Vec<Value> {
    entries
        .iter()
        .map(|e| json!({"name": e.name, "description": e.description}))
        .collect()
}
