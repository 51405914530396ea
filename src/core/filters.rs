//! Metadata filter compiler
//!
//! Turns the individual filter flags of `search` (`--patient-id`,
//! `--encounter-id`, `--note-types`, `--date-from`, `--date-to`) plus an
//! optional user-supplied `--filters` expression into the single nested
//! expression the Search API accepts in its `filters` query parameter.
//!
//! Wire form:
//!
//! ```text
//! ["patient_id", "Eq", "P1"]                       leaf
//! ["note_type", "In", ["Progress Note", "H&P"]]    leaf with list value
//! ["And", [<expr>, <expr>, ...]]                   conjunction (2+ children)
//! ```

use serde::ser::{SerializeSeq, Serializer};
use serde::Serialize;
use serde_json::Value;

pub const PATIENT_ID_FIELD: &str = "patient_id";
pub const ENCOUNTER_ID_FIELD: &str = "encounter_id";
pub const NOTE_TYPE_FIELD: &str = "note_type";
pub const NOTE_DATE_FIELD: &str = "note_date";

const AND_KEYWORD: &str = "And";
const NOTE_TYPE_SEPARATOR: char = ',';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Operator {
    Eq,
    In,
    Gte,
    Lte,
    Contains,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FilterValue {
    Text(String),
    Number(serde_json::Number),
    List(Vec<String>),
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        FilterValue::Text(value.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        FilterValue::Text(value)
    }
}

impl From<Vec<String>> for FilterValue {
    fn from(value: Vec<String>) -> Self {
        FilterValue::List(value)
    }
}

/// A filter predicate over result metadata.
///
/// `And` always holds at least two children; build conjunctions through
/// [`compile`] so a single candidate stays unwrapped. `Opaque` carries a
/// user-supplied expression verbatim and is never inspected or flattened.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterExpression {
    Leaf {
        field: String,
        op: Operator,
        value: FilterValue,
    },
    And(Vec<FilterExpression>),
    Opaque(Value),
}

impl FilterExpression {
    pub fn leaf(field: &str, op: Operator, value: impl Into<FilterValue>) -> Self {
        FilterExpression::Leaf {
            field: field.to_string(),
            op,
            value: value.into(),
        }
    }

    /// Wrap a parsed `--filters` value. Empty values (`null`, `[]`, `{}`,
    /// `""`, `false`, `0`) mean "no filter".
    pub fn free_form(value: Value) -> Option<Self> {
        if is_blank_json(&value) {
            None
        } else {
            Some(FilterExpression::Opaque(value))
        }
    }

    /// JSON wire form as a value
    pub fn to_value(&self) -> Value {
        // Only strings, numbers and parsed JSON are serialized, which cannot fail.
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    /// Compact JSON text, as sent in the `filters` query parameter
    pub fn to_json_string(&self) -> String {
        self.to_value().to_string()
    }
}

impl Serialize for FilterExpression {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            FilterExpression::Leaf { field, op, value } => {
                let mut seq = serializer.serialize_seq(Some(3))?;
                seq.serialize_element(field)?;
                seq.serialize_element(op)?;
                seq.serialize_element(value)?;
                seq.end()
            }
            FilterExpression::And(children) => {
                let mut seq = serializer.serialize_seq(Some(2))?;
                seq.serialize_element(AND_KEYWORD)?;
                seq.serialize_element(children)?;
                seq.end()
            }
            FilterExpression::Opaque(value) => value.serialize(serializer),
        }
    }
}

/// The named filter flags of `search`. Empty strings count as absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NamedFilters {
    pub patient_id: Option<String>,
    pub encounter_id: Option<String>,
    /// Comma-separated note types
    pub note_types: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
}

impl NamedFilters {
    /// One leaf per present flag, in fixed order: patient, encounter,
    /// note type, date from, date to.
    pub fn leaves(&self) -> Vec<FilterExpression> {
        let mut leaves = Vec::with_capacity(5);

        if let Some(patient_id) = present(&self.patient_id) {
            leaves.push(FilterExpression::leaf(
                PATIENT_ID_FIELD,
                Operator::Eq,
                patient_id,
            ));
        }

        if let Some(encounter_id) = present(&self.encounter_id) {
            leaves.push(FilterExpression::leaf(
                ENCOUNTER_ID_FIELD,
                Operator::Eq,
                encounter_id,
            ));
        }

        if let Some(note_types) = present(&self.note_types) {
            leaves.push(note_type_leaf(note_types));
        }

        if let Some(date_from) = present(&self.date_from) {
            leaves.push(FilterExpression::leaf(
                NOTE_DATE_FIELD,
                Operator::Gte,
                date_from,
            ));
        }

        if let Some(date_to) = present(&self.date_to) {
            leaves.push(FilterExpression::leaf(NOTE_DATE_FIELD, Operator::Lte, date_to));
        }

        leaves
    }

    pub fn is_empty(&self) -> bool {
        self.leaves().is_empty()
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

// The Eq/In choice is made on the raw token count, before trimming.
fn note_type_leaf(raw: &str) -> FilterExpression {
    let mut tokens: Vec<String> = raw
        .split(NOTE_TYPE_SEPARATOR)
        .map(|token| token.trim().to_string())
        .collect();

    if tokens.len() == 1 {
        FilterExpression::leaf(NOTE_TYPE_FIELD, Operator::Eq, tokens.remove(0))
    } else {
        FilterExpression::leaf(NOTE_TYPE_FIELD, Operator::In, tokens)
    }
}

/// Combine candidate expressions into one.
///
/// Named leaves come first in the order given, the free-form expression
/// last. No candidates gives `None`; one candidate is returned unwrapped;
/// two or more are wrapped in a single `And`. A free-form `And` is nested
/// as one child, never flattened.
pub fn compile(
    named: Vec<FilterExpression>,
    free_form: Option<FilterExpression>,
) -> Option<FilterExpression> {
    let mut candidates = named;
    candidates.extend(free_form);

    match candidates.len() {
        0 => None,
        1 => candidates.pop(),
        _ => Some(FilterExpression::And(candidates)),
    }
}

/// Compile the named flags and an optional parsed `--filters` value.
pub fn build_filters(named: &NamedFilters, free_form: Option<Value>) -> Option<FilterExpression> {
    compile(
        named.leaves(),
        free_form.and_then(FilterExpression::free_form),
    )
}

/// `null`, `false`, `0`, `""`, `[]` and `{}` carry no filter.
pub fn is_blank_json(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}
