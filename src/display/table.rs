use crate::api::models::{bool_field, count_field};
use crate::core::entities::{ASSERTION_TYPES, COMBINATION_HINT, CatalogEntry, ENTITY_TYPES};
use crate::core::filters::is_blank_json;
use crate::utils::text::{take_chars, truncate_text};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table, presets};
use crossterm::style::{StyledContent, Stylize};
use crossterm::terminal;
use serde_json::Value;

pub const DEFAULT_TEXT_WIDTH: usize = 80;
const NOTE_TYPE_WIDTH: usize = 20;
const ID_WIDTH: usize = 12;
const DATE_WIDTH: usize = 10;
const TIMESTAMP_WIDTH: usize = 19;

pub struct TableDisplay {
    max_width: Option<usize>,
    use_colors: bool,
}

impl TableDisplay {
    pub fn new() -> Self {
        Self {
            max_width: Self::detect_terminal_width(),
            use_colors: atty::is(atty::Stream::Stdout),
        }
    }

    fn detect_terminal_width() -> Option<usize> {
        match terminal::size() {
            Ok((cols, _)) => Some((cols as usize).clamp(40, 240)),
            Err(_) => None,
        }
    }

    pub fn with_max_width(mut self, width: usize) -> Self {
        self.max_width = Some(width);
        self
    }

    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    fn bold_header(&self, text: &str) -> Cell {
        if self.use_colors {
            Cell::new(text).add_attribute(Attribute::Bold).fg(Color::Cyan)
        } else {
            Cell::new(text).add_attribute(Attribute::Bold)
        }
    }

    fn colored_cell(&self, text: &str, color: Color) -> Cell {
        if self.use_colors {
            Cell::new(text).fg(color)
        } else {
            Cell::new(text)
        }
    }

    fn styled(&self, text: &str, style: fn(&str) -> StyledContent<&str>) -> String {
        if self.use_colors {
            style(text).to_string()
        } else {
            text.to_string()
        }
    }

    fn dim(&self, text: &str) -> String {
        self.styled(text, |t| t.dim())
    }

    fn bold(&self, text: &str) -> String {
        self.styled(text, |t| t.bold())
    }

    fn new_table(&self, headers: &[&str]) -> Table {
        let mut table = Table::new();
        table.load_preset(presets::UTF8_FULL);
        table.set_content_arrangement(ContentArrangement::Dynamic);
        if let Some(width) = self.max_width {
            table.set_width(width as u16);
        }
        let cells: Vec<Cell> = headers.iter().map(|h| self.bold_header(h)).collect();
        table.set_header(cells);
        table
    }

    // Two-column label/value table without borders
    fn key_value_table(&self, rows: &[(&str, String)]) -> Table {
        let mut table = Table::new();
        table.load_preset(presets::NOTHING);
        for (label, value) in rows {
            table.add_row(vec![
                Cell::new(label).add_attribute(Attribute::Bold),
                Cell::new(value).set_alignment(CellAlignment::Right),
            ]);
        }
        table
    }

    fn score_cell(&self, score: Option<f64>) -> Cell {
        let text = format_score(score);
        let cell = match score {
            None => self.colored_cell(&text, Color::DarkGrey),
            Some(s) => self.colored_cell(&text, score_color(s)),
        };
        cell.set_alignment(CellAlignment::Right)
    }

    /// Search results with a metadata footer
    pub fn render_search_results(
        &self,
        results: &[Value],
        metadata: &Value,
        full_text: bool,
    ) -> String {
        if results.is_empty() {
            return "No results found.".to_string();
        }

        let total = count_field(metadata, "total_results", results.len() as u64);
        let mut table = self.new_table(&[
            "#",
            "Score",
            "Patient",
            "Encounter",
            "Note Type",
            "Date",
            "Text",
        ]);

        let text_key = if full_text { "text_full" } else { "text_chunk" };
        for (idx, result) in results.iter().enumerate() {
            table.add_row(vec![
                self.colored_cell(&(idx + 1).to_string(), Color::DarkGrey),
                self.score_cell(result.get("score").and_then(Value::as_f64)),
                Cell::new(take_chars(&field_text(result, "patient_id"), ID_WIDTH)),
                Cell::new(take_chars(&field_text(result, "encounter_id"), ID_WIDTH)),
                Cell::new(truncate_text(&field_text(result, "note_type"), NOTE_TYPE_WIDTH)),
                Cell::new(take_chars(&field_text(result, "note_date"), DATE_WIDTH)),
                Cell::new(truncate_text(&field_text(result, text_key), DEFAULT_TEXT_WIDTH)),
            ]);
        }

        let mut output = format!("Search Results ({} results)\n{}", total, table);
        let summary = search_summary(metadata);
        if !summary.is_empty() {
            output.push_str(&format!("\n\n{}", self.dim(&summary)));
        }
        output
    }

    pub fn render_history_list(&self, response: &Value, items: &[Value]) -> String {
        if items.is_empty() {
            return "No search history found.".to_string();
        }

        let total = count_field(response, "total_count", items.len() as u64);
        let page = count_field(response, "page", 1);
        let page_size = count_field(response, "page_size", 20).max(1);

        let mut table =
            self.new_table(&["ID", "Type", "Query", "Results", "Duration", "Date"]);
        for item in items {
            table.add_row(vec![
                Cell::new(take_chars(&field_text(item, "id"), 36)),
                Cell::new(field_text(item, "search_type")),
                Cell::new(truncate_text(&field_text(item, "query"), 40)),
                Cell::new(count_field(item, "result_count", 0))
                    .set_alignment(CellAlignment::Right),
                Cell::new(format_duration(item.get("duration_ms")))
                    .set_alignment(CellAlignment::Right),
                Cell::new(take_chars(&field_text(item, "created_at"), TIMESTAMP_WIDTH)),
            ]);
        }

        let mut output = format!("Search History (Page {}, {} total)\n{}", page, total, table);
        if bool_field(response, "has_more") {
            let pages = total.div_ceil(page_size);
            output.push_str(&format!(
                "\n{}",
                self.dim(&format!(
                    "Page {} of {}. Use --page to see more.",
                    page, pages
                ))
            ));
        }
        output
    }

    pub fn render_cohorts(&self, response: &Value, items: &[Value]) -> String {
        if items.is_empty() {
            return "No indexed cohorts found.".to_string();
        }

        let total = count_field(response, "total_count", items.len() as u64);
        let mut table = self.new_table(&["Cohort ID", "Name", "Chunks", "Status"]);
        for item in items {
            table.add_row(vec![
                Cell::new(field_text(item, "cohort_id")),
                Cell::new(truncate_text(&field_or_dash(item, "cohort_name"), 40)),
                Cell::new(count_field(item, "chunk_count", 0))
                    .set_alignment(CellAlignment::Right),
                Cell::new(field_or_dash(item, "index_status")),
            ]);
        }

        format!("Indexed Cohorts ({} total)\n{}", total, table)
    }

    pub fn render_note_types(&self, response: &Value, items: &[Value]) -> String {
        if items.is_empty() {
            return "No note types found.".to_string();
        }

        let total = count_field(response, "total_count", items.len() as u64);
        let mut table = self.new_table(&["Note Type", "Count", "First Seen", "Last Seen"]);
        for item in items {
            table.add_row(vec![
                Cell::new(truncate_text(&field_text(item, "note_type"), 50)),
                Cell::new(count_field(item, "note_count", 0))
                    .set_alignment(CellAlignment::Right),
                Cell::new(take_chars(&field_text(item, "first_seen_at"), DATE_WIDTH)),
                Cell::new(take_chars(&field_text(item, "last_seen_at"), DATE_WIDTH)),
            ]);
        }

        format!("Note Types ({} total)\n{}", total, table)
    }

    /// Summary block for `stats history`
    pub fn render_history_stats(&self, stats: &Value) -> String {
        let avg_results = stats
            .get("avg_result_count")
            .and_then(Value::as_f64)
            .unwrap_or(0.0);
        let avg_duration = match stats.get("avg_duration_ms").and_then(Value::as_f64) {
            Some(ms) if ms != 0.0 => format!("{:.0}ms", ms),
            _ => "-".to_string(),
        };

        let rows = [
            (
                "Total Searches",
                count_field(stats, "total_searches", 0).to_string(),
            ),
            (
                "Unique Queries",
                count_field(stats, "unique_queries", 0).to_string(),
            ),
            ("Avg Results", format!("{:.1}", avg_results)),
            ("Avg Duration", avg_duration),
        ];

        let mut output = format!(
            "{}\n\n{}",
            self.styled("Search History Statistics", |t| t.bold().cyan()),
            self.key_value_table(&rows)
        );

        if let Some(by_type) = stats.get("searches_by_type").and_then(Value::as_object) {
            if !by_type.is_empty() {
                output.push_str(&format!("\n\n{}", self.bold("By Search Type:")));
                // serde_json maps iterate in key order
                for (search_type, count) in by_type {
                    output.push_str(&format!("\n  {}: {}", search_type, json_text(count)));
                }
            }
        }

        if let Some(range) = stats.get("date_range").and_then(Value::as_object) {
            let bounds: Vec<String> = [("Earliest", "earliest"), ("Latest", "latest")]
                .into_iter()
                .filter_map(|(label, key)| {
                    range
                        .get(key)
                        .filter(|v| is_present(v))
                        .map(|v| format!("{}: {}", label, take_chars(&json_text(v), TIMESTAMP_WIDTH)))
                })
                .collect();
            if !bounds.is_empty() {
                output.push('\n');
                for line in bounds {
                    output.push_str(&format!("\n{}", self.dim(&line)));
                }
            }
        }

        output
    }

    pub fn render_filter_fields(&self, fields: &[Value], namespace: &str) -> String {
        if fields.is_empty() {
            return format!("No filter fields found for namespace '{}'.", namespace);
        }

        let mut table = self.new_table(&["Field Name", "Category", "Values"]);
        for field in fields {
            table.add_row(vec![
                Cell::new(field_text(field, "field_name")),
                Cell::new(field_text(field, "field_category")),
                Cell::new(count_field(field, "value_count", 0))
                    .set_alignment(CellAlignment::Right),
            ]);
        }

        format!("Filter Fields ({} fields)\n{}", fields.len(), table)
    }

    pub fn render_filter_values(&self, response: &Value, values: &[Value], field: &str) -> String {
        if values.is_empty() {
            return format!("No values found for field '{}'.", field);
        }

        let total = count_field(response, "total_values", values.len() as u64);
        let mut table = self.new_table(&["Value", "CUI", "Count"]);
        for value in values {
            table.add_row(vec![
                Cell::new(truncate_text(&field_text(value, "text_value"), 50)),
                Cell::new(field_or_dash(value, "cui")),
                Cell::new(count_field(value, "occurrence_count", 0))
                    .set_alignment(CellAlignment::Right),
            ]);
        }

        format!("Filter Values for '{}' ({} total)\n{}", field, total, table)
    }

    /// Detail view for one history entry. Full result payloads are left out;
    /// only the request and the response metadata are shown.
    pub fn render_history_entry(&self, entry: &Value) -> String {
        let rows = [
            ("ID", field_text(entry, "id")),
            ("Type", field_text(entry, "search_type")),
            ("Query", field_text(entry, "query")),
            ("Results", count_field(entry, "result_count", 0).to_string()),
            ("Duration", format_duration(entry.get("duration_ms"))),
            ("Status", field_text(entry, "status_code")),
            ("User ID", field_or_dash(entry, "user_id")),
            (
                "Created",
                take_chars(&field_text(entry, "created_at"), TIMESTAMP_WIDTH),
            ),
        ];

        let mut table = self.key_value_table(&rows);
        table.load_preset(presets::UTF8_FULL);
        table.set_header(vec![self.bold_header("Search History Entry"), Cell::new("")]);

        let mut output = table.to_string();

        if let Some(payload) = entry.get("request_payload").filter(|v| is_present(v)) {
            output.push_str(&format!(
                "\n\n{}\n{}",
                self.bold("Request Payload:"),
                pretty(payload)
            ));
        }

        if let Some(metadata) = entry
            .get("response_payload")
            .and_then(|p| p.get("metadata"))
            .filter(|v| is_present(v))
        {
            output.push_str(&format!(
                "\n\n{}\n{}",
                self.bold("Response Metadata:"),
                pretty(metadata)
            ));
        }

        if let Some(error) = entry.get("error_message").filter(|v| is_present(v)) {
            output.push_str(&format!(
                "\n\n{}",
                self.styled(&format!("Error: {}", json_text(error)), |t| t.red())
            ));
        }

        output
    }

    /// Static entity and assertion catalog
    pub fn render_entity_catalog(&self) -> String {
        format!(
            "{}\n\n{}\n\n{}",
            self.catalog_table("Entity Types", ENTITY_TYPES),
            self.catalog_table("Assertion Types", ASSERTION_TYPES),
            self.dim(COMBINATION_HINT)
        )
    }

    fn catalog_table(&self, title: &str, entries: &[CatalogEntry]) -> String {
        let mut table = self.new_table(&["Name", "Description"]);
        for entry in entries {
            table.add_row(vec![entry.name, entry.description]);
        }
        format!("{}\n{}", title, table)
    }
}

impl Default for TableDisplay {
    fn default() -> Self {
        Self::new()
    }
}

/// Four decimals, or `-` when absent
pub fn format_score(score: Option<f64>) -> String {
    match score {
        Some(s) => format!("{:.4}", s),
        None => "-".to_string(),
    }
}

pub fn score_color(score: f64) -> Color {
    if score >= 0.8 {
        Color::Green
    } else if score >= 0.5 {
        Color::Yellow
    } else {
        Color::Red
    }
}

fn search_summary(metadata: &Value) -> String {
    let mut parts = Vec::new();
    for (label, key) in [
        ("Patients", "unique_patients"),
        ("Encounters", "unique_encounters"),
        ("Notes", "unique_notes"),
        ("Type", "search_type"),
    ] {
        if let Some(value) = metadata.get(key).filter(|v| is_present(v)) {
            parts.push(format!("{}: {}", label, json_text(value)));
        }
    }
    if let Some(reranked) = metadata.get("reranked").and_then(Value::as_bool) {
        parts.push(format!("Reranked: {}", if reranked { "yes" } else { "no" }));
    }
    parts.join(" | ")
}

fn format_duration(value: Option<&Value>) -> String {
    match value.filter(|v| is_present(v)) {
        Some(ms) => format!("{}ms", json_text(ms)),
        None => "-".to_string(),
    }
}

// Text of a scalar; strings are unquoted
fn json_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn field_text(item: &Value, key: &str) -> String {
    item.get(key).map(json_text).unwrap_or_default()
}

fn field_or_dash(item: &Value, key: &str) -> String {
    match field_text(item, key) {
        s if s.is_empty() => "-".to_string(),
        s => s,
    }
}

// Null, false, zero and empty values are treated as absent
fn is_present(value: &Value) -> bool {
    !is_blank_json(value)
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn plain() -> TableDisplay {
        TableDisplay::new().with_max_width(200).with_colors(false)
    }

    #[test]
    fn test_table_display_creation() {
        let display = TableDisplay::new().with_max_width(80).with_colors(false);
        assert_eq!(display.max_width, Some(80));
        assert!(!display.use_colors);
    }

    #[test]
    fn test_format_score() {
        assert_eq!(format_score(Some(0.91234)), "0.9123");
        assert_eq!(format_score(Some(1.0)), "1.0000");
        assert_eq!(format_score(None), "-");
    }

    #[test]
    fn test_score_color_bands() {
        assert_eq!(score_color(0.95), Color::Green);
        assert_eq!(score_color(0.8), Color::Green);
        assert_eq!(score_color(0.5), Color::Yellow);
        assert_eq!(score_color(0.49), Color::Red);
    }

    #[test]
    fn test_render_search_results() {
        let results = vec![json!({
            "score": 0.87654,
            "patient_id": "P1234567890123",
            "encounter_id": "E1",
            "note_type": "DISCHARGE SUMMARY",
            "note_date": "2024-05-01T10:00:00",
            "text_chunk": "Patient presented with chest pain",
            "text_full": "FULL NOTE TEXT"
        })];
        let metadata = json!({
            "total_results": 1,
            "unique_patients": 1,
            "unique_encounters": 0,
            "search_type": "hybrid",
            "reranked": false
        });

        let output = plain().render_search_results(&results, &metadata, false);
        assert!(output.starts_with("Search Results (1 results)"));
        assert!(output.contains("0.8765"));
        assert!(output.contains("P12345678901"));
        assert!(!output.contains("P1234567890123"));
        assert!(output.contains("2024-05-01"));
        assert!(!output.contains("10:00:00"));
        assert!(output.contains("chest pain"));
        assert!(output.ends_with("Patients: 1 | Type: hybrid | Reranked: no"));

        let output = plain().render_search_results(&results, &metadata, true);
        assert!(output.contains("FULL NOTE TEXT"));
    }

    #[test]
    fn test_render_empty_lists() {
        let display = plain();
        assert_eq!(
            display.render_search_results(&[], &json!({}), false),
            "No results found."
        );
        assert_eq!(
            display.render_history_list(&json!({}), &[]),
            "No search history found."
        );
        assert_eq!(
            display.render_cohorts(&json!({}), &[]),
            "No indexed cohorts found."
        );
        assert_eq!(
            display.render_filter_fields(&[], "default"),
            "No filter fields found for namespace 'default'."
        );
        assert_eq!(
            display.render_filter_values(&json!({}), &[], "symptoms_present"),
            "No values found for field 'symptoms_present'."
        );
    }

    #[test]
    fn test_render_history_list_page_hint() {
        let items = vec![json!({
            "id": "0b9f6c1e-6f7c-4d3e-9a0e-1d2c3b4a5f60",
            "search_type": "hybrid",
            "query": "sepsis",
            "result_count": 10,
            "duration_ms": 1234,
            "created_at": "2025-01-02T03:04:05.678Z"
        })];
        let response = json!({"total_count": 45, "page": 1, "page_size": 20, "has_more": true});

        let output = plain().render_history_list(&response, &items);
        assert!(output.starts_with("Search History (Page 1, 45 total)"));
        assert!(output.contains("1234ms"));
        assert!(output.contains("2025-01-02T03:04:05"));
        assert!(output.ends_with("Page 1 of 3. Use --page to see more."));

        let response = json!({"total_count": 1, "page": 1, "page_size": 20, "has_more": false});
        let output = plain().render_history_list(&response, &items);
        assert!(!output.contains("Use --page"));
    }

    #[test]
    fn test_render_history_stats() {
        let stats = json!({
            "total_searches": 120,
            "unique_queries": 37,
            "avg_result_count": 8.25,
            "avg_duration_ms": 412.6,
            "searches_by_type": {"semantic": 20, "hybrid": 100},
            "date_range": {"earliest": "2025-01-01T00:00:00.000Z", "latest": null}
        });

        let output = plain().render_history_stats(&stats);
        assert!(output.starts_with("Search History Statistics"));
        assert!(output.contains("120"));
        assert!(output.contains("8.2") || output.contains("8.3"));
        assert!(output.contains("413ms"));
        let hybrid = output.find("hybrid: 100").expect("hybrid listed");
        let semantic = output.find("semantic: 20").expect("semantic listed");
        assert!(hybrid < semantic);
        assert!(output.contains("Earliest: 2025-01-01T00:00:00"));
        assert!(!output.contains("Latest:"));
    }

    #[test]
    fn test_render_history_stats_without_duration() {
        let output = plain().render_history_stats(&json!({}));
        assert!(output.contains("Avg Duration"));
        assert!(output.contains("0.0"));
        assert!(!output.contains("By Search Type"));
    }

    #[test]
    fn test_render_history_entry() {
        let entry = json!({
            "id": "abc-123",
            "search_type": "semantic",
            "query": "pneumonia",
            "result_count": 3,
            "duration_ms": null,
            "status_code": 200,
            "user_id": null,
            "created_at": "2025-02-03T04:05:06.789Z",
            "request_payload": {"query": "pneumonia", "k": 3},
            "response_payload": {"results": [1, 2, 3], "metadata": {"total_results": 3}},
            "error_message": null
        });

        let output = plain().render_history_entry(&entry);
        assert!(output.contains("Search History Entry"));
        assert!(output.contains("abc-123"));
        assert!(output.contains("Request Payload:"));
        assert!(output.contains("\"k\": 3"));
        assert!(output.contains("Response Metadata:"));
        assert!(output.contains("\"total_results\": 3"));
        assert!(!output.contains("\"results\""));
        assert!(!output.contains("Error:"));
    }

    #[test]
    fn test_render_entity_catalog() {
        let output = plain().render_entity_catalog();
        assert!(output.starts_with("Entity Types"));
        assert!(output.contains("Assertion Types"));
        assert!(output.contains("lab_tests"));
        assert!(output.contains("hypothetical"));
        assert!(output.ends_with(COMBINATION_HINT));
    }

    #[test]
    fn test_is_present() {
        assert!(!is_present(&json!(null)));
        assert!(!is_present(&json!(0)));
        assert!(!is_present(&json!("")));
        assert!(!is_present(&json!({})));
        assert!(is_present(&json!(3)));
        assert!(is_present(&json!({"a": 1})));
    }
}
