pub mod table;

use serde::Serialize;

use crate::fetcher::RecordEntry;

pub const MISSING_FIELD: &str = "N/A";

pub const COLUMNS: [&str; 5] = ["Year", "Semester", "The Programs", "Nationality", "Colleges"];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
    Html,
}

impl OutputFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "text" | "txt" => Some(Self::Text),
            "json" => Some(Self::Json),
            "html" | "htm" => Some(Self::Html),
            _ => None,
        }
    }
}

pub fn infer_format_from_path(path: &str) -> Option<OutputFormat> {
    let lower = path.trim().to_lowercase();
    if lower.ends_with(".json") {
        return Some(OutputFormat::Json);
    }
    if lower.ends_with(".html") || lower.ends_with(".htm") {
        return Some(OutputFormat::Html);
    }
    if lower.ends_with(".txt") {
        return Some(OutputFormat::Text);
    }
    None
}

// One rendered table row; absent fields are already filled with N/A.
#[derive(Clone, Debug, Serialize)]
pub struct TableRow {
    pub year: String,
    pub semester: String,
    pub the_programs: String,
    pub nationality: String,
    pub colleges: String,
}

impl TableRow {
    pub fn cells(&self) -> [&str; 5] {
        [
            &self.year,
            &self.semester,
            &self.the_programs,
            &self.nationality,
            &self.colleges,
        ]
    }
}

// The original page rendered empty strings as N/A too (falsy in JS), so an
// empty value counts as absent.
fn cell(value: &Option<String>) -> String {
    match value.as_deref() {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => MISSING_FIELD.to_string(),
    }
}

pub fn build_rows(records: &[RecordEntry]) -> Vec<TableRow> {
    records
        .iter()
        .map(|record| TableRow {
            year: cell(&record.fields.year),
            semester: cell(&record.fields.semester),
            the_programs: cell(&record.fields.the_programs),
            nationality: cell(&record.fields.nationality),
            colleges: cell(&record.fields.colleges),
        })
        .collect()
}

pub fn no_data_message(filter_needle: &str) -> String {
    format!("No data available for \"{filter_needle}\".")
}

pub fn render_text(rows: &[TableRow], filter_needle: &str) -> Vec<u8> {
    if rows.is_empty() {
        let mut out = no_data_message(filter_needle);
        out.push('\n');
        return out.into_bytes();
    }
    let mut out = String::new();
    for row in rows {
        out.push_str(&row.cells().join(" | "));
        out.push('\n');
    }
    out.into_bytes()
}

pub fn render_json(rows: &[TableRow]) -> Vec<u8> {
    serde_json::to_vec_pretty(rows).unwrap_or_else(|_| b"[]\n".to_vec())
}

pub fn render(rows: &[TableRow], format: OutputFormat, filter_needle: &str) -> Vec<u8> {
    match format {
        OutputFormat::Text => render_text(rows, filter_needle),
        OutputFormat::Json => render_json(rows),
        OutputFormat::Html => table::render_html(rows, filter_needle),
    }
}
