/// Results Grid Module for emptrack
///
/// Renders listings as padded text tables (or JSON) for the terminal.
/// Columns are addressed by their storage field name and displayed under a
/// human-readable label.
use crate::core::Result;
use once_cell::sync::Lazy;
use serde_json::{Map, Value as JsonValue};
use std::collections::HashMap;

/// Storage field name to display label.
static LABELS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("id", "id"),
        ("name", "Department"),
        ("title", "Role"),
        ("salary", "Salary"),
        ("department_id", "Department id"),
        ("department_name", "Department"),
        ("first_name", "First name"),
        ("last_name", "Last name"),
        ("role_id", "Role id"),
        ("manager_id", "Manager id"),
        ("manager_name", "Manager"),
        ("total_budget", "Total Budget"),
    ])
});

/// Returns the display label for a storage field name.
///
/// Unknown fields are shown as-is.
pub fn display_label(field: &str) -> &str {
    LABELS.get(field).copied().unwrap_or(field)
}

/// A record that can provide a display value for a storage field.
pub trait Tabular {
    fn cell(&self, field: &str) -> String;
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Padded text table
    #[default]
    Table,
    /// JSON array of label-keyed objects
    Json,
}

/// Represents a single row of the grid.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub cells: Vec<String>,
}

/// A table of string cells under display-label headers.
#[derive(Debug, Clone, Default)]
pub struct ResultsGrid {
    pub headers: Vec<String>,
    pub rows: Vec<Row>,
}

impl ResultsGrid {
    /// Creates a grid whose headers are the display labels of `fields`.
    pub fn with_fields(fields: &[&str]) -> Self {
        ResultsGrid {
            headers: fields.iter().map(|f| display_label(f).to_string()).collect(),
            rows: Vec::new(),
        }
    }

    /// Builds a grid with one row per record, one column per field.
    pub fn from_records<T: Tabular>(fields: &[&str], records: &[T]) -> Self {
        let mut grid = Self::with_fields(fields);
        for record in records {
            grid.add_row(fields.iter().map(|f| record.cell(f)).collect());
        }
        grid
    }

    /// Adds a row to the grid. Each row is represented as a vector of strings.
    pub fn add_row(&mut self, row: Vec<String>) {
        self.rows.push(Row { cells: row });
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn column_widths(&self) -> Vec<usize> {
        let columns = self
            .rows
            .iter()
            .map(|r| r.cells.len())
            .chain(std::iter::once(self.headers.len()))
            .max()
            .unwrap_or(0);

        (0..columns)
            .map(|i| {
                let header = self.headers.get(i).map_or(0, |h| h.chars().count());
                self.rows
                    .iter()
                    .filter_map(|r| r.cells.get(i))
                    .map(|c| c.chars().count())
                    .fold(header, usize::max)
            })
            .collect()
    }

    /// Renders the grid as aligned text with a header rule and a row count.
    pub fn render(&self) -> String {
        let widths = self.column_widths();
        let mut output = String::new();

        if !self.headers.is_empty() {
            output.push_str(&render_line(&self.headers, &widths));
            output.push('\n');
            let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
            output.push_str(&rule.join("-+-"));
            output.push('\n');
        }
        for row in &self.rows {
            output.push_str(&render_line(&row.cells, &widths));
            output.push('\n');
        }
        output.push_str(&format!("({} rows)\n", self.rows.len()));
        output
    }

    /// Renders the rows as a JSON array of objects keyed by header label.
    pub fn to_json(&self) -> Result<String> {
        let rows: Vec<JsonValue> = self
            .rows
            .iter()
            .map(|row| {
                let mut obj = Map::new();
                for (i, value) in row.cells.iter().enumerate() {
                    let key = self
                        .headers
                        .get(i)
                        .cloned()
                        .unwrap_or_else(|| format!("column_{}", i));
                    obj.insert(key, JsonValue::String(value.clone()));
                }
                JsonValue::Object(obj)
            })
            .collect();
        Ok(serde_json::to_string_pretty(&rows)?)
    }

    /// Renders in the requested format.
    pub fn render_as(&self, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Table => Ok(self.render()),
            OutputFormat::Json => self.to_json().map(|json| json + "\n"),
        }
    }
}

fn render_line(cells: &[String], widths: &[usize]) -> String {
    let padded: Vec<String> = widths
        .iter()
        .enumerate()
        .map(|(i, width)| {
            let cell = cells.get(i).map(String::as_str).unwrap_or("");
            format!("{:<width$}", cell, width = *width)
        })
        .collect();
    padded.join(" | ").trim_end().to_string()
}
