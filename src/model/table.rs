use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::config::{OrderConfig, TableInfo};
use super::row::Row;

/// The typed contents of a table.toml file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableDoc {
    pub table: TableInfo,
    #[serde(default)]
    pub order: OrderConfig,
    #[serde(default)]
    pub rows: Vec<Row>,
}

/// A fully loaded table
#[derive(Debug)]
pub struct Table {
    /// Directory containing table.toml
    pub root: PathBuf,
    /// Path to table.toml itself
    pub path: PathBuf,
    /// Parsed settings and rows, rows sorted by order key
    pub doc: TableDoc,
    /// The raw document, kept for format-preserving writes
    pub source: toml_edit::DocumentMut,
}

impl Table {
    pub fn rows(&self) -> &[Row] {
        &self.doc.rows
    }

    /// Payload columns to display: the configured list, or every payload key
    /// in first-seen order.
    pub fn display_columns(&self) -> Vec<String> {
        if !self.doc.table.columns.is_empty() {
            return self.doc.table.columns.clone();
        }
        let mut cols: Vec<String> = Vec::new();
        for row in &self.doc.rows {
            for key in row.fields.keys() {
                if !cols.iter().any(|c| c == key) {
                    cols.push(key.clone());
                }
            }
        }
        cols
    }
}
