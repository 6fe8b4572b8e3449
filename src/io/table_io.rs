use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

use crate::model::row::{Row, sort_by_order};
use crate::model::table::{Table, TableDoc};

/// File name looked for during discovery
pub const TABLE_FILE: &str = "table.toml";

/// Error type for table I/O operations
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error("not a grouptable directory: no table.toml found")]
    NotATable,
    #[error("could not read {path}: {source}")]
    ReadError { path: PathBuf, source: io::Error },
    #[error("could not write {path}: {source}")]
    WriteError { path: PathBuf, source: io::Error },
    #[error("could not parse table.toml: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("could not parse table.toml: {0}")]
    DocumentError(#[from] toml_edit::TomlError),
    #[error("cannot rewrite rows in table.toml: {0}")]
    UnsupportedLayout(String),
    #[error("io error: {0}")]
    IoError(#[from] io::Error),
}

/// Walk up from `start` looking for a directory that contains table.toml.
pub fn discover_table(start: &Path) -> Result<PathBuf, TableError> {
    let mut current = start.to_path_buf();
    loop {
        if current.join(TABLE_FILE).is_file() {
            return Ok(current);
        }
        if !current.pop() {
            return Err(TableError::NotATable);
        }
    }
}

/// Load the table in `root`.
///
/// Rows come back sorted by key. Stored spans are kept as written so that
/// `gt check` can report stale ones.
pub fn load_table(root: &Path) -> Result<Table, TableError> {
    let path = root.join(TABLE_FILE);
    let text = fs::read_to_string(&path).map_err(|e| TableError::ReadError {
        path: path.clone(),
        source: e,
    })?;
    let mut doc: TableDoc = toml::from_str(&text)?;
    let source: toml_edit::DocumentMut = text.parse()?;
    sort_by_order(&mut doc.rows);
    debug!(path = %path.display(), rows = doc.rows.len(), "loaded table");

    Ok(Table {
        root: root.to_path_buf(),
        path,
        doc,
        source,
    })
}

/// Replace the table's rows and write the file back.
///
/// Only `group`, `order` and `span` are touched in the document; comments and
/// payload formatting survive. Row entries are re-sorted by key so the file
/// reads in table order.
pub fn save_rows(table: &mut Table, rows: Vec<Row>) -> Result<(), TableError> {
    apply_rows(&mut table.source, &rows)?;
    atomic_write(&table.path, table.source.to_string().as_bytes()).map_err(|e| {
        TableError::WriteError {
            path: table.path.clone(),
            source: e,
        }
    })?;
    debug!(path = %table.path.display(), rows = rows.len(), "saved table");
    table.doc.rows = rows;
    Ok(())
}

/// Write ordering fields from `rows` into the rows of `doc`.
///
/// Rows may be written as `[[rows]]` tables or as an inline `rows = [...]`
/// array of inline tables. Anything else is an error, never a silent skip.
pub fn apply_rows(doc: &mut toml_edit::DocumentMut, rows: &[Row]) -> Result<(), TableError> {
    let by_id: HashMap<&str, &Row> = rows.iter().map(|r| (r.id.as_str(), r)).collect();
    let Some(item) = doc.get_mut("rows") else {
        if rows.is_empty() {
            return Ok(());
        }
        return Err(TableError::UnsupportedLayout("no `rows` entry".to_string()));
    };

    if let Some(entries) = item.as_array_of_tables_mut() {
        rewrite_table_array(entries, &by_id);
        return Ok(());
    }
    match item.as_array_mut() {
        Some(entries) if entries.iter().all(|v| v.is_inline_table()) => {
            rewrite_inline_array(entries, &by_id);
            Ok(())
        }
        _ => Err(TableError::UnsupportedLayout(
            "`rows` must be [[rows]] tables or an array of inline tables".to_string(),
        )),
    }
}

fn rewrite_table_array(entries: &mut toml_edit::ArrayOfTables, by_id: &HashMap<&str, &Row>) {
    let mut tables: Vec<(f64, toml_edit::Table)> = Vec::with_capacity(entries.len());
    for table in entries.iter() {
        let mut table = table.clone();
        let row = table
            .get("id")
            .and_then(|v| v.as_str())
            .and_then(|id| by_id.get(id).copied());
        let order = match row {
            Some(row) => {
                table["group"] = toml_edit::value(row.group.as_str());
                table["order"] = toml_edit::value(row.order);
                match row.span {
                    Some(span) => table["span"] = toml_edit::value(span as i64),
                    None => {
                        table.remove("span");
                    }
                }
                row.order
            }
            None => f64::INFINITY,
        };
        tables.push((order, table));
    }

    // The document renders tables by parse position, so hand the existing
    // positions out again in the new order.
    let mut positions: Vec<Option<usize>> = tables.iter().map(|(_, t)| t.position()).collect();
    positions.sort();

    tables.sort_by(|a, b| a.0.total_cmp(&b.0));
    entries.clear();
    for ((_, mut table), position) in tables.into_iter().zip(positions) {
        if let Some(position) = position {
            table.set_position(position);
        }
        entries.push(table);
    }
}

fn rewrite_inline_array(entries: &mut toml_edit::Array, by_id: &HashMap<&str, &Row>) {
    // Leading whitespace belongs to the slot, not the row.
    let decors: Vec<toml_edit::Decor> = entries.iter().map(|v| v.decor().clone()).collect();

    let mut values: Vec<(f64, toml_edit::Value)> = Vec::with_capacity(entries.len());
    for value in entries.iter() {
        let mut value = value.clone();
        let order = match value.as_inline_table_mut() {
            Some(table) => {
                let row = table
                    .get("id")
                    .and_then(|v| v.as_str())
                    .and_then(|id| by_id.get(id).copied());
                match row {
                    Some(row) => {
                        set_inline(table, "group", row.group.as_str().into());
                        set_inline(table, "order", row.order.into());
                        match row.span {
                            Some(span) => set_inline(table, "span", (span as i64).into()),
                            None => {
                                table.remove("span");
                            }
                        }
                        row.order
                    }
                    None => f64::INFINITY,
                }
            }
            None => f64::INFINITY,
        };
        values.push((order, value));
    }

    values.sort_by(|a, b| a.0.total_cmp(&b.0));
    entries.clear();
    for ((_, mut value), decor) in values.into_iter().zip(decors) {
        *value.decor_mut() = decor;
        entries.push_formatted(value);
    }
}

/// Replace or add `key`, keeping the spacing of a value it replaces
fn set_inline(table: &mut toml_edit::InlineTable, key: &str, mut value: toml_edit::Value) {
    if let Some(old) = table.get(key) {
        *value.decor_mut() = old.decor().clone();
    }
    table.insert(key, value);
}

/// Write a brand-new table file. Fails if one exists unless `force` is set.
pub fn write_new_table(root: &Path, content: &str, force: bool) -> Result<PathBuf, TableError> {
    let path = root.join(TABLE_FILE);
    if path.exists() && !force {
        return Err(TableError::WriteError {
            path,
            source: io::Error::new(io::ErrorKind::AlreadyExists, "file exists (use --force)"),
        });
    }
    fs::create_dir_all(root)?;
    atomic_write(&path, content.as_bytes()).map_err(|e| TableError::WriteError {
        path: path.clone(),
        source: e,
    })?;
    Ok(path)
}

/// Write `content` to `path` atomically using a temp file + rename.
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
