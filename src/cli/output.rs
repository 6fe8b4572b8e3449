use std::borrow::Cow;

use serde::Serialize;

use crate::model::item::ItemId;
use crate::model::row::Row;
use crate::ops::grouping::Group;
use crate::util::unicode::{display_width, pad_to_width};

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct TableJson<'a> {
    pub name: &'a str,
    pub rows: &'a [Row],
}

#[derive(Serialize)]
pub struct GroupJson {
    pub id: String,
    pub size: usize,
    pub header: Option<String>,
    pub first: Option<f64>,
    pub last: Option<f64>,
}

#[derive(Serialize)]
pub struct MoveJson {
    pub active: ItemId,
    pub over: ItemId,
    pub changed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub moved: Vec<MovedRowJson>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct MovedRowJson {
    pub id: String,
    pub group: String,
    pub from: f64,
    pub to: f64,
}

#[derive(Serialize)]
pub struct NormalizeJson {
    pub rows: usize,
    pub step: f64,
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

pub fn group_to_json(group: &Group) -> GroupJson {
    GroupJson {
        id: group.id.clone(),
        size: group.len(),
        header: group.header().map(|r| r.id.clone()),
        first: group.first_key(),
        last: group.last_key(),
    }
}

/// Rows whose key or group differs between `before` and `after`, in `after` order.
pub fn moved_rows(before: &[Row], after: &[Row]) -> Vec<MovedRowJson> {
    after
        .iter()
        .filter_map(|row| {
            let old = before.iter().find(|r| r.id == row.id)?;
            if old.order == row.order && old.group == row.group {
                return None;
            }
            Some(MovedRowJson {
                id: row.id.clone(),
                group: row.group.clone(),
                from: old.order,
                to: row.order,
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Human-readable formatting
// ---------------------------------------------------------------------------

/// Format a group summary line
pub fn format_group_line(group: &Group) -> String {
    let noun = if group.len() == 1 { "row" } else { "rows" };
    match (group.first_key(), group.last_key()) {
        (Some(first), Some(last)) => format!(
            "{}  {} {}  [{} .. {}]",
            group.id,
            group.len(),
            noun,
            first,
            last
        ),
        _ => format!("{}  0 rows", group.id),
    }
}

/// Format one moved row for `gt mv`
pub fn format_moved_line(moved: &MovedRowJson) -> String {
    format!("{}  {} → {}  ({})", moved.id, moved.from, moved.to, moved.group)
}

/// Render rows as a text table with the group column merged.
///
/// Rows must be sorted with spans computed: the group cell is printed only on
/// rows that carry a span, and a rule is drawn above every group but the first.
pub fn render_table(rows: &[Row], columns: &[String]) -> String {
    let mut headers: Vec<Cow<'_, str>> = vec![Cow::Borrowed("group"), Cow::Borrowed("id")];
    headers.extend(columns.iter().map(|c| Cow::Borrowed(c.as_str())));

    let cells: Vec<Vec<Cow<'_, str>>> = rows
        .iter()
        .map(|row| {
            let mut line = vec![
                Cow::Borrowed(if row.is_header() { row.group.as_str() } else { "" }),
                Cow::Borrowed(row.id.as_str()),
            ];
            line.extend(
                columns
                    .iter()
                    .map(|c| row.field_text(c).unwrap_or(Cow::Borrowed(""))),
            );
            line
        })
        .collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| display_width(h)).collect();
    for line in &cells {
        for (w, cell) in widths.iter_mut().zip(line) {
            *w = (*w).max(display_width(cell));
        }
    }

    let join = |line: &[Cow<'_, str>]| -> String {
        let padded: Vec<String> = line
            .iter()
            .zip(&widths)
            .map(|(cell, &w)| pad_to_width(cell, w))
            .collect();
        padded.join(" | ").trim_end().to_string()
    };
    let rule = widths
        .iter()
        .map(|&w| "-".repeat(w))
        .collect::<Vec<_>>()
        .join("-+-");

    let mut out = String::new();
    out.push_str(&join(&headers));
    out.push('\n');
    out.push_str(&rule);
    out.push('\n');
    for (i, (row, line)) in rows.iter().zip(&cells).enumerate() {
        if i > 0 && row.is_header() {
            out.push_str(&rule);
            out.push('\n');
        }
        out.push_str(&join(line));
        out.push('\n');
    }
    out
}
