use tracing::info;

use crate::model::row::Row;
use crate::ops::grouping::{Renumber, flatten, partition};
use crate::ops::span::recompute_spans;

/// The largest order key strictly below `key`, if any.
pub fn previous_key(rows: &[Row], key: f64) -> Option<f64> {
    rows.iter()
        .map(|r| r.order)
        .filter(|&k| k < key)
        .max_by(|a, b| a.total_cmp(b))
}

/// The smallest order key strictly above `key`, if any.
pub fn next_key(rows: &[Row], key: f64) -> Option<f64> {
    rows.iter()
        .map(|r| r.order)
        .filter(|&k| k > key)
        .min_by(|a, b| a.total_cmp(b))
}

/// Smallest distance between two adjacent keys. `None` with fewer than two rows.
pub fn smallest_gap(rows: &[Row]) -> Option<f64> {
    let mut keys: Vec<f64> = rows.iter().map(|r| r.order).collect();
    keys.sort_by(|a, b| a.total_cmp(b));
    keys.windows(2)
        .map(|w| w[1] - w[0])
        .min_by(|a, b| a.total_cmp(b))
}

/// Rewrite every key to `step, 2*step, 3*step, ...` in current group order.
///
/// This is the maintenance pass for tables whose keys have been split so many
/// times that midpoints are running out of precision. It touches every row, so
/// it is never run as part of a move.
pub fn renormalize(rows: &[Row], step: f64) -> Vec<Row> {
    let groups = partition(rows);
    let out = flatten(groups, Renumber::Sequential { step });
    info!(rows = out.len(), step, "renormalized order keys");
    recompute_spans(&out)
}
