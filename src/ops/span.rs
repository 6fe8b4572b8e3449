use std::collections::HashMap;

use crate::model::row::{Row, sort_by_order};
use crate::ops::grouping::partition;

/// Refresh the group-cell bookkeeping.
///
/// Returns the rows sorted by key. The first member of every group gets
/// `span = Some(member count)`; every other row gets `None`.
pub fn recompute_spans(rows: &[Row]) -> Vec<Row> {
    let headers: HashMap<String, usize> = partition(rows)
        .into_iter()
        .filter_map(|g| g.header().map(|h| (h.id.clone(), g.len())))
        .collect();

    let mut out = rows.to_vec();
    sort_by_order(&mut out);
    for row in &mut out {
        row.span = headers.get(&row.id).copied();
    }
    out
}
