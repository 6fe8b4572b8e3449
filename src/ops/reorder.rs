use tracing::{debug, warn};

use crate::model::item::ItemId;
use crate::model::row::Row;
use crate::ops::classify::{MoveError, classify};
use crate::ops::grouping::find_group;
use crate::ops::reinsert::{Bounds, reinsert_group, reinsert_row};
use crate::ops::span::recompute_spans;

/// Drop `active` onto `over` and return the updated rows.
///
/// Any move that cannot be carried out (unknown ids, dropping an item onto
/// itself, keys too close together to split) returns the input unchanged.
/// Use [`try_reorder`] to find out why.
pub fn reorder(rows: &[Row], active: &ItemId, over: &ItemId) -> Vec<Row> {
    match try_reorder(rows, active, over) {
        Ok(out) => out,
        Err(e @ MoveError::PrecisionExhausted { .. }) => {
            warn!(%active, %over, "move rejected: {}", e);
            rows.to_vec()
        }
        Err(e) => {
            debug!(%active, %over, "move ignored: {}", e);
            rows.to_vec()
        }
    }
}

/// Like [`reorder`], but reports why nothing happened.
///
/// On success only the moved row, or every member of the moved group, gets a
/// new key. The result is sorted by key with group spans recomputed.
pub fn try_reorder(rows: &[Row], active: &ItemId, over: &ItemId) -> Result<Vec<Row>, MoveError> {
    let plan = classify(rows, active, over)?;
    debug!(
        %active,
        %over,
        direction = ?plan.direction,
        boundary = plan.boundary,
        "resolved move"
    );

    let mut out = rows.to_vec();
    match &plan.active {
        ItemId::Row(id) => {
            let (bounds, key) = reinsert_row(rows, plan.direction, plan.boundary);
            check_precision(bounds, &[key])?;
            if let Some(row) = out.iter_mut().find(|r| r.id == *id) {
                row.order = key;
                row.group = plan.target_group.clone();
            }
        }
        ItemId::Group(id) => {
            let group = find_group(rows, id).ok_or_else(|| MoveError::UnknownGroup(id.clone()))?;
            let (bounds, keys) = reinsert_group(rows, plan.direction, plan.boundary, group.len());
            check_precision(bounds, &keys)?;
            for (member, key) in group.members.iter().zip(keys) {
                if let Some(row) = out.iter_mut().find(|r| r.id == member.id) {
                    row.order = key;
                }
            }
        }
    }

    Ok(recompute_spans(&out))
}

fn check_precision(bounds: Bounds, keys: &[f64]) -> Result<(), MoveError> {
    if bounds.admits(keys) {
        Ok(())
    } else {
        Err(MoveError::PrecisionExhausted {
            up: bounds.up,
            down: bounds.down,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// a: r1 r2 r3, b: r4 r5, c: r6
    fn sample_rows() -> Vec<Row> {
        recompute_spans(&[
            Row::new("r1", "a", 1.0).with_field("name", "Apple"),
            Row::new("r2", "a", 2.0).with_field("name", "Pear"),
            Row::new("r3", "a", 3.0).with_field("name", "Plum"),
            Row::new("r4", "b", 4.0).with_field("name", "Milk"),
            Row::new("r5", "b", 5.0).with_field("name", "Cheese"),
            Row::new("r6", "c", 6.0).with_field("name", "Bread"),
        ])
    }

    fn find<'a>(rows: &'a [Row], id: &str) -> &'a Row {
        rows.iter().find(|r| r.id == id).unwrap()
    }

    fn ids(rows: &[Row]) -> Vec<&str> {
        rows.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn test_row_into_other_group() {
        let rows = sample_rows();
        let out = reorder(&rows, &ItemId::row("r2"), &ItemId::row("r4"));

        let moved = find(&out, "r2");
        assert_eq!(moved.order, 4.5);
        assert_eq!(moved.group, "b");
        assert_eq!(moved.field_text("name").as_deref(), Some("Pear"));

        for id in ["r1", "r3", "r4", "r5", "r6"] {
            assert_eq!(find(&out, id).order, find(&rows, id).order, "{} moved", id);
        }
        assert_eq!(ids(&out), vec!["r1", "r3", "r4", "r2", "r5", "r6"]);
        assert_eq!(find(&out, "r1").span, Some(2));
        assert_eq!(find(&out, "r4").span, Some(3));
    }

    #[test]
    fn test_group_to_top() {
        let rows = sample_rows();
        let out = reorder(&rows, &ItemId::group("b"), &ItemId::row("r1"));

        let r4 = find(&out, "r4").order;
        let r5 = find(&out, "r5").order;
        assert!((r4 - 1.0 / 3.0).abs() < 1e-12);
        assert!((r5 - 2.0 / 3.0).abs() < 1e-12);
        for id in ["r1", "r2", "r3", "r6"] {
            assert_eq!(find(&out, id).order, find(&rows, id).order);
        }
        assert_eq!(ids(&out), vec!["r4", "r5", "r1", "r2", "r3", "r6"]);
        assert_eq!(find(&out, "r4").span, Some(2));
    }

    #[test]
    fn test_group_to_bottom() {
        let out = reorder(&sample_rows(), &ItemId::group("a"), &ItemId::group("c"));
        assert_eq!(ids(&out), vec!["r4", "r5", "r6", "r1", "r2", "r3"]);
        let keys: Vec<f64> = out[3..].iter().map(|r| r.order).collect();
        assert_eq!(keys, vec![7.0, 8.0, 9.0]);
    }

    #[test]
    fn test_group_between_groups() {
        let out = reorder(&sample_rows(), &ItemId::group("c"), &ItemId::group("b"));
        assert_eq!(ids(&out), vec!["r1", "r2", "r3", "r6", "r4", "r5"]);
        assert_eq!(find(&out, "r6").order, 3.5);
    }

    #[test]
    fn test_row_within_group() {
        let out = reorder(&sample_rows(), &ItemId::row("r1"), &ItemId::row("r2"));
        assert_eq!(ids(&out), vec!["r2", "r1", "r3", "r4", "r5", "r6"]);
        assert_eq!(find(&out, "r1").order, 2.5);
        // r2 is the new header of a
        assert_eq!(find(&out, "r2").span, Some(3));
        assert_eq!(find(&out, "r1").span, None);
    }

    #[test]
    fn test_last_row_leaves_singleton_group() {
        let out = reorder(&sample_rows(), &ItemId::row("r6"), &ItemId::row("r5"));
        assert_eq!(find(&out, "r6").group, "b");
        assert_eq!(find(&out, "r6").order, 4.5);
        assert!(out.iter().all(|r| r.group != "c"));
        assert_eq!(find(&out, "r4").span, Some(3));
    }

    #[test]
    fn test_same_row_is_identical() {
        let rows = sample_rows();
        assert_eq!(reorder(&rows, &ItemId::row("r3"), &ItemId::row("r3")), rows);
    }

    #[test]
    fn test_unresolvable_is_identical() {
        let rows = sample_rows();
        assert_eq!(reorder(&rows, &ItemId::row("gone"), &ItemId::row("r3")), rows);
        assert_eq!(reorder(&rows, &ItemId::row("r1"), &ItemId::group("gone")), rows);
    }

    #[test]
    fn test_try_reorder_reports_reason() {
        let rows = sample_rows();
        assert_eq!(
            try_reorder(&rows, &ItemId::group("zz"), &ItemId::row("r1")),
            Err(MoveError::UnknownGroup("zz".into()))
        );
    }

    #[test]
    fn test_exhausted_gap_leaves_rows_unchanged() {
        let up = 1.0_f64;
        let rows = recompute_spans(&[
            Row::new("a", "g", up),
            Row::new("b", "g", f64::from_bits(up.to_bits() + 1)),
            Row::new("c", "g", 5.0),
        ]);
        let result = try_reorder(&rows, &ItemId::row("c"), &ItemId::row("b"));
        assert!(matches!(result, Err(MoveError::PrecisionExhausted { .. })));
        assert_eq!(reorder(&rows, &ItemId::row("c"), &ItemId::row("b")), rows);
    }
}
