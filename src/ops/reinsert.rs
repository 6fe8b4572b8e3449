use serde::Serialize;

use crate::model::row::Row;
use crate::ops::order_key::{next_key, previous_key};

/// Which way an item travels through key space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Toward smaller keys
    Up,
    /// Toward larger keys
    Down,
}

/// The open interval a moved row or block has to land in
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub up: f64,
    pub down: f64,
}

impl Bounds {
    /// True if every key lies strictly inside the interval and the keys are
    /// strictly increasing. Fails once midpoints run out of float precision.
    pub fn admits(&self, keys: &[f64]) -> bool {
        let mut prev = self.up;
        for &k in keys {
            if k.is_nan() || k <= prev {
                return false;
            }
            prev = k;
        }
        prev < self.down
    }
}

/// Find the neighbors a moved item of `len` rows is inserted between.
///
/// Moving up, the item goes just before `target_key`; moving down, just after.
/// At the ends of the table the missing neighbor is synthesized: `0` below
/// (or one unit under the target when keys have gone non-positive), and
/// `len + 1` units above so a block gets whole-number spacing.
pub fn neighbor_bounds(rows: &[Row], direction: Direction, target_key: f64, len: usize) -> Bounds {
    match direction {
        Direction::Up => {
            let down = target_key;
            let up = previous_key(rows, down).unwrap_or_else(|| lower_bound(down));
            Bounds { up, down }
        }
        Direction::Down => {
            let up = target_key;
            let down = next_key(rows, up).unwrap_or(up + len as f64 + 1.0);
            Bounds { up, down }
        }
    }
}

fn lower_bound(down: f64) -> f64 {
    if down > 0.0 { 0.0 } else { down - 1.0 }
}

/// New key for a single row moved next to `target_key`: the midpoint between
/// the target and its neighbor on the far side. Returned with the bounds it
/// was computed from.
pub fn reinsert_row(rows: &[Row], direction: Direction, target_key: f64) -> (Bounds, f64) {
    let bounds = neighbor_bounds(rows, direction, target_key, 1);
    (bounds, bounds.up + (bounds.down - bounds.up) / 2.0)
}

/// New keys for an `n`-row block moved next to `target_key`, evenly spaced
/// inside the gap. The i-th key is for the i-th member in current order.
pub fn reinsert_group(
    rows: &[Row],
    direction: Direction,
    target_key: f64,
    n: usize,
) -> (Bounds, Vec<f64>) {
    let bounds = neighbor_bounds(rows, direction, target_key, n);
    let step = (bounds.down - bounds.up) / (n as f64 + 1.0);
    let keys = (1..=n).map(|i| bounds.up + step * i as f64).collect();
    (bounds, keys)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(keys: &[f64]) -> Vec<Row> {
        keys.iter()
            .enumerate()
            .map(|(i, &k)| Row::new(format!("r{}", i), "g", k))
            .collect()
    }

    #[test]
    fn test_row_up_between_neighbors() {
        let rows = rows(&[1.0, 2.0, 3.0]);
        assert_eq!(reinsert_row(&rows, Direction::Up, 3.0).1, 2.5);
    }

    #[test]
    fn test_row_up_to_top_uses_zero() {
        let rows = rows(&[1.0, 2.0, 3.0]);
        assert_eq!(reinsert_row(&rows, Direction::Up, 1.0).1, 0.5);
    }

    #[test]
    fn test_row_up_to_top_with_negative_keys() {
        let rows = rows(&[-4.0, 2.0]);
        assert_eq!(reinsert_row(&rows, Direction::Up, -4.0).1, -4.5);
    }

    #[test]
    fn test_row_down_between_neighbors() {
        let rows = rows(&[1.0, 2.0, 3.0]);
        assert_eq!(reinsert_row(&rows, Direction::Down, 1.0).1, 1.5);
    }

    #[test]
    fn test_row_down_to_bottom_adds_two() {
        let rows = rows(&[1.0, 2.0, 3.0]);
        assert_eq!(reinsert_row(&rows, Direction::Down, 3.0).1, 4.0);
    }

    #[test]
    fn test_group_up_to_top() {
        let rows = rows(&[1.0, 2.0]);
        let (_, keys) = reinsert_group(&rows, Direction::Up, 1.0, 2);
        assert_eq!(keys.len(), 2);
        assert!((keys[0] - 1.0 / 3.0).abs() < 1e-12);
        assert!((keys[1] - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_group_down_between_neighbors() {
        let rows = rows(&[1.0, 2.0, 6.0]);
        let (_, keys) = reinsert_group(&rows, Direction::Down, 2.0, 3);
        assert_eq!(keys, vec![3.0, 4.0, 5.0]);
    }

    #[test]
    fn test_group_down_to_bottom_gets_whole_steps() {
        let rows = rows(&[1.0, 2.0]);
        let (_, keys) = reinsert_group(&rows, Direction::Down, 2.0, 3);
        assert_eq!(keys, vec![3.0, 4.0, 5.0]);
    }

    #[test]
    fn test_bounds_admits() {
        let b = Bounds { up: 1.0, down: 2.0 };
        assert!(b.admits(&[1.5]));
        assert!(b.admits(&[1.25, 1.5, 1.75]));
        assert!(!b.admits(&[1.0]));
        assert!(!b.admits(&[2.0]));
        assert!(!b.admits(&[1.5, 1.5]));
    }

    #[test]
    fn test_bounds_rejects_exhausted_gap() {
        let up = 1.0_f64;
        let down = f64::from_bits(up.to_bits() + 1);
        let rows = rows(&[up, down]);
        let (bounds, key) = reinsert_row(&rows, Direction::Up, down);
        assert_eq!(bounds, Bounds { up, down });
        assert!(!bounds.admits(&[key]));
    }

    #[test]
    fn test_group_up_to_top_with_non_positive_target() {
        let rows = rows(&[0.0, 1.0]);
        let (bounds, keys) = reinsert_group(&rows, Direction::Up, 0.0, 3);
        assert_eq!(bounds, Bounds { up: -1.0, down: 0.0 });
        assert_eq!(keys, vec![-0.75, -0.5, -0.25]);
        assert!(bounds.admits(&keys));

        let negative = self::rows(&[-2.0, 5.0]);
        let (bounds, keys) = reinsert_group(&negative, Direction::Up, -2.0, 1);
        assert_eq!(bounds, Bounds { up: -3.0, down: -2.0 });
        assert_eq!(keys, vec![-2.5]);
    }

    #[test]
    fn test_returned_bounds_match_neighbors() {
        let rows = rows(&[1.0, 2.0, 6.0]);
        let (bounds, _) = reinsert_group(&rows, Direction::Down, 2.0, 3);
        assert_eq!(bounds, neighbor_bounds(&rows, Direction::Down, 2.0, 3));
        let (bounds, _) = reinsert_row(&rows, Direction::Up, 2.0);
        assert_eq!(bounds, Bounds { up: 1.0, down: 2.0 });
    }
}
