use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::model::config::OrderConfig;
use crate::model::row::{Row, sort_by_order};
use crate::ops::grouping::partition;

/// Structured result from `gt check`, suitable for --json output.
#[derive(Debug, Default, Serialize)]
pub struct CheckResult {
    pub valid: bool,
    pub errors: Vec<CheckError>,
    pub warnings: Vec<CheckWarning>,
}

/// A broken invariant. Moves on a table with errors may misbehave.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum CheckError {
    /// Two or more rows share an order key
    #[serde(rename = "duplicate_key")]
    DuplicateKey { order: f64, row_ids: Vec<String> },
    /// Order key is NaN or infinite
    #[serde(rename = "non_finite_key")]
    NonFiniteKey { row_id: String },
    /// Two rows share an ID
    #[serde(rename = "duplicate_row_id")]
    DuplicateRowId { row_id: String },
    /// A group's rows are split by another group's rows
    #[serde(rename = "interleaved_group")]
    InterleavedGroup { group: String, split_by: String },
}

/// Something worth fixing that does not break moves.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum CheckWarning {
    /// Adjacent keys are closer than `order.min_gap`
    #[serde(rename = "tight_gap")]
    TightGap { before: String, after: String, gap: f64 },
    /// Stored span disagrees with the group's actual size
    #[serde(rename = "stale_span")]
    StaleSpan {
        row_id: String,
        expected: Option<usize>,
        found: Option<usize>,
    },
    /// Row has an empty group ID
    #[serde(rename = "empty_group")]
    EmptyGroup { row_id: String },
}

/// Validate a row list and return structured results.
///
/// Read-only. Checks performed:
/// 1. Order keys are finite and unique
/// 2. Row IDs are unique
/// 3. Every group occupies one contiguous run of keys
/// 4. Warnings for tight gaps, stale spans, empty group IDs
pub fn check_rows(rows: &[Row], config: &OrderConfig) -> CheckResult {
    let mut result = CheckResult::default();
    let mut sorted = rows.to_vec();
    sort_by_order(&mut sorted);

    check_keys(&sorted, config, &mut result);
    check_ids(&sorted, &mut result);
    check_contiguity(&sorted, &mut result);
    check_spans(&sorted, &mut result);

    for row in &sorted {
        if row.group.is_empty() {
            result.warnings.push(CheckWarning::EmptyGroup {
                row_id: row.id.clone(),
            });
        }
    }

    result.valid = result.errors.is_empty();
    result
}

fn check_keys(sorted: &[Row], config: &OrderConfig, result: &mut CheckResult) {
    for row in sorted {
        if !row.order.is_finite() {
            result.errors.push(CheckError::NonFiniteKey {
                row_id: row.id.clone(),
            });
        }
    }

    // Sorted, so equal keys are adjacent
    let mut i = 0;
    while i < sorted.len() {
        let mut j = i + 1;
        while j < sorted.len() && sorted[j].order == sorted[i].order {
            j += 1;
        }
        if j - i > 1 {
            result.errors.push(CheckError::DuplicateKey {
                order: sorted[i].order,
                row_ids: sorted[i..j].iter().map(|r| r.id.clone()).collect(),
            });
        }
        i = j;
    }

    for pair in sorted.windows(2) {
        let gap = pair[1].order - pair[0].order;
        if gap > 0.0 && gap < config.min_gap {
            result.warnings.push(CheckWarning::TightGap {
                before: pair[0].id.clone(),
                after: pair[1].id.clone(),
                gap,
            });
        }
    }
}

fn check_ids(sorted: &[Row], result: &mut CheckResult) {
    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    for row in sorted {
        if !seen.insert(row.id.as_str()) && reported.insert(row.id.as_str()) {
            result.errors.push(CheckError::DuplicateRowId {
                row_id: row.id.clone(),
            });
        }
    }
}

fn check_contiguity(sorted: &[Row], result: &mut CheckResult) {
    let mut closed: HashSet<&str> = HashSet::new();
    let mut reported: HashSet<&str> = HashSet::new();
    let mut current: Option<&str> = None;

    for row in sorted {
        let group = row.group.as_str();
        if current == Some(group) {
            continue;
        }
        if let Some(prev) = current {
            closed.insert(prev);
        }
        if closed.contains(group) && reported.insert(group) {
            result.errors.push(CheckError::InterleavedGroup {
                group: group.to_string(),
                split_by: current.unwrap_or_default().to_string(),
            });
        }
        current = Some(group);
    }
}

fn check_spans(sorted: &[Row], result: &mut CheckResult) {
    let expected: HashMap<String, usize> = partition(sorted)
        .into_iter()
        .filter_map(|g| g.header().map(|h| (h.id.clone(), g.len())))
        .collect();

    for row in sorted {
        let want = expected.get(&row.id).copied();
        if row.span != want {
            result.warnings.push(CheckWarning::StaleSpan {
                row_id: row.id.clone(),
                expected: want,
                found: row.span,
            });
        }
    }
}
