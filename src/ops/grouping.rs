use indexmap::IndexMap;

use crate::model::row::{Row, sort_by_order};

/// A group of rows, derived from the flat row list.
///
/// Members are always sorted ascending by order key, so the first member is
/// the group's header.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub id: String,
    pub members: Vec<Row>,
}

impl Group {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// The header row (smallest order key)
    pub fn header(&self) -> Option<&Row> {
        self.members.first()
    }

    pub fn first_key(&self) -> Option<f64> {
        self.members.first().map(|r| r.order)
    }

    pub fn last_key(&self) -> Option<f64> {
        self.members.last().map(|r| r.order)
    }
}

/// How `flatten` treats order keys
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Renumber {
    /// Leave every key as it is
    Keep,
    /// Rewrite keys to `step, 2*step, ...` in output order
    Sequential { step: f64 },
}

/// Split rows into groups.
///
/// Groups come back ordered by their header's key, members ascending by key.
pub fn partition(rows: &[Row]) -> Vec<Group> {
    let mut sorted = rows.to_vec();
    sort_by_order(&mut sorted);

    // Rows are visited in key order, so first-seen order is header order.
    let mut groups: IndexMap<String, Vec<Row>> = IndexMap::new();
    for row in sorted {
        groups.entry(row.group.clone()).or_default().push(row);
    }

    groups
        .into_iter()
        .map(|(id, members)| Group { id, members })
        .collect()
}

/// Concatenate groups back into a flat row list, in list order.
pub fn flatten(groups: Vec<Group>, renumber: Renumber) -> Vec<Row> {
    let mut rows: Vec<Row> = groups.into_iter().flat_map(|g| g.members).collect();
    if let Renumber::Sequential { step } = renumber {
        for (i, row) in rows.iter_mut().enumerate() {
            row.order = (i + 1) as f64 * step;
        }
    }
    rows
}

/// Find one group by ID. `None` if no row carries that group.
pub fn find_group(rows: &[Row], group_id: &str) -> Option<Group> {
    let mut members: Vec<Row> = rows.iter().filter(|r| r.group == group_id).cloned().collect();
    if members.is_empty() {
        return None;
    }
    sort_by_order(&mut members);
    Some(Group {
        id: group_id.to_string(),
        members,
    })
}
