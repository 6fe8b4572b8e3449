use std::cmp::Ordering;

use crate::model::item::ItemId;
use crate::model::row::Row;
use crate::ops::grouping::find_group;
use crate::ops::reinsert::Direction;

/// Why a move did not change anything
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MoveError {
    #[error("no change: {0}")]
    NoOp(String),
    #[error("row not found: {0}")]
    UnknownRow(String),
    #[error("group not found: {0}")]
    UnknownGroup(String),
    #[error("order keys between {up} and {down} are too close to split; renormalize the table")]
    PrecisionExhausted { up: f64, down: f64 },
}

/// A resolved move, ready for reinsertion
#[derive(Debug, Clone, PartialEq)]
pub struct MovePlan {
    /// What is being moved
    pub active: ItemId,
    pub direction: Direction,
    /// Key of the moved row, or of the moved group's first member
    pub active_key: f64,
    /// Key the moved item is placed next to: the target's first member when
    /// moving up, its last member when moving down
    pub boundary: f64,
    /// Group the moved rows belong to afterwards
    pub target_group: String,
}

/// The key range covered by a row or a group
#[derive(Debug, Clone, PartialEq)]
struct Extent {
    group: String,
    first: f64,
    last: f64,
}

/// Work out direction and boundary for dropping `active` onto `over`.
///
/// A group is never dropped into the middle of another group: when the active
/// item is a group and the target is a row, the target widens to that row's
/// whole group. A row takes on the group of whatever it is dropped onto.
pub fn classify(rows: &[Row], active: &ItemId, over: &ItemId) -> Result<MovePlan, MoveError> {
    if active == over {
        return Err(MoveError::NoOp(format!("{} dropped onto itself", active)));
    }

    let from = resolve(rows, active)?;
    let to = match (active, over) {
        (ItemId::Group(_), ItemId::Row(_)) => {
            let group = resolve(rows, over)?.group;
            resolve(rows, &ItemId::Group(group))?
        }
        _ => resolve(rows, over)?,
    };

    match (active, over) {
        (ItemId::Group(g), _) if to.group == *g => {
            return Err(MoveError::NoOp(format!("group {} dropped onto itself", g)));
        }
        (ItemId::Row(id), ItemId::Group(g)) if from.group == *g => {
            return Err(MoveError::NoOp(format!("row {} dropped onto its own group", id)));
        }
        _ => {}
    }

    let direction = match from.first.total_cmp(&to.first) {
        Ordering::Greater => Direction::Up,
        Ordering::Less => Direction::Down,
        Ordering::Equal => {
            return Err(MoveError::NoOp(format!("{} is already at {}", active, over)));
        }
    };

    let boundary = match direction {
        Direction::Up => to.first,
        Direction::Down => to.last,
    };

    Ok(MovePlan {
        active: active.clone(),
        direction,
        active_key: from.first,
        boundary,
        target_group: to.group,
    })
}

fn resolve(rows: &[Row], item: &ItemId) -> Result<Extent, MoveError> {
    match item {
        ItemId::Row(id) => rows
            .iter()
            .find(|r| r.id == *id)
            .map(|r| Extent {
                group: r.group.clone(),
                first: r.order,
                last: r.order,
            })
            .ok_or_else(|| MoveError::UnknownRow(id.clone())),
        ItemId::Group(id) => {
            let group = find_group(rows, id).ok_or_else(|| MoveError::UnknownGroup(id.clone()))?;
            match (group.first_key(), group.last_key()) {
                (Some(first), Some(last)) => Ok(Extent {
                    group: group.id,
                    first,
                    last,
                }),
                _ => Err(MoveError::UnknownGroup(id.clone())),
            }
        }
    }
}
