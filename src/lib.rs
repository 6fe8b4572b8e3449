//! Order-key maintenance for grouped, drag-reorderable tables.
//!
//! Rows carry a fractional order key and a group ID. Dropping a row or a
//! whole group onto another row or group ([`reorder()`]) rewrites only the
//! keys of what moved, keeps every group contiguous, and refreshes the
//! header-row span used to merge group cells.

pub mod cli;
pub mod io;
pub mod model;
pub mod ops;
pub mod util;

pub use model::{ItemId, Row};
pub use ops::{MoveError, reorder, try_reorder};
