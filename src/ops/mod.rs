pub mod check;
pub mod classify;
pub mod grouping;
pub mod order_key;
pub mod reinsert;
pub mod reorder;
pub mod span;

pub use classify::MoveError;
pub use reorder::{reorder, try_reorder};
