pub mod config;
pub mod item;
pub mod row;
pub mod table;

pub use config::*;
pub use item::*;
pub use row::*;
pub use table::*;
