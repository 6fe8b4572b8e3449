pub mod lock;
pub mod table_io;
