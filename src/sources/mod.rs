pub mod csv;
pub mod memory;
pub mod sql;

pub use self::csv::CsvDataSource;
pub use self::memory::MemoryDataSource;
pub use self::sql::{Driver, SqlDataSource};
