pub mod config;
pub mod core;
pub mod domain;
pub mod sources;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::cli::CliConfig;
pub use crate::config::{FederationConfig, SourceConfig};

pub use crate::core::{Catalog, Expr, Plan, PlanBuilder, QueryManager};
pub use crate::domain::model::{Batch, Column, ColumnType, Row, TableSchema, Value};
pub use crate::domain::ports::DataSource;
pub use crate::sources::{CsvDataSource, Driver, MemoryDataSource, SqlDataSource};
pub use crate::utils::error::{QueryError, Result};
