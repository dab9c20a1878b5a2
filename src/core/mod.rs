pub mod catalog;
pub mod executor;
pub mod expr;
pub mod manager;
pub mod plan;

pub use crate::domain::model::{Batch, Column, ColumnType, Row, TableSchema, Value};
pub use crate::domain::ports::DataSource;
pub use crate::utils::error::Result;
pub use self::catalog::Catalog;
pub use self::expr::{BinaryOp, Expr};
pub use self::manager::QueryManager;
pub use self::plan::{Plan, PlanBuilder};
