use crate::domain::model::{Batch, TableSchema};
use crate::utils::error::Result;
use async_trait::async_trait;

/// A named data source registered with the federation manager.
///
/// Each source exposes its tables under the schema identifier it was
/// registered with; plans refer to tables as `identifier.table`.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Schema identifier this source is registered under.
    fn identifier(&self) -> &str;

    /// Schemas of every table the source exposes.
    async fn tables(&self) -> Result<Vec<TableSchema>>;

    /// Full scan of one table.
    async fn scan(&self, table: &str) -> Result<Batch>;

    /// Append rows to a table, returning the affected-row count.
    /// Read-only sources return [`QueryError::Unsupported`].
    ///
    /// [`QueryError::Unsupported`]: crate::utils::error::QueryError::Unsupported
    async fn insert(&self, table: &str, batch: Batch) -> Result<u64>;
}
