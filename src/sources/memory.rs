use crate::domain::model::{Batch, Row, TableSchema};
use crate::domain::ports::DataSource;
use crate::utils::error::{QueryError, Result};
use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

/// Writable in-memory source, used for fixtures and as an insert
/// target in tests and demos.
#[derive(Debug, Default)]
pub struct MemoryDataSource {
    identifier: String,
    tables: RwLock<BTreeMap<String, Batch>>,
}

impl MemoryDataSource {
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            tables: RwLock::new(BTreeMap::new()),
        }
    }

    pub async fn create_table(&self, schema: TableSchema) -> Result<()> {
        let mut tables = self.tables.write().await;
        let name = schema.name.clone();
        if tables.contains_key(&name) {
            return Err(QueryError::SchemaMismatch {
                message: format!("table '{}' already exists in '{}'", name, self.identifier),
            });
        }
        tables.insert(name, Batch::empty(schema));
        Ok(())
    }

    /// Convenience for seeding fixture data.
    pub async fn create_table_with_rows(&self, schema: TableSchema, rows: Vec<Row>) -> Result<()> {
        let name = schema.name.clone();
        self.create_table(schema).await?;
        let mut tables = self.tables.write().await;
        if let Some(batch) = tables.get_mut(&name) {
            batch.rows = rows;
        }
        Ok(())
    }
}

#[async_trait]
impl DataSource for MemoryDataSource {
    fn identifier(&self) -> &str {
        &self.identifier
    }

    async fn tables(&self) -> Result<Vec<TableSchema>> {
        let tables = self.tables.read().await;
        Ok(tables.values().map(|batch| batch.schema.clone()).collect())
    }

    async fn scan(&self, table: &str) -> Result<Batch> {
        let tables = self.tables.read().await;
        tables
            .get(table)
            .cloned()
            .ok_or_else(|| QueryError::UnknownTable {
                schema: self.identifier.clone(),
                table: table.to_string(),
            })
    }

    async fn insert(&self, table: &str, batch: Batch) -> Result<u64> {
        let mut tables = self.tables.write().await;
        let target = tables.get_mut(table).ok_or_else(|| QueryError::UnknownTable {
            schema: self.identifier.clone(),
            table: table.to_string(),
        })?;
        let width = target.schema.width();
        if batch.rows.iter().any(|row| row.len() != width) {
            return Err(QueryError::SchemaMismatch {
                message: format!(
                    "insert into '{}.{}' expects {} columns",
                    self.identifier, table, width
                ),
            });
        }
        let count = batch.rows.len() as u64;
        target.rows.extend(batch.rows);
        tracing::debug!(source = %self.identifier, table, rows = count, "inserted rows");
        Ok(count)
    }
}
