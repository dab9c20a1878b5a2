use crate::core::catalog::Catalog;
use crate::core::plan::Plan;
use crate::domain::model::{Batch, TableSchema, Value};
use crate::domain::ports::DataSource;
use crate::utils::error::{QueryError, Result};
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Walks a plan bottom-up, pulling batches out of the sources.
pub(crate) struct Executor<'a> {
    sources: &'a HashMap<String, Arc<dyn DataSource>>,
    catalog: &'a Catalog,
}

impl<'a> Executor<'a> {
    pub(crate) fn new(
        sources: &'a HashMap<String, Arc<dyn DataSource>>,
        catalog: &'a Catalog,
    ) -> Self {
        Self { sources, catalog }
    }

    fn source(&self, name: &str) -> Result<&Arc<dyn DataSource>> {
        self.sources
            .get(name)
            .ok_or_else(|| QueryError::UnknownSource(name.to_string()))
    }

    // Plans recurse, so the future is boxed by hand.
    pub(crate) fn execute<'p>(
        &'p self,
        plan: &'p Plan,
    ) -> Pin<Box<dyn Future<Output = Result<Batch>> + Send + 'p>> {
        Box::pin(async move {
            match plan {
                Plan::Scan { source, table } => self.source(source)?.scan(table).await,
                Plan::Filter { input, predicate } => {
                    let batch = self.execute(input).await?;
                    let mut rows = Vec::with_capacity(batch.rows.len());
                    for row in batch.rows {
                        if predicate.eval(&batch.schema, &row)? == Value::Bool(true) {
                            rows.push(row);
                        }
                    }
                    Ok(Batch::new(batch.schema, rows))
                }
                Plan::Project { input, columns } => {
                    let batch = self.execute(input).await?;
                    let indices = columns
                        .iter()
                        .map(|name| {
                            batch
                                .schema
                                .column_index(name)
                                .ok_or_else(|| QueryError::UnknownColumn(name.clone()))
                        })
                        .collect::<Result<Vec<_>>>()?;
                    let schema = TableSchema::new(
                        batch.schema.name.clone(),
                        indices
                            .iter()
                            .map(|&index| batch.schema.columns[index].clone())
                            .collect(),
                    );
                    let rows = batch
                        .rows
                        .into_iter()
                        .map(|row| indices.iter().map(|&index| row[index].clone()).collect())
                        .collect();
                    Ok(Batch::new(schema, rows))
                }
                Plan::Limit { input, fetch } => {
                    let mut batch = self.execute(input).await?;
                    batch.rows.truncate(*fetch);
                    Ok(batch)
                }
                Plan::Values { schema, rows } => {
                    // Plans can be hand-built, so the builder's width
                    // check is repeated here before rows flow upstream.
                    let width = schema.width();
                    if let Some(row) = rows.iter().find(|row| row.len() != width) {
                        return Err(QueryError::SchemaMismatch {
                            message: format!(
                                "values row has {} fields, schema has {}",
                                row.len(),
                                width
                            ),
                        });
                    }
                    Ok(Batch::new(schema.clone(), rows.clone()))
                }
                Plan::Insert { .. } => Err(QueryError::InvalidPlan {
                    message: "insert plans run through update(), not query()".to_string(),
                }),
            }
        })
    }

    pub(crate) async fn execute_update(&self, plan: &Plan) -> Result<u64> {
        let Plan::Insert {
            source,
            table,
            input,
        } = plan
        else {
            return Err(QueryError::InvalidPlan {
                message: "update() expects an insert plan".to_string(),
            });
        };
        let target = self.catalog.resolve(source, table)?;
        let batch = self.execute(input).await?;
        if batch.schema.width() != target.width() {
            return Err(QueryError::SchemaMismatch {
                message: format!(
                    "insert input has {} columns, target {}.{} has {}",
                    batch.schema.width(),
                    source,
                    table,
                    target.width()
                ),
            });
        }
        let affected = self.source(source)?.insert(table, batch).await?;
        tracing::info!(source = %source, table = %table, rows = affected, "insert completed");
        Ok(affected)
    }
}
