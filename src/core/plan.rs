use crate::core::catalog::Catalog;
use crate::core::expr::Expr;
use crate::domain::model::{Row, TableSchema};
use crate::utils::error::{QueryError, Result};

/// A relational plan, executed bottom-up by the manager.
#[derive(Debug, Clone, PartialEq)]
pub enum Plan {
    Scan {
        source: String,
        table: String,
    },
    Filter {
        input: Box<Plan>,
        predicate: Expr,
    },
    Project {
        input: Box<Plan>,
        columns: Vec<String>,
    },
    Limit {
        input: Box<Plan>,
        fetch: usize,
    },
    Values {
        schema: TableSchema,
        rows: Vec<Row>,
    },
    Insert {
        source: String,
        table: String,
        input: Box<Plan>,
    },
}

/// Stack-based plan builder bound to a catalog snapshot, so unknown
/// tables and columns fail at build time rather than mid-execution.
///
/// Obtained from [`QueryManager::plan_builder`].
///
/// [`QueryManager::plan_builder`]: crate::core::manager::QueryManager::plan_builder
#[derive(Debug, Clone)]
pub struct PlanBuilder {
    catalog: Catalog,
    stack: Vec<(Plan, TableSchema)>,
}

impl PlanBuilder {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            stack: Vec::new(),
        }
    }

    fn top(&self) -> Result<&(Plan, TableSchema)> {
        self.stack.last().ok_or_else(|| QueryError::InvalidPlan {
            message: "no input on the builder stack; call scan() or values() first".to_string(),
        })
    }

    fn pop(&mut self) -> Result<(Plan, TableSchema)> {
        self.stack.pop().ok_or_else(|| QueryError::InvalidPlan {
            message: "no input on the builder stack; call scan() or values() first".to_string(),
        })
    }

    pub fn scan(mut self, source: &str, table: &str) -> Result<Self> {
        let schema = self.catalog.resolve(source, table)?.clone();
        self.stack.push((
            Plan::Scan {
                source: source.to_string(),
                table: table.to_string(),
            },
            schema,
        ));
        Ok(self)
    }

    pub fn values(mut self, schema: TableSchema, rows: Vec<Row>) -> Result<Self> {
        let width = schema.width();
        if let Some(bad) = rows.iter().find(|row| row.len() != width) {
            return Err(QueryError::SchemaMismatch {
                message: format!(
                    "values row has {} fields, schema has {}",
                    bad.len(),
                    width
                ),
            });
        }
        self.stack.push((
            Plan::Values {
                schema: schema.clone(),
                rows,
            },
            schema,
        ));
        Ok(self)
    }

    pub fn filter(mut self, predicate: Expr) -> Result<Self> {
        let (input, schema) = self.pop()?;
        let mut referenced = Vec::new();
        predicate.referenced_columns(&mut referenced);
        for name in &referenced {
            if schema.column_index(name).is_none() {
                return Err(QueryError::UnknownColumn((*name).to_string()));
            }
        }
        self.stack.push((
            Plan::Filter {
                input: Box::new(input),
                predicate,
            },
            schema,
        ));
        Ok(self)
    }

    pub fn project<I, S>(mut self, columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        let (input, schema) = self.pop()?;
        let projected = columns
            .iter()
            .map(|name| {
                schema
                    .column_index(name)
                    .map(|index| schema.columns[index].clone())
                    .ok_or_else(|| QueryError::UnknownColumn(name.clone()))
            })
            .collect::<Result<Vec<_>>>()?;
        let new_schema = TableSchema::new(schema.name, projected);
        self.stack.push((
            Plan::Project {
                input: Box::new(input),
                columns,
            },
            new_schema,
        ));
        Ok(self)
    }

    pub fn limit(mut self, fetch: usize) -> Result<Self> {
        let (input, schema) = self.pop()?;
        self.stack.push((
            Plan::Limit {
                input: Box::new(input),
                fetch,
            },
            schema,
        ));
        Ok(self)
    }

    /// Terminal step: wrap the current plan as the input of an insert
    /// into `source.table`. Input columns map onto the target
    /// positionally, so only the column count is checked here.
    pub fn insert_into(mut self, source: &str, table: &str) -> Result<Plan> {
        let target = self.catalog.resolve(source, table)?.clone();
        let (input, input_schema) = self.pop()?;
        if !self.stack.is_empty() {
            return Err(QueryError::InvalidPlan {
                message: format!(
                    "{} unconsumed input(s) left on the builder stack",
                    self.stack.len()
                ),
            });
        }
        if input_schema.width() != target.width() {
            return Err(QueryError::SchemaMismatch {
                message: format!(
                    "insert input has {} columns, target {}.{} has {}",
                    input_schema.width(),
                    source,
                    table,
                    target.width()
                ),
            });
        }
        Ok(Plan::Insert {
            source: source.to_string(),
            table: table.to_string(),
            input: Box::new(input),
        })
    }

    pub fn build(mut self) -> Result<Plan> {
        let (plan, _) = self.pop()?;
        if !self.stack.is_empty() {
            return Err(QueryError::InvalidPlan {
                message: format!("{} unconsumed input(s) left on the builder stack", self.stack.len()),
            });
        }
        Ok(plan)
    }

    /// Schema of the plan currently on top of the stack.
    pub fn peek_schema(&self) -> Result<&TableSchema> {
        self.top().map(|(_, schema)| schema)
    }
}
