use crate::core::catalog::Catalog;
use crate::core::executor::Executor;
use crate::core::plan::{Plan, PlanBuilder};
use crate::domain::model::Batch;
use crate::domain::ports::DataSource;
use crate::utils::error::{QueryError, Result};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tokio::sync::OnceCell;

/// The federation entry point: owns the registered sources and runs
/// plans across them.
///
/// The combined catalog is assembled lazily on first use — sources
/// are not contacted until a plan needs their schemas — and cached
/// for the manager's lifetime.
pub struct QueryManager {
    sources: HashMap<String, Arc<dyn DataSource>>,
    catalog: OnceCell<Catalog>,
}

// Sources are trait objects; show their identifiers only.
impl fmt::Debug for QueryManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut identifiers: Vec<&str> = self.sources.keys().map(String::as_str).collect();
        identifiers.sort_unstable();
        f.debug_struct("QueryManager")
            .field("sources", &identifiers)
            .finish_non_exhaustive()
    }
}

#[derive(Default)]
pub struct QueryManagerBuilder {
    sources: Vec<Arc<dyn DataSource>>,
}

impl QueryManagerBuilder {
    pub fn data_source(mut self, source: Arc<dyn DataSource>) -> Self {
        self.sources.push(source);
        self
    }

    pub fn build(self) -> Result<QueryManager> {
        let mut sources = HashMap::with_capacity(self.sources.len());
        for source in self.sources {
            let identifier = source.identifier().to_string();
            if sources.insert(identifier.clone(), source).is_some() {
                return Err(QueryError::DuplicateSource(identifier));
            }
        }
        Ok(QueryManager {
            sources,
            catalog: OnceCell::new(),
        })
    }
}

impl QueryManager {
    pub fn builder() -> QueryManagerBuilder {
        QueryManagerBuilder::default()
    }

    pub async fn catalog(&self) -> Result<&Catalog> {
        self.catalog
            .get_or_try_init(|| async {
                let mut catalog = Catalog::new();
                // Deterministic assembly order keeps error messages stable.
                let mut identifiers: Vec<&String> = self.sources.keys().collect();
                identifiers.sort();
                for identifier in identifiers {
                    let source = &self.sources[identifier];
                    let tables = source.tables().await?;
                    tracing::debug!(source = %identifier, tables = tables.len(), "registered schema");
                    catalog.register(identifier, tables)?;
                }
                Ok::<_, QueryError>(catalog)
            })
            .await
    }

    /// A plan builder bound to a snapshot of the current catalog.
    pub async fn plan_builder(&self) -> Result<PlanBuilder> {
        Ok(PlanBuilder::new(self.catalog().await?.clone()))
    }

    /// Run a read plan and collect its result batch.
    pub async fn query(&self, plan: &Plan) -> Result<Batch> {
        let catalog = self.catalog().await?;
        Executor::new(&self.sources, catalog).execute(plan).await
    }

    /// Run an insert plan, returning the affected-row count.
    pub async fn update(&self, plan: &Plan) -> Result<u64> {
        let catalog = self.catalog().await?;
        Executor::new(&self.sources, catalog)
            .execute_update(plan)
            .await
    }
}
