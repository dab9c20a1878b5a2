use crate::domain::model::TableSchema;
use crate::utils::error::{QueryError, Result};
use std::collections::BTreeMap;

/// Combined view of every registered source's tables, keyed by schema
/// identifier. All lookups are case-sensitive.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    sources: BTreeMap<String, BTreeMap<String, TableSchema>>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, source: &str, tables: Vec<TableSchema>) -> Result<()> {
        if self.sources.contains_key(source) {
            return Err(QueryError::DuplicateSource(source.to_string()));
        }
        let tables = tables
            .into_iter()
            .map(|schema| (schema.name.clone(), schema))
            .collect();
        self.sources.insert(source.to_string(), tables);
        Ok(())
    }

    pub fn resolve(&self, source: &str, table: &str) -> Result<&TableSchema> {
        let tables = self
            .sources
            .get(source)
            .ok_or_else(|| QueryError::UnknownSource(source.to_string()))?;
        tables.get(table).ok_or_else(|| QueryError::UnknownTable {
            schema: source.to_string(),
            table: table.to_string(),
        })
    }

    pub fn sources(&self) -> impl Iterator<Item = &str> {
        self.sources.keys().map(String::as_str)
    }

    pub fn tables(&self, source: &str) -> Result<impl Iterator<Item = &TableSchema>> {
        self.sources
            .get(source)
            .map(|tables| tables.values())
            .ok_or_else(|| QueryError::UnknownSource(source.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Column;

    fn cars() -> TableSchema {
        TableSchema::new("cars", vec![Column::text("year"), Column::text("model")])
    }

    #[test]
    fn test_register_and_resolve() {
        let mut catalog = Catalog::new();
        catalog.register("csv", vec![cars()]).unwrap();

        let schema = catalog.resolve("csv", "cars").unwrap();
        assert_eq!(schema.column_names(), vec!["year", "model"]);
    }

    #[test]
    fn test_lookups_are_case_sensitive() {
        let mut catalog = Catalog::new();
        catalog.register("csv", vec![cars()]).unwrap();

        assert!(matches!(
            catalog.resolve("CSV", "cars").unwrap_err(),
            QueryError::UnknownSource(_)
        ));
        assert!(matches!(
            catalog.resolve("csv", "Cars").unwrap_err(),
            QueryError::UnknownTable { .. }
        ));
    }

    #[test]
    fn test_duplicate_source_rejected() {
        let mut catalog = Catalog::new();
        catalog.register("csv", vec![cars()]).unwrap();
        assert!(matches!(
            catalog.register("csv", vec![]).unwrap_err(),
            QueryError::DuplicateSource(_)
        ));
    }
}
