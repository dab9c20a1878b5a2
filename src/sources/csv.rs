use crate::domain::model::{Batch, Column, ColumnType, Row, TableSchema, Value};
use crate::domain::ports::DataSource;
use crate::utils::error::{QueryError, Result};
use async_trait::async_trait;
use std::fs;
use std::path::{Path, PathBuf};

/// Read-only source mapping a directory of CSV files to a schema.
///
/// Every `*.csv` file becomes a table named after the file stem. The
/// first record is the header; a header cell may carry a type
/// annotation (`price:float`, `year:int`, `active:bool`), and
/// unannotated columns are text.
#[derive(Debug, Clone)]
pub struct CsvDataSource {
    identifier: String,
    directory: PathBuf,
}

impl CsvDataSource {
    pub fn new(identifier: impl Into<String>, directory: impl Into<PathBuf>) -> Self {
        Self {
            identifier: identifier.into(),
            directory: directory.into(),
        }
    }

    fn table_path(&self, table: &str) -> PathBuf {
        self.directory.join(format!("{}.csv", table))
    }

    fn read_schema(&self, table: &str, path: &Path) -> Result<TableSchema> {
        let mut reader = csv::Reader::from_path(path)?;
        let headers = reader.headers()?;
        let columns = headers.iter().map(parse_header_cell).collect();
        Ok(TableSchema::new(table, columns))
    }
}

/// `name:type` header cells declare the column type; plain cells are text.
fn parse_header_cell(cell: &str) -> Column {
    if let Some((name, annotation)) = cell.rsplit_once(':') {
        if let Some(ty) = ColumnType::from_annotation(annotation.trim()) {
            return Column::new(name.trim(), ty);
        }
    }
    Column::text(cell.trim())
}

#[async_trait]
impl DataSource for CsvDataSource {
    fn identifier(&self) -> &str {
        &self.identifier
    }

    async fn tables(&self) -> Result<Vec<TableSchema>> {
        let mut schemas = Vec::new();
        for entry in fs::read_dir(&self.directory)? {
            let path = entry?.path();
            let is_csv = path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
            if !is_csv {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            schemas.push(self.read_schema(stem, &path)?);
        }
        // Directory iteration order is platform-dependent; keep the
        // catalog stable.
        schemas.sort_by(|a, b| a.name.cmp(&b.name));
        tracing::debug!(
            source = %self.identifier,
            tables = schemas.len(),
            "discovered CSV tables"
        );
        Ok(schemas)
    }

    async fn scan(&self, table: &str) -> Result<Batch> {
        let path = self.table_path(table);
        if !path.is_file() {
            return Err(QueryError::UnknownTable {
                schema: self.identifier.clone(),
                table: table.to_string(),
            });
        }
        let schema = self.read_schema(table, &path)?;
        let mut reader = csv::Reader::from_path(&path)?;
        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            let row: Row = schema
                .columns
                .iter()
                .zip(record.iter())
                .map(|(column, raw)| Value::parse_typed(raw, column.ty))
                .collect();
            if row.len() != schema.width() {
                return Err(QueryError::SchemaMismatch {
                    message: format!(
                        "row in {}.csv has {} fields, header has {}",
                        table,
                        record.len(),
                        schema.width()
                    ),
                });
            }
            rows.push(row);
        }
        tracing::debug!(source = %self.identifier, table, rows = rows.len(), "scanned CSV table");
        Ok(Batch::new(schema, rows))
    }

    async fn insert(&self, _table: &str, _batch: Batch) -> Result<u64> {
        Err(QueryError::Unsupported {
            schema: self.identifier.clone(),
            operation: "insert",
        })
    }
}
