use thiserror::Error;

#[derive(Error, Debug)]
pub enum QueryError {
    #[error("CSV processing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("unknown source: {0}")]
    UnknownSource(String),

    #[error("unknown table: {schema}.{table}")]
    UnknownTable { schema: String, table: String },

    #[error("unknown column: {0}")]
    UnknownColumn(String),

    #[error("duplicate source identifier: {0}")]
    DuplicateSource(String),

    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),

    #[error("schema mismatch: {message}")]
    SchemaMismatch { message: String },

    #[error("source '{schema}' does not support {operation}")]
    Unsupported {
        schema: String,
        operation: &'static str,
    },

    #[error("invalid plan: {message}")]
    InvalidPlan { message: String },

    #[error("configuration error in '{field}': {message}")]
    Config { field: String, message: String },
}

impl QueryError {
    /// Short hint shown to CLI users alongside the error itself.
    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::Csv(_) => "Check that the CSV files are well-formed and share a header row",
            Self::Database(_) => "Check that the database is reachable and the credentials are valid",
            Self::Io(_) => "Check file paths and permissions",
            Self::Serialization(_) => "Check that the data serializes to the expected shape",
            Self::UnknownSource(_) | Self::UnknownTable { .. } => {
                "List the catalog to see which sources and tables are registered"
            }
            Self::UnknownColumn(_) => "Check the column name against the table schema",
            Self::DuplicateSource(_) => "Give every source a unique identifier",
            Self::InvalidIdentifier(_) => {
                "Identifiers may only contain letters, digits and underscores"
            }
            Self::SchemaMismatch { .. } => "Make the input column count match the target table",
            Self::Unsupported { .. } => "Use a writable source (sql or memory) as the target",
            Self::InvalidPlan { .. } => "Rebuild the plan; see the message for the offending step",
            Self::Config { .. } => "Fix the configuration file and retry",
        }
    }
}

pub type Result<T> = std::result::Result<T, QueryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_errors_are_plain_data() {
        // The schema identifier is message data, not a wrapped cause.
        let err = QueryError::UnknownTable {
            schema: "csv".to_string(),
            table: "cars".to_string(),
        };
        assert_eq!(err.to_string(), "unknown table: csv.cars");
        assert!(std::error::Error::source(&err).is_none());

        let err = QueryError::Unsupported {
            schema: "csv".to_string(),
            operation: "insert",
        };
        assert_eq!(err.to_string(), "source 'csv' does not support insert");
        assert!(std::error::Error::source(&err).is_none());
    }

    #[test]
    fn test_wrapped_errors_keep_their_cause() {
        let err = QueryError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "missing file",
        ));
        assert!(std::error::Error::source(&err).is_some());
    }
}
