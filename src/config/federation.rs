use crate::core::manager::QueryManager;
use crate::domain::ports::DataSource;
use crate::sources::csv::CsvDataSource;
use crate::sources::memory::MemoryDataSource;
use crate::sources::sql::{Driver, SqlDataSource};
use crate::utils::error::{QueryError, Result};
use crate::utils::validation::{validate_identifier, validate_path, Validate};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Declarative federation setup: a list of sources, each tagged with
/// its kind, mirroring the programmatic builder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FederationConfig {
    pub federation: FederationInfo,
    #[serde(default, rename = "source")]
    pub sources: Vec<SourceConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FederationInfo {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SourceConfig {
    Csv {
        identifier: String,
        directory: PathBuf,
    },
    Sql {
        identifier: String,
        driver: Driver,
        database: String,
        host: Option<String>,
        port: Option<u16>,
        username: Option<String>,
        password: Option<String>,
    },
    Memory {
        identifier: String,
    },
}

impl SourceConfig {
    pub fn identifier(&self) -> &str {
        match self {
            Self::Csv { identifier, .. }
            | Self::Sql { identifier, .. }
            | Self::Memory { identifier } => identifier,
        }
    }
}

impl FederationConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = substitute_env_vars(content);
        toml::from_str(&processed).map_err(|e| QueryError::Config {
            field: "toml".to_string(),
            message: e.to_string(),
        })
    }

    /// Instantiate the configured sources.
    pub fn build_sources(&self) -> Result<Vec<Arc<dyn DataSource>>> {
        self.validate()?;
        let mut sources: Vec<Arc<dyn DataSource>> = Vec::with_capacity(self.sources.len());
        for source in &self.sources {
            match source {
                SourceConfig::Csv {
                    identifier,
                    directory,
                } => {
                    sources.push(Arc::new(CsvDataSource::new(identifier.clone(), directory)));
                }
                SourceConfig::Sql {
                    identifier,
                    driver,
                    database,
                    host,
                    port,
                    username,
                    password,
                } => {
                    let mut builder = SqlDataSource::builder()
                        .identifier(identifier.clone())
                        .driver(*driver)
                        .database(database.clone());
                    if let Some(host) = host {
                        builder = builder.host(host.clone());
                    }
                    if let Some(port) = port {
                        builder = builder.port(*port);
                    }
                    if let Some(username) = username {
                        builder = builder.username(username.clone());
                    }
                    if let Some(password) = password {
                        builder = builder.password(password.clone());
                    }
                    sources.push(Arc::new(builder.build()?));
                }
                SourceConfig::Memory { identifier } => {
                    sources.push(Arc::new(MemoryDataSource::new(identifier.clone())));
                }
            }
        }
        Ok(sources)
    }

    /// Build a ready-to-use manager from the configured sources.
    pub fn manager(&self) -> Result<QueryManager> {
        let mut builder = QueryManager::builder();
        for source in self.build_sources()? {
            builder = builder.data_source(source);
        }
        builder.build()
    }
}

/// Replace `${VAR_NAME}` references with environment values before
/// parsing, so credentials stay out of the file. Unset variables are
/// left as-is and surface later as connection errors.
fn substitute_env_vars(content: &str) -> String {
    let re = regex::Regex::new(r"\$\{([^}]+)\}").expect("static pattern");
    re.replace_all(content, |caps: &regex::Captures| {
        let var_name = &caps[1];
        std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
    })
    .to_string()
}

impl Validate for FederationConfig {
    fn validate(&self) -> Result<()> {
        if self.sources.is_empty() {
            return Err(QueryError::Config {
                field: "source".to_string(),
                message: "at least one source must be configured".to_string(),
            });
        }
        let mut seen = HashSet::new();
        for source in &self.sources {
            let identifier = source.identifier();
            validate_identifier(identifier)?;
            if !seen.insert(identifier) {
                return Err(QueryError::DuplicateSource(identifier.to_string()));
            }
            match source {
                SourceConfig::Csv { directory, .. } => {
                    validate_path("directory", &directory.to_string_lossy())?;
                }
                SourceConfig::Sql {
                    driver,
                    host,
                    database,
                    ..
                } => {
                    if database.is_empty() {
                        return Err(QueryError::Config {
                            field: "database".to_string(),
                            message: "database cannot be empty".to_string(),
                        });
                    }
                    if matches!(driver, Driver::MySql | Driver::Postgres) && host.is_none() {
                        return Err(QueryError::Config {
                            field: "host".to_string(),
                            message: format!("{:?} sources require a host", driver),
                        });
                    }
                }
                SourceConfig::Memory { .. } => {}
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mixed_sources() {
        let toml_content = r#"
[federation]
name = "inventory"
description = "CSV files joined with the orders database"

[[source]]
type = "csv"
identifier = "files"
directory = "./data"

[[source]]
type = "sql"
identifier = "orders"
driver = "postgres"
host = "localhost"
database = "orders"
username = "svc"
password = "secret"

[[source]]
type = "memory"
identifier = "scratch"
"#;

        let config = FederationConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.federation.name, "inventory");
        assert_eq!(config.sources.len(), 3);
        assert_eq!(config.sources[0].identifier(), "files");
        assert!(config.validate().is_ok());

        let sources = config.build_sources().unwrap();
        assert_eq!(sources.len(), 3);
        assert_eq!(sources[1].identifier(), "orders");
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("QUARRY_TEST_DB_PASSWORD", "s3cret");

        let toml_content = r#"
[federation]
name = "test"

[[source]]
type = "sql"
identifier = "db"
driver = "mysql"
host = "localhost"
database = "app"
username = "root"
password = "${QUARRY_TEST_DB_PASSWORD}"
"#;

        let config = FederationConfig::from_toml_str(toml_content).unwrap();
        let SourceConfig::Sql { password, .. } = &config.sources[0] else {
            panic!("expected sql source");
        };
        assert_eq!(password.as_deref(), Some("s3cret"));

        std::env::remove_var("QUARRY_TEST_DB_PASSWORD");
    }

    #[test]
    fn test_duplicate_identifiers_rejected() {
        let toml_content = r#"
[federation]
name = "test"

[[source]]
type = "memory"
identifier = "a"

[[source]]
type = "memory"
identifier = "a"
"#;

        let config = FederationConfig::from_toml_str(toml_content).unwrap();
        assert!(matches!(
            config.validate().unwrap_err(),
            QueryError::DuplicateSource(_)
        ));
    }

    #[test]
    fn test_sql_source_requires_host() {
        let toml_content = r#"
[federation]
name = "test"

[[source]]
type = "sql"
identifier = "db"
driver = "postgres"
database = "app"
"#;

        let config = FederationConfig::from_toml_str(toml_content).unwrap();
        assert!(matches!(
            config.validate().unwrap_err(),
            QueryError::Config { .. }
        ));
    }

    #[test]
    fn test_empty_source_list_rejected() {
        let toml_content = r#"
[federation]
name = "test"
"#;
        let config = FederationConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());
    }
}
