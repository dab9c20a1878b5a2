use crate::core::expr::Expr;
use crate::domain::model::Value;
use crate::utils::error::{QueryError, Result};
use clap::Parser;
use std::path::PathBuf;

/// Scan a table from a configured federation and print it as CSV.
#[derive(Parser, Debug)]
#[command(name = "quarry", version, about)]
pub struct CliConfig {
    /// Path to the federation TOML file
    #[arg(short, long)]
    pub config: PathBuf,

    /// Table to scan, as SOURCE.TABLE
    #[arg(long, value_name = "SOURCE.TABLE")]
    pub scan: String,

    /// Columns to keep, in output order (default: all)
    #[arg(long, value_delimiter = ',')]
    pub columns: Vec<String>,

    /// Equality filter, as COLUMN=VALUE
    #[arg(long = "where", value_name = "COLUMN=VALUE")]
    pub filter: Option<String>,

    /// Maximum number of rows to print
    #[arg(long)]
    pub limit: Option<usize>,

    /// Print rows as JSON instead of CSV
    #[arg(long)]
    pub json: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl CliConfig {
    /// Split the `--scan` argument into source and table.
    pub fn scan_target(&self) -> Result<(&str, &str)> {
        self.scan
            .split_once('.')
            .filter(|(source, table)| !source.is_empty() && !table.is_empty())
            .ok_or_else(|| QueryError::Config {
                field: "scan".to_string(),
                message: format!("expected SOURCE.TABLE, got '{}'", self.scan),
            })
    }

    /// Parse the `--where` argument into an equality predicate.
    pub fn filter_expr(&self) -> Result<Option<Expr>> {
        let Some(raw) = &self.filter else {
            return Ok(None);
        };
        let (column, raw_value) = raw.split_once('=').ok_or_else(|| QueryError::Config {
            field: "where".to_string(),
            message: format!("expected COLUMN=VALUE, got '{}'", raw),
        })?;
        Ok(Some(
            Expr::col(column.trim()).eq(Expr::lit(parse_literal(raw_value.trim()))),
        ))
    }
}

/// Guess the literal type the way CSV cells are typed: int, then
/// float, then bool, falling back to text.
fn parse_literal(raw: &str) -> Value {
    if let Ok(v) = raw.parse::<i64>() {
        return Value::Int(v);
    }
    if let Ok(v) = raw.parse::<f64>() {
        return Value::Float(v);
    }
    if let Ok(v) = raw.parse::<bool>() {
        return Value::Bool(v);
    }
    Value::Text(raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(scan: &str, filter: Option<&str>) -> CliConfig {
        CliConfig {
            config: PathBuf::from("federation.toml"),
            scan: scan.to_string(),
            columns: vec![],
            filter: filter.map(String::from),
            limit: None,
            json: false,
            verbose: false,
        }
    }

    #[test]
    fn test_scan_target_parsing() {
        assert_eq!(
            config("csv.cars", None).scan_target().unwrap(),
            ("csv", "cars")
        );
        assert!(config("cars", None).scan_target().is_err());
        assert!(config(".cars", None).scan_target().is_err());
    }

    #[test]
    fn test_filter_expr_typing() {
        let expr = config("csv.cars", Some("year=1996"))
            .filter_expr()
            .unwrap()
            .unwrap();
        assert_eq!(expr, Expr::col("year").eq(Expr::lit(1996i64)));

        let expr = config("csv.cars", Some("manufacturer=Jeep"))
            .filter_expr()
            .unwrap()
            .unwrap();
        assert_eq!(expr, Expr::col("manufacturer").eq(Expr::lit("Jeep")));
    }

    #[test]
    fn test_filter_expr_malformed() {
        assert!(config("csv.cars", Some("year")).filter_expr().is_err());
    }

    #[test]
    fn test_no_filter_is_none() {
        assert!(config("csv.cars", None).filter_expr().unwrap().is_none());
    }
}
