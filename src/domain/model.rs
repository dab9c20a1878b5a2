use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// A dynamically typed cell value.
///
/// Untagged so that rows serialize to plain JSON arrays
/// (`[1996, "Jeep", 4799.0]`) rather than enum wrappers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Parse a raw CSV cell according to its declared column type.
    /// A cell that fails its declared parse becomes `Null` rather than
    /// an error, matching lenient CSV semantics. Empty cells are `Null`.
    pub fn parse_typed(raw: &str, ty: ColumnType) -> Self {
        if raw.is_empty() {
            return Self::Null;
        }
        match ty {
            ColumnType::Bool => raw.parse::<bool>().map(Self::Bool).unwrap_or(Self::Null),
            ColumnType::Int => raw.parse::<i64>().map(Self::Int).unwrap_or(Self::Null),
            ColumnType::Float => raw.parse::<f64>().map(Self::Float).unwrap_or(Self::Null),
            ColumnType::Text => Self::Text(raw.to_string()),
        }
    }

    /// Ordering between two values, with cross-numeric coercion.
    /// Returns `None` when either side is `Null` or the types are
    /// incomparable; comparisons against `None` are treated as false
    /// by the expression evaluator.
    pub fn compare(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Null, _) | (_, Self::Null) => None,
            (Self::Bool(a), Self::Bool(b)) => Some(a.cmp(b)),
            (Self::Int(a), Self::Int(b)) => Some(a.cmp(b)),
            (Self::Float(a), Self::Float(b)) => a.partial_cmp(b),
            (Self::Int(a), Self::Float(b)) => (*a as f64).partial_cmp(b),
            (Self::Float(a), Self::Int(b)) => a.partial_cmp(&(*b as f64)),
            (Self::Text(a), Self::Text(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Bool(v) => write!(f, "{}", v),
            Self::Int(v) => write!(f, "{}", v),
            Self::Float(v) => write!(f, "{}", v),
            Self::Text(v) => write!(f, "{}", v),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(v.into())
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

/// Declared type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Bool,
    Int,
    Float,
    Text,
}

impl ColumnType {
    /// Accepts the annotation names used in CSV headers (`price:float`).
    pub fn from_annotation(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "bool" | "boolean" => Some(Self::Bool),
            "int" | "long" | "integer" => Some(Self::Int),
            "float" | "double" | "decimal" => Some(Self::Float),
            "string" | "text" | "varchar" => Some(Self::Text),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub ty: ColumnType,
}

impl Column {
    pub fn new(name: impl Into<String>, ty: ColumnType) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }

    pub fn text(name: impl Into<String>) -> Self {
        Self::new(name, ColumnType::Text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchema {
    pub name: String,
    pub columns: Vec<Column>,
}

impl TableSchema {
    pub fn new(name: impl Into<String>, columns: Vec<Column>) -> Self {
        Self {
            name: name.into(),
            columns,
        }
    }

    /// Case-sensitive column lookup.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }
}

pub type Row = Vec<Value>;

/// The unit of data flowing through the executor: a schema plus the
/// rows conforming to it. Every row has exactly `schema.width()` values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Batch {
    pub schema: TableSchema,
    pub rows: Vec<Row>,
}

impl Batch {
    pub fn new(schema: TableSchema, rows: Vec<Row>) -> Self {
        Self { schema, rows }
    }

    pub fn empty(schema: TableSchema) -> Self {
        Self {
            schema,
            rows: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_typed_values() {
        assert_eq!(Value::parse_typed("1996", ColumnType::Int), Value::Int(1996));
        assert_eq!(
            Value::parse_typed("4799.00", ColumnType::Float),
            Value::Float(4799.0)
        );
        assert_eq!(
            Value::parse_typed("true", ColumnType::Bool),
            Value::Bool(true)
        );
        assert_eq!(
            Value::parse_typed("Jeep", ColumnType::Text),
            Value::Text("Jeep".to_string())
        );
    }

    #[test]
    fn test_parse_typed_failures_become_null() {
        assert_eq!(Value::parse_typed("not-a-number", ColumnType::Int), Value::Null);
        assert_eq!(Value::parse_typed("", ColumnType::Text), Value::Null);
        assert_eq!(Value::parse_typed("yes", ColumnType::Bool), Value::Null);
    }

    #[test]
    fn test_cross_numeric_comparison() {
        assert_eq!(
            Value::Int(10).compare(&Value::Float(10.0)),
            Some(Ordering::Equal)
        );
        assert_eq!(
            Value::Float(9.5).compare(&Value::Int(10)),
            Some(Ordering::Less)
        );
        assert_eq!(Value::Null.compare(&Value::Int(1)), None);
        assert_eq!(Value::Int(1).compare(&Value::Text("1".to_string())), None);
    }

    #[test]
    fn test_column_type_annotations() {
        assert_eq!(ColumnType::from_annotation("int"), Some(ColumnType::Int));
        assert_eq!(ColumnType::from_annotation("DOUBLE"), Some(ColumnType::Float));
        assert_eq!(ColumnType::from_annotation("varchar"), Some(ColumnType::Text));
        assert_eq!(ColumnType::from_annotation("timestamp"), None);
    }

    #[test]
    fn test_schema_column_lookup_is_case_sensitive() {
        let schema = TableSchema::new(
            "cars",
            vec![Column::text("year"), Column::text("manufacturer")],
        );
        assert_eq!(schema.column_index("year"), Some(0));
        assert_eq!(schema.column_index("Year"), None);
    }

    #[test]
    fn test_value_json_round_trip() {
        let row: Row = vec![
            Value::Int(1996),
            Value::Text("Jeep".to_string()),
            Value::Null,
        ];
        let json = serde_json::to_string(&row).unwrap();
        assert_eq!(json, r#"[1996,"Jeep",null]"#);
        let back: Row = serde_json::from_str(&json).unwrap();
        assert_eq!(back, row);
    }
}
