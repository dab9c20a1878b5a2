use crate::domain::model::{TableSchema, Value};
use crate::utils::error::{QueryError, Result};
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
}

/// Scalar expression evaluated per row, used for filter predicates.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Column(String),
    Literal(Value),
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
}

impl Expr {
    pub fn col(name: impl Into<String>) -> Self {
        Self::Column(name.into())
    }

    pub fn lit(value: impl Into<Value>) -> Self {
        Self::Literal(value.into())
    }

    fn binary(op: BinaryOp, lhs: Self, rhs: Self) -> Self {
        Self::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    pub fn eq(self, other: Self) -> Self {
        Self::binary(BinaryOp::Eq, self, other)
    }

    pub fn ne(self, other: Self) -> Self {
        Self::binary(BinaryOp::Ne, self, other)
    }

    pub fn lt(self, other: Self) -> Self {
        Self::binary(BinaryOp::Lt, self, other)
    }

    pub fn le(self, other: Self) -> Self {
        Self::binary(BinaryOp::Le, self, other)
    }

    pub fn gt(self, other: Self) -> Self {
        Self::binary(BinaryOp::Gt, self, other)
    }

    pub fn ge(self, other: Self) -> Self {
        Self::binary(BinaryOp::Ge, self, other)
    }

    pub fn and(self, other: Self) -> Self {
        Self::binary(BinaryOp::And, self, other)
    }

    pub fn or(self, other: Self) -> Self {
        Self::binary(BinaryOp::Or, self, other)
    }

    /// Column names the expression refers to, for build-time checks.
    pub fn referenced_columns<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Self::Column(name) => out.push(name),
            Self::Literal(_) => {}
            Self::Binary { lhs, rhs, .. } => {
                lhs.referenced_columns(out);
                rhs.referenced_columns(out);
            }
        }
    }

    /// Evaluate against one row. Comparisons involving `Null` or
    /// incomparable types yield `Bool(false)`, so filters drop those
    /// rows rather than erroring mid-query.
    pub fn eval(&self, schema: &TableSchema, row: &[Value]) -> Result<Value> {
        match self {
            Self::Column(name) => {
                let index = schema
                    .column_index(name)
                    .ok_or_else(|| QueryError::UnknownColumn(name.clone()))?;
                Ok(row[index].clone())
            }
            Self::Literal(value) => Ok(value.clone()),
            Self::Binary { op, lhs, rhs } => {
                let left = lhs.eval(schema, row)?;
                let right = rhs.eval(schema, row)?;
                match op {
                    BinaryOp::And | BinaryOp::Or => {
                        let (Value::Bool(a), Value::Bool(b)) = (&left, &right) else {
                            return Err(QueryError::InvalidPlan {
                                message: format!("{:?} requires boolean operands", op),
                            });
                        };
                        Ok(Value::Bool(match op {
                            BinaryOp::And => *a && *b,
                            _ => *a || *b,
                        }))
                    }
                    _ => {
                        let ordering = left.compare(&right);
                        let matched = match (op, ordering) {
                            (_, None) => false,
                            (BinaryOp::Eq, Some(ord)) => ord == Ordering::Equal,
                            (BinaryOp::Ne, Some(ord)) => ord != Ordering::Equal,
                            (BinaryOp::Lt, Some(ord)) => ord == Ordering::Less,
                            (BinaryOp::Le, Some(ord)) => ord != Ordering::Greater,
                            (BinaryOp::Gt, Some(ord)) => ord == Ordering::Greater,
                            (BinaryOp::Ge, Some(ord)) => ord != Ordering::Less,
                            _ => unreachable!("And/Or handled above"),
                        };
                        Ok(Value::Bool(matched))
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Column, ColumnType};

    fn schema() -> TableSchema {
        TableSchema::new(
            "cars",
            vec![
                Column::new("year", ColumnType::Int),
                Column::text("manufacturer"),
                Column::new("price", ColumnType::Float),
            ],
        )
    }

    fn row() -> Vec<Value> {
        vec![Value::Int(1996), Value::from("Jeep"), Value::Float(4799.0)]
    }

    #[test]
    fn test_column_and_literal() {
        let schema = schema();
        let row = row();
        assert_eq!(
            Expr::col("manufacturer").eval(&schema, &row).unwrap(),
            Value::from("Jeep")
        );
        assert_eq!(Expr::lit(7i64).eval(&schema, &row).unwrap(), Value::Int(7));
    }

    #[test]
    fn test_comparisons() {
        let schema = schema();
        let row = row();
        let checks = [
            (Expr::col("year").eq(Expr::lit(1996i64)), true),
            (Expr::col("year").ne(Expr::lit(1996i64)), false),
            (Expr::col("price").gt(Expr::lit(4000.0)), true),
            (Expr::col("price").le(Expr::lit(4000.0)), false),
            (Expr::col("year").ge(Expr::lit(1996.0)), true),
        ];
        for (expr, expected) in checks {
            assert_eq!(expr.eval(&schema, &row).unwrap(), Value::Bool(expected));
        }
    }

    #[test]
    fn test_logical_connectives() {
        let schema = schema();
        let row = row();
        let expr = Expr::col("year")
            .eq(Expr::lit(1996i64))
            .and(Expr::col("manufacturer").eq(Expr::lit("Jeep")));
        assert_eq!(expr.eval(&schema, &row).unwrap(), Value::Bool(true));

        let expr = Expr::col("year")
            .eq(Expr::lit(2000i64))
            .or(Expr::col("manufacturer").eq(Expr::lit("Jeep")));
        assert_eq!(expr.eval(&schema, &row).unwrap(), Value::Bool(true));
    }

    #[test]
    fn test_null_comparisons_are_false() {
        let schema = schema();
        let row = vec![Value::Null, Value::from("Jeep"), Value::Float(4799.0)];
        let expr = Expr::col("year").eq(Expr::lit(1996i64));
        assert_eq!(expr.eval(&schema, &row).unwrap(), Value::Bool(false));
        let expr = Expr::col("year").ne(Expr::lit(1996i64));
        assert_eq!(expr.eval(&schema, &row).unwrap(), Value::Bool(false));
    }

    #[test]
    fn test_unknown_column_errors() {
        let err = Expr::col("missing").eval(&schema(), &row()).unwrap_err();
        assert!(matches!(err, QueryError::UnknownColumn(_)));
    }

    #[test]
    fn test_and_requires_booleans() {
        let err = Expr::col("year")
            .and(Expr::lit(true))
            .eval(&schema(), &row())
            .unwrap_err();
        assert!(matches!(err, QueryError::InvalidPlan { .. }));
    }

    #[test]
    fn test_referenced_columns() {
        let expr = Expr::col("year")
            .eq(Expr::lit(1996i64))
            .and(Expr::col("price").gt(Expr::lit(0.0)));
        let mut referenced = Vec::new();
        expr.referenced_columns(&mut referenced);
        assert_eq!(referenced, vec!["year", "price"]);
    }
}
