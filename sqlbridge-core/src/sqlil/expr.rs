use enum_as_inner::EnumAsInner;
use serde::{Deserialize, Serialize};

use crate::data::{DataType, DataValue};

/// A SQLIL expression node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, EnumAsInner)]
pub enum Expr {
    Column(ColumnRef),
    Constant(Constant),
    Parameter(Parameter),
    /// Raw SQL which is emitted verbatim
    Literal(String),
    /// The `*` projection
    Star,
    Alias(Alias),
    UnaryOp(UnaryOp),
    BinaryOp(BinaryOp),
    FunctionCall(FunctionCall),
    AggregateCall(AggregateCall),
}

pub type SubExpr = Box<Expr>;

impl Expr {
    pub fn col(table: impl Into<String>, name: impl Into<String>) -> Self {
        Self::Column(ColumnRef::new(Some(table.into()), name))
    }

    pub fn bare_col(name: impl Into<String>) -> Self {
        Self::Column(ColumnRef::new(None, name))
    }

    pub fn constant(value: impl Into<DataValue>) -> Self {
        Self::Constant(Constant::new(value.into()))
    }

    pub fn param(r#type: DataType, id: u32) -> Self {
        Self::Parameter(Parameter::new(r#type, id))
    }

    pub fn literal(sql: impl Into<String>) -> Self {
        Self::Literal(sql.into())
    }

    pub fn alias(self, alias: impl Into<String>) -> Self {
        Self::Alias(Alias::new(self, alias))
    }

    pub fn count() -> Self {
        Self::AggregateCall(AggregateCall::Count)
    }

    pub fn equals(left: Expr, right: Expr) -> Self {
        Self::BinaryOp(BinaryOp::new(left, BinaryOpType::Equal, right))
    }

    /// Gets the expression with any alias removed
    pub fn unaliased(&self) -> &Expr {
        match self {
            Expr::Alias(a) => a.expr.unaliased(),
            _ => self,
        }
    }

    /// Whether this is a `COUNT(*)` or `COUNT(DISTINCT ..)`, aliased or not
    pub fn is_count(&self) -> bool {
        matches!(
            self.unaliased(),
            Expr::AggregateCall(AggregateCall::Count | AggregateCall::CountDistinct(_))
        )
    }
}

/// A reference to a column, optionally qualified by a table name or alias
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnRef {
    pub table: Option<String>,
    pub name: String,
}

impl ColumnRef {
    pub fn new(table: Option<String>, name: impl Into<String>) -> Self {
        Self {
            table,
            name: name.into(),
        }
    }
}

/// A constant embedded in the query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Constant {
    pub value: DataValue,
}

impl Constant {
    pub fn new(value: DataValue) -> Self {
        Self { value }
    }
}

/// A late-bound parameter embedded in the query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    /// The data type of the parameter
    pub r#type: DataType,
    /// An ID of the query param
    pub id: u32,
}

impl Parameter {
    pub fn new(r#type: DataType, id: u32) -> Self {
        Self { r#type, id }
    }
}

/// An aliased expression (`expr AS alias`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alias {
    pub expr: SubExpr,
    pub alias: String,
}

impl Alias {
    pub fn new(expr: Expr, alias: impl Into<String>) -> Self {
        Self {
            expr: Box::new(expr),
            alias: alias.into(),
        }
    }
}

/// A unary operation over one expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnaryOp {
    pub r#type: UnaryOpType,
    pub expr: SubExpr,
}

impl UnaryOp {
    pub fn new(r#type: UnaryOpType, expr: Expr) -> Self {
        Self {
            r#type,
            expr: Box::new(expr),
        }
    }
}

/// Supported unary operators
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum UnaryOpType {
    LogicalNot,
    Negate,
    IsNull,
    IsNotNull,
}

/// A binary operation over two expressions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinaryOp {
    pub left: SubExpr,
    pub r#type: BinaryOpType,
    pub right: SubExpr,
}

impl BinaryOp {
    pub fn new(left: Expr, r#type: BinaryOpType, right: Expr) -> Self {
        Self {
            left: Box::new(left),
            r#type,
            right: Box::new(right),
        }
    }
}

/// Supported binary operators
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BinaryOpType {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    LogicalAnd,
    LogicalOr,
    Concat,
    Like,
    Equal,
    NotEqual,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
}

/// Supported function calls
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FunctionCall {
    Abs(SubExpr),
    Length(SubExpr),
    Uppercase(SubExpr),
    Lowercase(SubExpr),
    Coalesce(Vec<Expr>),
    Now,
}

/// Aggregate function calls
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AggregateCall {
    Count,
    CountDistinct(SubExpr),
    Sum(SubExpr),
    Max(SubExpr),
    Min(SubExpr),
    Average(SubExpr),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expr_is_count() {
        assert!(Expr::count().is_count());
        assert!(Expr::count().alias("cnt").is_count());
        assert!(!Expr::col("t", "id").is_count());
        assert!(
            Expr::AggregateCall(AggregateCall::CountDistinct(Box::new(Expr::col("t", "id"))))
                .is_count()
        );
        assert!(
            !Expr::AggregateCall(AggregateCall::Max(Box::new(Expr::col("t", "id")))).is_count()
        );
    }

    #[test]
    fn test_expr_unaliased() {
        let expr = Expr::col("t", "id").alias("a").alias("b");

        assert_eq!(expr.unaliased(), &Expr::col("t", "id"));
    }
}
