use serde::{Deserialize, Serialize};

use super::{Expr, TableRef};

/// A statement inserting a single row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsertStatement {
    /// The target table
    pub relation: TableRef,
    /// The list of inserted values indexed by the column name
    pub columns: Vec<(String, Expr)>,
}

impl InsertStatement {
    pub fn new(relation: TableRef) -> Self {
        Self {
            relation,
            columns: vec![],
        }
    }

    pub fn value(mut self, column: impl Into<String>, expr: Expr) -> Self {
        self.columns.push((column.into(), expr));
        self
    }

    /// Gets the expression inserted into the supplied column
    pub fn get(&self, column: &str) -> Option<&Expr> {
        self.columns
            .iter()
            .find(|(c, _)| c == column)
            .map(|(_, e)| e)
    }
}
