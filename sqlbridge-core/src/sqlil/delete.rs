use serde::{Deserialize, Serialize};

use super::{Expr, TableRef};

/// A statement deleting rows from a table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteStatement {
    /// The target table
    pub relation: TableRef,
    /// The list of where clauses, combined with AND
    #[serde(default)]
    pub wheres: Vec<Expr>,
}

impl DeleteStatement {
    pub fn new(relation: TableRef) -> Self {
        Self {
            relation,
            wheres: vec![],
        }
    }

    pub fn filter(mut self, expr: Expr) -> Self {
        self.wheres.push(expr);
        self
    }
}
