use serde::{Deserialize, Serialize};

use super::{Expr, Ordering, RowCount, TableRef};

/// A statement updating rows of a table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateStatement {
    /// The target table
    pub relation: TableRef,
    /// The list of assignments indexed by the column name
    pub values: Vec<(String, Expr)>,
    /// The list of where clauses, combined with AND
    #[serde(default)]
    pub wheres: Vec<Expr>,
    /// Ordering of the rows to update, only meaningful with a limit
    #[serde(default)]
    pub orders: Vec<Ordering>,
    /// The maximum number of rows to update
    #[serde(default)]
    pub limit: Option<RowCount>,
    /// The key column used to restrict the update to a sub-select
    #[serde(default)]
    pub key: Option<String>,
}

impl UpdateStatement {
    pub fn new(relation: TableRef) -> Self {
        Self {
            relation,
            values: vec![],
            wheres: vec![],
            orders: vec![],
            limit: None,
            key: None,
        }
    }

    pub fn set(mut self, column: impl Into<String>, expr: Expr) -> Self {
        self.values.push((column.into(), expr));
        self
    }

    pub fn filter(mut self, expr: Expr) -> Self {
        self.wheres.push(expr);
        self
    }

    /// Whether the update has to be restricted through a keyed sub-select
    pub fn requires_subselect(&self) -> bool {
        self.limit.is_some() || !self.orders.is_empty()
    }
}
