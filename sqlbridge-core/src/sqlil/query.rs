use anyhow::{Context, Result};
use enum_as_inner::EnumAsInner;
use serde::{Deserialize, Serialize};

use super::{DeleteStatement, Expr, InsertStatement, SelectStatement, TableRef, UpdateStatement};

/// A statement to be compiled for a database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, EnumAsInner)]
pub enum Query {
    Select(SelectStatement),
    Insert(InsertStatement),
    Update(UpdateStatement),
    Delete(DeleteStatement),
}

impl Query {
    /// Parses a statement tree serialised as JSON by the query builder
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse statement tree")
    }

    /// Gets the tables referenced by the query
    pub fn tables(&self) -> Vec<&TableRef> {
        match self {
            Query::Select(q) => q
                .cores
                .iter()
                .flat_map(|c| {
                    std::iter::once(&c.source.left).chain(c.source.joins.iter().map(|j| &j.target))
                })
                .collect(),
            Query::Insert(q) => vec![&q.relation],
            Query::Update(q) => vec![&q.relation],
            Query::Delete(q) => vec![&q.relation],
        }
    }

    /// Gets the queries WHERE conditions
    pub fn wheres(&self) -> Vec<&Expr> {
        match self {
            Query::Select(q) => q.cores.iter().flat_map(|c| c.wheres.iter()).collect(),
            Query::Update(q) => q.wheres.iter().collect(),
            Query::Delete(q) => q.wheres.iter().collect(),
            Query::Insert(_) => vec![],
        }
    }
}

impl From<SelectStatement> for Query {
    fn from(v: SelectStatement) -> Self {
        Self::Select(v)
    }
}

impl From<InsertStatement> for Query {
    fn from(v: InsertStatement) -> Self {
        Self::Insert(v)
    }
}

impl From<UpdateStatement> for Query {
    fn from(v: UpdateStatement) -> Self {
        Self::Update(v)
    }
}

impl From<DeleteStatement> for Query {
    fn from(v: DeleteStatement) -> Self {
        Self::Delete(v)
    }
}
