use serde::{Deserialize, Serialize};

use super::{Expr, Parameter};

/// A SELECT statement: one or more cores followed by the ordering and paging modifiers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectStatement {
    /// The select cores, combined with UNION when there is more than one
    pub cores: Vec<SelectCore>,
    /// This list of ordering clauses
    #[serde(default)]
    pub orders: Vec<Ordering>,
    /// The number of rows to return
    #[serde(default)]
    pub limit: Option<RowCount>,
    /// The number of rows to skip
    #[serde(default)]
    pub offset: Option<RowCount>,
    /// The row lock requested for the selected rows
    #[serde(default)]
    pub lock: Option<LockMode>,
}

impl SelectStatement {
    pub fn new(core: SelectCore) -> Self {
        Self {
            cores: vec![core],
            orders: vec![],
            limit: None,
            offset: None,
            lock: None,
        }
    }

    pub fn with_limit(mut self, limit: u64) -> Self {
        self.limit = Some(RowCount::Literal(limit));
        self
    }

    pub fn with_offset(mut self, offset: u64) -> Self {
        self.offset = Some(RowCount::Literal(offset));
        self
    }

    pub fn with_lock(mut self, lock: LockMode) -> Self {
        self.lock = Some(lock);
        self
    }

    pub fn order_by(mut self, ordering: Ordering) -> Self {
        self.orders.push(ordering);
        self
    }

    /// Whether a limit or an offset is requested
    pub fn is_paged(&self) -> bool {
        self.limit.is_some() || self.offset.is_some()
    }

    /// The first core, which drives the primary key lookups
    pub fn first_core(&self) -> Option<&SelectCore> {
        self.cores.first()
    }

    /// Whether the statement is a single core projecting only a COUNT
    pub fn is_count(&self) -> bool {
        self.cores.len() == 1 && self.cores[0].is_count()
    }
}

/// The body of a select: projections, sources and filters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectCore {
    #[serde(default)]
    pub distinct: bool,
    /// The projected expressions
    pub projections: Vec<Expr>,
    /// The FROM table and its joins
    pub source: JoinSource,
    /// The list of where clauses, combined with AND
    #[serde(default)]
    pub wheres: Vec<Expr>,
    /// The list of grouping clauses
    #[serde(default)]
    pub groups: Vec<Expr>,
    /// The list of having clauses, combined with AND
    #[serde(default)]
    pub havings: Vec<Expr>,
}

impl SelectCore {
    pub fn new(from: TableRef) -> Self {
        Self {
            distinct: false,
            projections: vec![],
            source: JoinSource::new(from),
            wheres: vec![],
            groups: vec![],
            havings: vec![],
        }
    }

    pub fn project(mut self, expr: Expr) -> Self {
        self.projections.push(expr);
        self
    }

    pub fn join(mut self, join: Join) -> Self {
        self.source.joins.push(join);
        self
    }

    pub fn filter(mut self, expr: Expr) -> Self {
        self.wheres.push(expr);
        self
    }

    pub fn group_by(mut self, expr: Expr) -> Self {
        self.groups.push(expr);
        self
    }

    /// Exactly one projection which is a COUNT
    pub fn is_count(&self) -> bool {
        self.projections.len() == 1 && self.projections[0].is_count()
    }
}

/// The FROM clause, a driving table and a list of joins
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinSource {
    pub left: TableRef,
    #[serde(default)]
    pub joins: Vec<Join>,
}

impl JoinSource {
    pub fn new(left: TableRef) -> Self {
        Self {
            left,
            joins: vec![],
        }
    }
}

/// A table referenced in a statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRef {
    #[serde(default)]
    pub schema: Option<String>,
    pub name: String,
    #[serde(default)]
    pub alias: Option<String>,
}

impl TableRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            schema: None,
            name: name.into(),
            alias: None,
        }
    }

    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// The name columns of this table are qualified with
    pub fn reference_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }
}

/// Creates a table reference
pub fn table(name: impl Into<String>) -> TableRef {
    TableRef::new(name)
}

/// A join clause
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Join {
    /// Join type
    pub r#type: JoinType,
    /// The joined table
    pub target: TableRef,
    /// The joining conditions
    pub conds: Vec<Expr>,
}

impl Join {
    pub fn new(r#type: JoinType, target: TableRef, conds: Vec<Expr>) -> Self {
        Self {
            r#type,
            target,
            conds,
        }
    }
}

/// Type of the join
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum JoinType {
    Inner,
    Left,
    Right,
    Full,
}

/// An ordering expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ordering {
    /// The type of ordering
    pub r#type: OrderingType,
    /// The ordering expression
    pub expr: Expr,
}

impl Ordering {
    pub fn new(r#type: OrderingType, expr: Expr) -> Self {
        Self { r#type, expr }
    }

    pub fn asc(expr: Expr) -> Self {
        Self::new(OrderingType::Asc, expr)
    }

    pub fn desc(expr: Expr) -> Self {
        Self::new(OrderingType::Desc, expr)
    }
}

/// Type of ordering
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum OrderingType {
    Asc,
    Desc,
}

impl OrderingType {
    /// Returns `true` if the ordering type is [`Asc`].
    ///
    /// [`Asc`]: OrderingType::Asc
    #[must_use]
    pub fn is_asc(&self) -> bool {
        matches!(self, Self::Asc)
    }
}

/// The value of a LIMIT or OFFSET
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RowCount {
    Literal(u64),
    Bind(Parameter),
}

impl RowCount {
    /// The count, if it is known when compiling
    pub fn as_literal(&self) -> Option<u64> {
        match self {
            RowCount::Literal(n) => Some(*n),
            RowCount::Bind(_) => None,
        }
    }
}

/// The requested row lock
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LockMode {
    /// SELECT ... FOR UPDATE, or the dialect's equivalent
    ForUpdate,
    /// A lock clause supplied verbatim by the caller
    Custom(String),
}
