use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use sqlbridge_core::{
    err::{bail, Error, Result},
    sqlil as sql,
};
use sqlbridge_logging::{debug, MaxLogLength};

use crate::{
    dialects::{
        Db2Visitor, DerbyVisitor, FirebirdVisitor, GenericVisitor, H2Visitor, HsqldbVisitor,
        SqlServerNgVisitor, SqlServerVisitor,
    },
    BindCollector, Collector, CompiledQuery, ConnectionMetadata, PlaceholderStyle, SqlVisitor,
    SubstituteCollector, VisitContext,
};

/// The supported database dialects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dialect {
    Generic,
    Db2,
    Derby,
    Firebird,
    Hsqldb,
    H2,
    /// SQL Server prior to 2012
    SqlServer,
    /// SQL Server 2012 onwards
    SqlServerNg,
}

impl Dialect {
    pub const ALL: [Dialect; 8] = [
        Dialect::Generic,
        Dialect::Db2,
        Dialect::Derby,
        Dialect::Firebird,
        Dialect::Hsqldb,
        Dialect::H2,
        Dialect::SqlServer,
        Dialect::SqlServerNg,
    ];

    pub fn name(&self) -> &'static str {
        self.visitor().name()
    }

    pub fn visitor(&self) -> &'static dyn SqlVisitor {
        match self {
            Dialect::Generic => &GenericVisitor,
            Dialect::Db2 => &Db2Visitor,
            Dialect::Derby => &DerbyVisitor,
            Dialect::Firebird => &FirebirdVisitor,
            Dialect::Hsqldb => &HsqldbVisitor,
            Dialect::H2 => &H2Visitor,
            Dialect::SqlServer => &SqlServerVisitor,
            Dialect::SqlServerNg => &SqlServerNgVisitor,
        }
    }

    /// Whether large object values are written in a second statement after the
    /// row itself has been inserted or updated
    pub fn defers_large_objects(&self) -> bool {
        matches!(self, Dialect::Db2 | Dialect::Derby | Dialect::Firebird)
    }

    /// Compiles the query for this dialect, binding or inlining values
    /// according to the connection settings
    pub fn compile(
        &self,
        meta: &dyn ConnectionMetadata,
        query: &sql::Query,
    ) -> Result<CompiledQuery> {
        if meta.prepared_statements() {
            self.compile_with(meta, query, &mut BindCollector::new(PlaceholderStyle::QuestionMark))
        } else {
            self.compile_with(
                meta,
                query,
                &mut SubstituteCollector::new(PlaceholderStyle::QuestionMark),
            )
        }
    }

    /// Compiles the query into the supplied collector
    pub fn compile_with(
        &self,
        meta: &dyn ConnectionMetadata,
        query: &sql::Query,
        out: &mut dyn Collector,
    ) -> Result<CompiledQuery> {
        let visitor = self.visitor();
        let mut ctx = VisitContext::new(meta, *self);

        visitor.visit_query(&mut ctx, query, out)?;
        let compiled = out.compile(visitor.as_quoter(), meta)?;

        debug!(
            "Compiled {} query: {}",
            self.name(),
            MaxLogLength::new(Some(1000), &compiled.sql)
        );

        Ok(compiled)
    }
}

impl FromStr for Dialect {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Ok(match s.trim().to_lowercase().as_str() {
            "generic" | "ansi" => Dialect::Generic,
            "db2" => Dialect::Db2,
            "derby" => Dialect::Derby,
            "firebird" | "jaybird" => Dialect::Firebird,
            "hsqldb" => Dialect::Hsqldb,
            "h2" => Dialect::H2,
            "sqlserver" | "mssql" | "jtds" => Dialect::SqlServer,
            "sqlserver_ng" | "mssql_ng" => Dialect::SqlServerNg,
            _ => bail!("Unknown dialect \"{s}\""),
        })
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
