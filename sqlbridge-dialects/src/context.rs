use sqlbridge_core::{
    config::ServerVersion,
    err::{DialectError, Error, Result},
    sqlil::LockMode,
};

use crate::{ConnectionMetadata, Dialect};

/// State carried through a single compilation
pub struct VisitContext<'a> {
    meta: &'a dyn ConnectionMetadata,
    dialect: Dialect,
    /// The row lock of each enclosing select statement, innermost last
    locks: Vec<Option<LockMode>>,
}

impl<'a> VisitContext<'a> {
    pub fn new(meta: &'a dyn ConnectionMetadata, dialect: Dialect) -> Self {
        Self {
            meta,
            dialect,
            locks: vec![],
        }
    }

    pub fn meta(&self) -> &'a dyn ConnectionMetadata {
        self.meta
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn server_version(&self) -> Option<ServerVersion> {
        self.meta.server_version()
    }

    /// Whether the server is known to be at least the supplied version
    pub fn version_at_least(&self, major: u32, minor: u32) -> bool {
        self.server_version()
            .map(|v| v.at_least(major, minor))
            .unwrap_or(false)
    }

    pub fn primary_key(&self, table: &str) -> Result<Option<String>> {
        self.meta.primary_key(table)
    }

    /// Runs the callback with the supplied lock as the innermost lock scope.
    /// The scope is removed when the callback returns, whether or not it succeeded.
    pub fn with_lock<T>(
        &mut self,
        lock: Option<&LockMode>,
        cb: impl FnOnce(&mut Self) -> Result<T>,
    ) -> Result<T> {
        self.locks.push(lock.cloned());
        let res = cb(self);
        self.locks.pop();
        res
    }

    /// The lock of the innermost select statement being visited
    pub fn current_lock(&self) -> Option<&LockMode> {
        self.locks.last().and_then(|l| l.as_ref())
    }

    /// Number of enclosing lock scopes
    pub fn lock_depth(&self) -> usize {
        self.locks.len()
    }

    /// Builds an error for a statement the dialect cannot express
    pub fn unsupported(&self, reason: impl Into<String>) -> Error {
        DialectError::unsupported(self.dialect.name(), reason).into()
    }
}
