use sqlbridge_core::{
    data::DataValue,
    err::{bail, DialectError, Result},
    sqlil as sql,
};

use crate::{ansi, Collector, ConnectionMetadata, SqlVisitor, ValueQuoter, VisitContext};

/// Firebird, paging with `SELECT FIRST n SKIP m` at the head of the statement
#[derive(Debug, Clone, Copy, Default)]
pub struct FirebirdVisitor;

impl FirebirdVisitor {
    /// Bound values must be parenthesised within FIRST and SKIP
    fn head_row_count(
        &self,
        ctx: &mut VisitContext,
        rc: &sql::RowCount,
        out: &mut dyn Collector,
    ) -> Result<()> {
        match rc {
            sql::RowCount::Literal(_) => self.visit_row_count(ctx, rc, out),
            sql::RowCount::Bind(_) => {
                out.push_sql("(");
                self.visit_row_count(ctx, rc, out)?;
                out.push_sql(")");
                Ok(())
            }
        }
    }
}

impl ValueQuoter for FirebirdVisitor {
    fn can_inline(&self, value: &DataValue) -> bool {
        value.has_literal() && !value.is_large_object()
    }

    /// The BOOLEAN type was introduced in Firebird 3
    fn quote_boolean(&self, meta: &dyn ConnectionMetadata, value: bool) -> String {
        let native = meta
            .server_version()
            .map(|v| v.at_least(3, 0))
            .unwrap_or(false);

        match (native, value) {
            (true, true) => "TRUE".into(),
            (true, false) => "FALSE".into(),
            (false, true) => "1".into(),
            (false, false) => "0".into(),
        }
    }

    fn quote_array(&self, _: &dyn ConnectionMetadata, _: &[DataValue]) -> Result<String> {
        bail!(DialectError::unsupported(self.name(), "array values"))
    }
}

impl SqlVisitor for FirebirdVisitor {
    fn name(&self) -> &'static str {
        "firebird"
    }

    fn as_quoter(&self) -> &dyn ValueQuoter {
        self
    }

    fn visit_select_body(
        &self,
        ctx: &mut VisitContext,
        select: &sql::SelectStatement,
        out: &mut dyn Collector,
    ) -> Result<()> {
        if select.is_paged() && select.cores.len() > 1 {
            return Err(ctx.unsupported("FIRST and SKIP cannot page a compound select"));
        }

        ansi::select_body(self, ctx, select, out)
    }

    fn visit_select_head(
        &self,
        ctx: &mut VisitContext,
        select: &sql::SelectStatement,
        core: &sql::SelectCore,
        out: &mut dyn Collector,
    ) -> Result<()> {
        out.push_sql("SELECT");

        if let Some(limit) = &select.limit {
            out.push_sql(" FIRST ");
            self.head_row_count(ctx, limit, out)?;
        }

        if let Some(offset) = &select.offset {
            out.push_sql(" SKIP ");
            self.head_row_count(ctx, offset, out)?;
        }

        if core.distinct {
            out.push_sql(" DISTINCT");
        }

        Ok(())
    }

    fn visit_limit_offset(
        &self,
        _ctx: &mut VisitContext,
        _select: &sql::SelectStatement,
        _out: &mut dyn Collector,
    ) -> Result<()> {
        Ok(())
    }

    fn visit_lock(
        &self,
        _ctx: &mut VisitContext,
        lock: &sql::LockMode,
        out: &mut dyn Collector,
    ) -> Result<()> {
        match lock {
            sql::LockMode::ForUpdate => {
                out.push_sql(" FOR UPDATE WITH LOCK");
                Ok(())
            }
            lock => ansi::lock(lock, out),
        }
    }
}
