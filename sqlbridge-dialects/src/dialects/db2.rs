use sqlbridge_core::{
    data::{encode_hex, DataValue},
    err::{bail, DialectError, Result},
    sqlil as sql,
};

use crate::{ansi, Collector, ConnectionMetadata, SqlVisitor, ValueQuoter, VisitContext};

/// IBM DB2.
///
/// From 11.1 paging uses `OFFSET m ROWS FETCH FIRST n ROWS ONLY`. Older servers only
/// support `FETCH FIRST`, so an offset is applied by numbering the rows of the
/// statement and filtering on that number. Servers of unknown version are treated
/// as older servers.
#[derive(Debug, Clone, Copy, Default)]
pub struct Db2Visitor;

const ROW_NUM: &str = "\"internal$rownum\"";

impl Db2Visitor {
    fn legacy_paging(
        &self,
        ctx: &mut VisitContext,
        select: &sql::SelectStatement,
        out: &mut dyn Collector,
    ) -> Result<()> {
        let limit = match &select.limit {
            Some(limit) => limit,
            None => {
                return Err(ctx.unsupported("An offset without a limit requires DB2 11.1 or later"))
            }
        };

        if select.cores.len() > 1 {
            return Err(ctx.unsupported("Paging a compound select requires DB2 11.1 or later"));
        }

        let offset = select
            .offset
            .as_ref()
            .filter(|o| !matches!(o, sql::RowCount::Literal(0)));

        match offset {
            None => {
                ansi::select_cores(self, ctx, select, out)?;
                self.visit_orders(ctx, &select.orders, out)?;

                if let sql::RowCount::Literal(1) = limit {
                    out.push_sql(" FETCH FIRST ROW ONLY");
                } else {
                    out.push_sql(" FETCH FIRST ");
                    self.visit_row_count(ctx, limit, out)?;
                    out.push_sql(" ROWS ONLY");
                }
            }
            Some(offset) => {
                out.push_sql("SELECT B.* FROM (SELECT A.*, ROW_NUMBER() OVER () AS ");
                out.push_sql(ROW_NUM);
                out.push_sql(" FROM (");
                ansi::select_cores(self, ctx, select, out)?;
                self.visit_orders(ctx, &select.orders, out)?;
                out.push_sql(") AS A) AS B WHERE B.");
                out.push_sql(ROW_NUM);
                out.push_sql(" > ");
                self.visit_row_count(ctx, offset, out)?;
                out.push_sql(" AND B.");
                out.push_sql(ROW_NUM);
                out.push_sql(" <= ");
                ansi::row_count_sum(self, ctx, Some(offset), limit, out)?;
            }
        }

        if let Some(lock) = &select.lock {
            self.visit_lock(ctx, lock, out)?;
        }

        Ok(())
    }
}

impl ValueQuoter for Db2Visitor {
    fn can_inline(&self, value: &DataValue) -> bool {
        !value.is_large_object()
    }

    /// BOOLEAN columns were introduced in 11.1
    fn quote_boolean(&self, meta: &dyn ConnectionMetadata, value: bool) -> String {
        let native = meta
            .server_version()
            .map(|v| v.at_least(11, 1))
            .unwrap_or(false);

        match (native, value) {
            (true, true) => "TRUE".into(),
            (true, false) => "FALSE".into(),
            (false, true) => "1".into(),
            (false, false) => "0".into(),
        }
    }

    fn quote_binary(&self, value: &[u8]) -> String {
        format!("BX'{}'", encode_hex(value))
    }

    fn quote_array(&self, _: &dyn ConnectionMetadata, _: &[DataValue]) -> Result<String> {
        bail!(DialectError::unsupported(self.name(), "array values"))
    }
}

impl SqlVisitor for Db2Visitor {
    fn name(&self) -> &'static str {
        "db2"
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
        if !select.is_paged() || ctx.version_at_least(11, 1) {
            return ansi::select_body(self, ctx, select, out);
        }

        self.legacy_paging(ctx, select, out)
    }

    fn visit_limit_offset(
        &self,
        ctx: &mut VisitContext,
        select: &sql::SelectStatement,
        out: &mut dyn Collector,
    ) -> Result<()> {
        ansi::offset_fetch(self, ctx, select, out)
    }
}
