use sqlbridge_core::{data::DataValue, err::Result, sqlil as sql};

use crate::{
    ansi, quote_value, Collector, ConnectionMetadata, SqlVisitor, ValueQuoter, VisitContext,
};

/// HyperSQL, paging with `SELECT LIMIT <offset> <limit>` at the head of the statement.
/// A limit of 0 means unlimited.
#[derive(Debug, Clone, Copy, Default)]
pub struct HsqldbVisitor;

/// Renders an `ARRAY[..]` constructor, shared with H2
pub(crate) fn quote_array_constructor<Q: ValueQuoter + ?Sized>(
    quoter: &Q,
    meta: &dyn ConnectionMetadata,
    values: &[DataValue],
) -> Result<String> {
    let elements = values
        .iter()
        .map(|v| quote_value(quoter, meta, v))
        .collect::<Result<Vec<_>>>()?;

    Ok(format!("ARRAY[{}]", elements.join(", ")))
}

impl ValueQuoter for HsqldbVisitor {
    fn quote_array(&self, meta: &dyn ConnectionMetadata, values: &[DataValue]) -> Result<String> {
        quote_array_constructor(self, meta, values)
    }
}

impl SqlVisitor for HsqldbVisitor {
    fn name(&self) -> &'static str {
        "hsqldb"
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
        leading_limit_body(self, ctx, select, out)
    }

    fn visit_select_head(
        &self,
        ctx: &mut VisitContext,
        select: &sql::SelectStatement,
        core: &sql::SelectCore,
        out: &mut dyn Collector,
    ) -> Result<()> {
        leading_limit_head(self, ctx, select, core, out)
    }

    fn visit_limit_offset(
        &self,
        _ctx: &mut VisitContext,
        _select: &sql::SelectStatement,
        _out: &mut dyn Collector,
    ) -> Result<()> {
        Ok(())
    }
}

/// The leading limit applies to a single select, so a paged compound select is rejected
pub(crate) fn leading_limit_body<V: SqlVisitor + ?Sized>(
    v: &V,
    ctx: &mut VisitContext,
    select: &sql::SelectStatement,
    out: &mut dyn Collector,
) -> Result<()> {
    if select.is_paged() && select.cores.len() > 1 {
        return Err(ctx.unsupported("LIMIT cannot page a compound select"));
    }

    ansi::select_body(v, ctx, select, out)
}

/// Emits `SELECT LIMIT <offset> <limit> [DISTINCT]`, shared with H2
pub(crate) fn leading_limit_head<V: SqlVisitor + ?Sized>(
    v: &V,
    ctx: &mut VisitContext,
    select: &sql::SelectStatement,
    core: &sql::SelectCore,
    out: &mut dyn Collector,
) -> Result<()> {
    out.push_sql("SELECT");

    if select.is_paged() {
        let zero = sql::RowCount::Literal(0);

        out.push_sql(" LIMIT ");
        v.visit_row_count(ctx, select.offset.as_ref().unwrap_or(&zero), out)?;
        out.push_sql(" ");
        v.visit_row_count(ctx, select.limit.as_ref().unwrap_or(&zero), out)?;
    }

    if core.distinct {
        out.push_sql(" DISTINCT");
    }

    Ok(())
}
