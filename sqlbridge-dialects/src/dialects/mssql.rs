use itertools::Itertools;
use sqlbridge_core::{
    data::{chrono::NaiveDateTime, encode_hex, DataValue},
    err::{bail, Context, DialectError, Result},
    sqlil as sql,
};
use sqlbridge_logging::warn_once;

use crate::{ansi, Collector, ConnectionMetadata, SqlVisitor, ValueQuoter, VisitContext};

/// SQL Server prior to 2012.
///
/// A limit is applied with `SELECT TOP (n)`, an offset by numbering the rows with
/// `ROW_NUMBER()` in a derived table and filtering on the row number.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqlServerVisitor;

impl SqlServerVisitor {
    fn row_number_paging(
        &self,
        ctx: &mut VisitContext,
        select: &sql::SelectStatement,
        limit: &sql::RowCount,
        offset: &sql::RowCount,
        out: &mut dyn Collector,
    ) -> Result<()> {
        let core = select
            .first_core()
            .context("Select statement must have at least one core")?;

        out.push_sql("SELECT _t.* FROM (");
        ansi::select_head(self, ctx, core, out)?;
        out.push_sql(" ");
        ansi::projections(self, ctx, &core.projections, out)?;
        out.push_sql(", ROW_NUMBER() OVER (");
        self.row_number_order(ctx, select, core, out)?;
        out.push_sql(") AS [_row_num]");
        ansi::select_core_tail(self, ctx, core, out)?;
        out.push_sql(") AS _t WHERE _t.[_row_num] BETWEEN ");
        ansi::row_count_sum(self, ctx, Some(offset), &sql::RowCount::Literal(1), out)?;
        out.push_sql(" AND ");
        ansi::row_count_sum(self, ctx, Some(offset), limit, out)
    }

    fn row_number_order(
        &self,
        ctx: &mut VisitContext,
        select: &sql::SelectStatement,
        core: &sql::SelectCore,
        out: &mut dyn Collector,
    ) -> Result<()> {
        if !select.orders.is_empty() {
            out.push_sql("ORDER BY ");
            return ansi::ordering_list(self, ctx, &select.orders, out);
        }

        implicit_order(self, ctx, select, core, out)
    }
}

impl ValueQuoter for SqlServerVisitor {
    fn quote_string(&self, value: &str) -> String {
        format!("N'{}'", value.replace('\'', "''"))
    }

    fn quote_boolean(&self, _: &dyn ConnectionMetadata, value: bool) -> String {
        (if value { "1" } else { "0" }).into()
    }

    fn quote_binary(&self, value: &[u8]) -> String {
        format!("0x{}", encode_hex(value))
    }

    fn quote_date_time(&self, value: &NaiveDateTime) -> String {
        format!("'{}'", value.format("%Y-%m-%dT%H:%M:%S%.3f"))
    }

    fn quote_array(&self, _: &dyn ConnectionMetadata, _: &[DataValue]) -> Result<String> {
        bail!(DialectError::unsupported(self.name(), "array values"))
    }
}

impl SqlVisitor for SqlServerVisitor {
    fn name(&self) -> &'static str {
        "sqlserver"
    }

    fn as_quoter(&self) -> &dyn ValueQuoter {
        self
    }

    fn quote_identifier(&self, id: &str) -> String {
        quote_identifier(id)
    }

    fn visit_select_body(
        &self,
        ctx: &mut VisitContext,
        select: &sql::SelectStatement,
        out: &mut dyn Collector,
    ) -> Result<()> {
        if !select.is_paged() {
            return ansi::select_body(self, ctx, select, out);
        }

        let limit = match &select.limit {
            Some(limit) => limit,
            None => return Err(ctx.unsupported("An offset requires a limit before SQL Server 2012")),
        };

        if select.cores.len() > 1 {
            return Err(ctx.unsupported("TOP cannot page a compound select"));
        }

        if select.is_count() {
            return count_of_paged(self, ctx, select, out);
        }

        match &select.offset {
            Some(offset) if !ansi::is_absent_or_zero(Some(offset)) => {
                self.row_number_paging(ctx, select, limit, offset, out)
            }
            _ => ansi::select_body(self, ctx, select, out),
        }
    }

    fn visit_select_head(
        &self,
        ctx: &mut VisitContext,
        select: &sql::SelectStatement,
        core: &sql::SelectCore,
        out: &mut dyn Collector,
    ) -> Result<()> {
        ansi::select_head(self, ctx, core, out)?;

        if let Some(limit) = &select.limit {
            if ansi::is_absent_or_zero(select.offset.as_ref()) {
                out.push_sql(" TOP (");
                self.visit_row_count(ctx, limit, out)?;
                out.push_sql(")");
            }
        }

        Ok(())
    }

    fn visit_table_source(
        &self,
        ctx: &mut VisitContext,
        table: &sql::TableRef,
        out: &mut dyn Collector,
    ) -> Result<()> {
        table_source(self, ctx, table, out)
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
        _lock: &sql::LockMode,
        _out: &mut dyn Collector,
    ) -> Result<()> {
        Ok(())
    }

    fn visit_update(
        &self,
        ctx: &mut VisitContext,
        update: &sql::UpdateStatement,
        out: &mut dyn Collector,
    ) -> Result<()> {
        self::update(self, ctx, update, out)
    }

    fn visit_binary_op(
        &self,
        ctx: &mut VisitContext,
        op: &sql::BinaryOp,
        out: &mut dyn Collector,
    ) -> Result<()> {
        binary_op(self, ctx, op, out)
    }

    fn visit_function_call(
        &self,
        ctx: &mut VisitContext,
        func: &sql::FunctionCall,
        out: &mut dyn Collector,
    ) -> Result<()> {
        function_call(self, ctx, func, out)
    }
}

pub(crate) fn quote_identifier(id: &str) -> String {
    format!("[{}]", id.replace(']', "]]"))
}

/// Emits the table followed by the row lock hint of the enclosing select
pub(crate) fn table_source<V: SqlVisitor + ?Sized>(
    v: &V,
    ctx: &mut VisitContext,
    table: &sql::TableRef,
    out: &mut dyn Collector,
) -> Result<()> {
    ansi::table_ref(v, table, out)?;

    match ctx.current_lock() {
        Some(sql::LockMode::ForUpdate) => out.push_sql(" WITH(ROWLOCK,UPDLOCK)"),
        Some(sql::LockMode::Custom(hint)) => {
            out.push_sql(" ");
            out.push_sql(hint);
        }
        None => {}
    }

    Ok(())
}

/// An ordered sub-select requires a row limit, so an ordered update without one
/// is given the largest possible limit
pub(crate) fn update<V: SqlVisitor + ?Sized>(
    v: &V,
    ctx: &mut VisitContext,
    update: &sql::UpdateStatement,
    out: &mut dyn Collector,
) -> Result<()> {
    if !update.orders.is_empty() && update.limit.is_none() {
        let mut update = update.clone();
        update.limit = Some(sql::RowCount::Literal(i64::MAX as u64));
        return ansi::update(v, ctx, &update, out);
    }

    ansi::update(v, ctx, update, out)
}

/// Counts the rows of a paged select: `SELECT COUNT(*) AS count_id FROM (...) AS subquery`.
///
/// A `COUNT(DISTINCT x)` pages the distinct values of `x` instead.
pub(crate) fn count_of_paged<V: SqlVisitor + ?Sized>(
    v: &V,
    ctx: &mut VisitContext,
    select: &sql::SelectStatement,
    out: &mut dyn Collector,
) -> Result<()> {
    let counted = select
        .first_core()
        .and_then(|core| core.projections.first())
        .map(|p| p.unaliased());

    let inner = match counted {
        Some(sql::Expr::AggregateCall(sql::AggregateCall::CountDistinct(expr))) => {
            let mut inner = ansi::with_projection(select, (**expr).clone().alias("_value"));
            for core in inner.cores.iter_mut() {
                core.distinct = true;
            }
            inner
        }
        _ => ansi::with_projection(select, sql::Expr::literal("1").alias("_one")),
    };

    out.push_sql("SELECT COUNT(*) AS count_id FROM (");
    v.visit_select_body(ctx, &inner, out)?;
    out.push_sql(") AS subquery");

    Ok(())
}

/// Emits the ordering required by a paged select that has none of its own.
///
/// Grouped rows are ordered by the grouping and distinct rows by their projected
/// columns, as both reject an ordering on anything outside of those. Otherwise the
/// primary key of the driving table is used, falling back to `(SELECT NULL)`.
pub(crate) fn implicit_order<V: SqlVisitor + ?Sized>(
    v: &V,
    ctx: &mut VisitContext,
    select: &sql::SelectStatement,
    core: &sql::SelectCore,
    out: &mut dyn Collector,
) -> Result<()> {
    if !core.groups.is_empty() {
        out.push_sql("ORDER BY ");
        return ansi::expr_list(v, ctx, &core.groups, ", ", false, out);
    }

    let order = if core.distinct {
        core.projections
            .iter()
            .map(|p| p.unaliased())
            .filter(|p| p.as_column().is_some())
            .map(|p| sql::Ordering::asc(p.clone()))
            .collect_vec()
    } else {
        primary_key_order(ctx, select)?.into_iter().collect_vec()
    };

    if order.is_empty() {
        warn_unordered(select);
        out.push_sql("ORDER BY (SELECT NULL)");
        return Ok(());
    }

    out.push_sql("ORDER BY ");
    ansi::ordering_list(v, ctx, &order, out)
}

/// Orders by the primary key of the driving table, if it has one
pub(crate) fn primary_key_order(
    ctx: &VisitContext,
    select: &sql::SelectStatement,
) -> Result<Option<sql::Ordering>> {
    let table = match select.first_core() {
        Some(core) => &core.source.left,
        None => return Ok(None),
    };

    Ok(ctx
        .primary_key(&table.name)?
        .map(|pk| sql::Ordering::asc(sql::Expr::col(table.reference_name(), pk))))
}

pub(crate) fn warn_unordered(select: &sql::SelectStatement) {
    let table = select
        .first_core()
        .map(|c| c.source.left.name.as_str())
        .unwrap_or_default();

    warn_once(format!(
        "Paging rows of table \"{table}\" without an ordering or primary key, the page contents are not deterministic"
    ));
}

pub(crate) fn binary_op<V: SqlVisitor + ?Sized>(
    v: &V,
    ctx: &mut VisitContext,
    op: &sql::BinaryOp,
    out: &mut dyn Collector,
) -> Result<()> {
    match op.r#type {
        sql::BinaryOpType::Concat => ansi::call(v, ctx, "CONCAT", &[&*op.left, &*op.right], out),
        _ => ansi::binary_op(v, ctx, op, out),
    }
}

pub(crate) fn function_call<V: SqlVisitor + ?Sized>(
    v: &V,
    ctx: &mut VisitContext,
    func: &sql::FunctionCall,
    out: &mut dyn Collector,
) -> Result<()> {
    match func {
        sql::FunctionCall::Length(arg) => ansi::call(v, ctx, "LEN", &[&**arg], out),
        sql::FunctionCall::Now => {
            out.push_sql("SYSDATETIME()");
            Ok(())
        }
        _ => ansi::function_call(v, ctx, func, out),
    }
}
