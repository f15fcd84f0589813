use sqlbridge_core::{
    data::{chrono::NaiveDateTime, encode_hex, ArrayCodec, DataValue},
    err::Result,
    sqlil as sql,
};

use crate::{ansi, Collector, ConnectionMetadata, VisitContext};

/// Renders values as SQL literals for collectors which inline them
pub trait ValueQuoter {
    /// Whether the value may be inlined as a literal rather than bound
    fn can_inline(&self, value: &DataValue) -> bool {
        value.has_literal() && !matches!(value, DataValue::Binary(_))
    }

    fn quote_value(&self, meta: &dyn ConnectionMetadata, value: &DataValue) -> Result<String> {
        quote_value(self, meta, value)
    }

    fn quote_string(&self, value: &str) -> String {
        format!("'{}'", value.replace('\'', "''"))
    }

    fn quote_boolean(&self, _meta: &dyn ConnectionMetadata, value: bool) -> String {
        (if value { "TRUE" } else { "FALSE" }).into()
    }

    fn quote_binary(&self, value: &[u8]) -> String {
        format!("X'{}'", encode_hex(value))
    }

    fn quote_date_time(&self, value: &NaiveDateTime) -> String {
        self.quote_string(&value.format("%Y-%m-%d %H:%M:%S%.f").to_string())
    }

    fn quote_array(&self, meta: &dyn ConnectionMetadata, values: &[DataValue]) -> Result<String> {
        let codec = ArrayCodec::new(meta.array_delimiter());

        Ok(self.quote_string(&codec.encode(values)?))
    }
}

/// Dispatches the value to the type-specific quoting method
pub fn quote_value<Q: ValueQuoter + ?Sized>(
    quoter: &Q,
    meta: &dyn ConnectionMetadata,
    value: &DataValue,
) -> Result<String> {
    Ok(match value {
        DataValue::Null => "NULL".into(),
        DataValue::Utf8String(s) | DataValue::JSON(s) => quoter.quote_string(s),
        DataValue::Binary(b) => quoter.quote_binary(b),
        DataValue::Boolean(b) => quoter.quote_boolean(meta, *b),
        DataValue::Int16(_)
        | DataValue::Int32(_)
        | DataValue::Int64(_)
        | DataValue::Float64(_)
        | DataValue::Decimal(_) => value.to_text()?,
        DataValue::Date(_) | DataValue::Time(_) | DataValue::Uuid(_) => {
            quoter.quote_string(&value.to_text()?)
        }
        DataValue::DateTime(dt) => quoter.quote_date_time(dt),
        DataValue::Array(values) => quoter.quote_array(meta, values)?,
    })
}

/// Walks a statement tree, emitting SQL into a [`Collector`].
///
/// Every method defaults to the ANSI baseline in [`crate::ansi`], a dialect
/// overrides only the node kinds whose syntax differs.
pub trait SqlVisitor: ValueQuoter {
    /// The dialect name as used in errors and logs
    fn name(&self) -> &'static str;

    fn as_quoter(&self) -> &dyn ValueQuoter;

    fn quote_identifier(&self, id: &str) -> String {
        ansi::quote_identifier(id)
    }

    fn visit_query(
        &self,
        ctx: &mut VisitContext,
        query: &sql::Query,
        out: &mut dyn Collector,
    ) -> Result<()> {
        match query {
            sql::Query::Select(select) => self.visit_select(ctx, select, out),
            sql::Query::Insert(insert) => self.visit_insert(ctx, insert, out),
            sql::Query::Update(update) => self.visit_update(ctx, update, out),
            sql::Query::Delete(delete) => self.visit_delete(ctx, delete, out),
        }
    }

    /// Visits a select statement within its own lock scope
    fn visit_select(
        &self,
        ctx: &mut VisitContext,
        select: &sql::SelectStatement,
        out: &mut dyn Collector,
    ) -> Result<()> {
        ctx.with_lock(select.lock.as_ref(), |ctx| {
            self.visit_select_body(ctx, select, out)
        })
    }

    fn visit_select_body(
        &self,
        ctx: &mut VisitContext,
        select: &sql::SelectStatement,
        out: &mut dyn Collector,
    ) -> Result<()> {
        ansi::select_body(self, ctx, select, out)
    }

    fn visit_select_core(
        &self,
        ctx: &mut VisitContext,
        select: &sql::SelectStatement,
        core: &sql::SelectCore,
        out: &mut dyn Collector,
    ) -> Result<()> {
        ansi::select_core(self, ctx, select, core, out)
    }

    /// Emits the `SELECT` keyword and any modifiers preceding the projections
    fn visit_select_head(
        &self,
        ctx: &mut VisitContext,
        _select: &sql::SelectStatement,
        core: &sql::SelectCore,
        out: &mut dyn Collector,
    ) -> Result<()> {
        ansi::select_head(self, ctx, core, out)
    }

    fn visit_join_source(
        &self,
        ctx: &mut VisitContext,
        source: &sql::JoinSource,
        out: &mut dyn Collector,
    ) -> Result<()> {
        ansi::join_source(self, ctx, source, out)
    }

    /// Emits a table in a FROM or JOIN clause
    fn visit_table_source(
        &self,
        _ctx: &mut VisitContext,
        table: &sql::TableRef,
        out: &mut dyn Collector,
    ) -> Result<()> {
        ansi::table_ref(self, table, out)
    }

    fn visit_orders(
        &self,
        ctx: &mut VisitContext,
        orders: &[sql::Ordering],
        out: &mut dyn Collector,
    ) -> Result<()> {
        ansi::orders(self, ctx, orders, out)
    }

    /// Emits the paging clauses following the ordering
    fn visit_limit_offset(
        &self,
        ctx: &mut VisitContext,
        select: &sql::SelectStatement,
        out: &mut dyn Collector,
    ) -> Result<()> {
        ansi::limit_offset(self, ctx, select, out)
    }

    /// Emits the trailing row lock clause
    fn visit_lock(
        &self,
        _ctx: &mut VisitContext,
        lock: &sql::LockMode,
        out: &mut dyn Collector,
    ) -> Result<()> {
        ansi::lock(lock, out)
    }

    fn visit_row_count(
        &self,
        _ctx: &mut VisitContext,
        rc: &sql::RowCount,
        out: &mut dyn Collector,
    ) -> Result<()> {
        ansi::row_count(rc, out)
    }

    fn visit_insert(
        &self,
        ctx: &mut VisitContext,
        insert: &sql::InsertStatement,
        out: &mut dyn Collector,
    ) -> Result<()> {
        ansi::insert(self, ctx, insert, out)
    }

    fn visit_update(
        &self,
        ctx: &mut VisitContext,
        update: &sql::UpdateStatement,
        out: &mut dyn Collector,
    ) -> Result<()> {
        ansi::update(self, ctx, update, out)
    }

    fn visit_delete(
        &self,
        ctx: &mut VisitContext,
        delete: &sql::DeleteStatement,
        out: &mut dyn Collector,
    ) -> Result<()> {
        ansi::delete(self, ctx, delete, out)
    }

    fn visit_expr(
        &self,
        ctx: &mut VisitContext,
        expr: &sql::Expr,
        out: &mut dyn Collector,
    ) -> Result<()> {
        ansi::expr(self, ctx, expr, out)
    }

    fn visit_unary_op(
        &self,
        ctx: &mut VisitContext,
        op: &sql::UnaryOp,
        out: &mut dyn Collector,
    ) -> Result<()> {
        ansi::unary_op(self, ctx, op, out)
    }

    fn visit_binary_op(
        &self,
        ctx: &mut VisitContext,
        op: &sql::BinaryOp,
        out: &mut dyn Collector,
    ) -> Result<()> {
        ansi::binary_op(self, ctx, op, out)
    }

    fn visit_function_call(
        &self,
        ctx: &mut VisitContext,
        func: &sql::FunctionCall,
        out: &mut dyn Collector,
    ) -> Result<()> {
        ansi::function_call(self, ctx, func, out)
    }

    fn visit_aggregate_call(
        &self,
        ctx: &mut VisitContext,
        agg: &sql::AggregateCall,
        out: &mut dyn Collector,
    ) -> Result<()> {
        ansi::aggregate_call(self, ctx, agg, out)
    }
}
