//! The ANSI baseline shared by every dialect.
//!
//! These back the default methods of [`SqlVisitor`]. Dialects which override a
//! method call back into here for the parts of the syntax they leave unchanged.

use itertools::Itertools;
use sqlbridge_core::{
    err::{bail, ensure, Result},
    sqlil as sql,
};

use crate::{Collector, QueryParam, SqlVisitor, VisitContext};

/// Quotes an identifier with double quotes, doubling any embedded quotes
pub fn quote_identifier(id: &str) -> String {
    format!("\"{}\"", id.replace('"', "\"\""))
}

/// Emits the list of expressions, separated by `sep`.
/// When `parens` is set each expression is wrapped in parentheses.
pub fn expr_list<V: SqlVisitor + ?Sized>(
    v: &V,
    ctx: &mut VisitContext,
    exprs: &[sql::Expr],
    sep: &str,
    parens: bool,
    out: &mut dyn Collector,
) -> Result<()> {
    for (idx, expr) in exprs.iter().enumerate() {
        if idx > 0 {
            out.push_sql(sep);
        }

        if parens {
            out.push_sql("(");
        }
        v.visit_expr(ctx, expr, out)?;
        if parens {
            out.push_sql(")");
        }
    }

    Ok(())
}

/// Emits the boolean conditions joined with AND, prefixed by the keyword
pub fn conditions<V: SqlVisitor + ?Sized>(
    v: &V,
    ctx: &mut VisitContext,
    keyword: &str,
    conds: &[sql::Expr],
    out: &mut dyn Collector,
) -> Result<()> {
    if conds.is_empty() {
        return Ok(());
    }

    out.push_sql(" ");
    out.push_sql(keyword);
    out.push_sql(" ");
    expr_list(v, ctx, conds, " AND ", true, out)
}

pub fn select_body<V: SqlVisitor + ?Sized>(
    v: &V,
    ctx: &mut VisitContext,
    select: &sql::SelectStatement,
    out: &mut dyn Collector,
) -> Result<()> {
    select_cores(v, ctx, select, out)?;
    v.visit_orders(ctx, &select.orders, out)?;
    v.visit_limit_offset(ctx, select, out)?;

    if let Some(lock) = &select.lock {
        v.visit_lock(ctx, lock, out)?;
    }

    Ok(())
}

pub fn select_cores<V: SqlVisitor + ?Sized>(
    v: &V,
    ctx: &mut VisitContext,
    select: &sql::SelectStatement,
    out: &mut dyn Collector,
) -> Result<()> {
    ensure!(
        !select.cores.is_empty(),
        "Select statement must have at least one core"
    );

    for (idx, core) in select.cores.iter().enumerate() {
        if idx > 0 {
            out.push_sql(" UNION ");
        }

        v.visit_select_core(ctx, select, core, out)?;
    }

    Ok(())
}

pub fn select_core<V: SqlVisitor + ?Sized>(
    v: &V,
    ctx: &mut VisitContext,
    select: &sql::SelectStatement,
    core: &sql::SelectCore,
    out: &mut dyn Collector,
) -> Result<()> {
    v.visit_select_head(ctx, select, core, out)?;
    out.push_sql(" ");
    projections(v, ctx, &core.projections, out)?;
    select_core_tail(v, ctx, core, out)
}

/// Emits the clauses following the projections: FROM, WHERE, GROUP BY and HAVING
pub fn select_core_tail<V: SqlVisitor + ?Sized>(
    v: &V,
    ctx: &mut VisitContext,
    core: &sql::SelectCore,
    out: &mut dyn Collector,
) -> Result<()> {
    out.push_sql(" FROM ");
    v.visit_join_source(ctx, &core.source, out)?;
    conditions(v, ctx, "WHERE", &core.wheres, out)?;

    if !core.groups.is_empty() {
        out.push_sql(" GROUP BY ");
        expr_list(v, ctx, &core.groups, ", ", false, out)?;
    }

    conditions(v, ctx, "HAVING", &core.havings, out)
}

pub fn select_head<V: SqlVisitor + ?Sized>(
    _v: &V,
    _ctx: &mut VisitContext,
    core: &sql::SelectCore,
    out: &mut dyn Collector,
) -> Result<()> {
    out.push_sql("SELECT");

    if core.distinct {
        out.push_sql(" DISTINCT");
    }

    Ok(())
}

pub fn projections<V: SqlVisitor + ?Sized>(
    v: &V,
    ctx: &mut VisitContext,
    projections: &[sql::Expr],
    out: &mut dyn Collector,
) -> Result<()> {
    if projections.is_empty() {
        out.push_sql("*");
        return Ok(());
    }

    expr_list(v, ctx, projections, ", ", false, out)
}

pub fn join_source<V: SqlVisitor + ?Sized>(
    v: &V,
    ctx: &mut VisitContext,
    source: &sql::JoinSource,
    out: &mut dyn Collector,
) -> Result<()> {
    v.visit_table_source(ctx, &source.left, out)?;

    for join in source.joins.iter() {
        out.push_sql(match join.r#type {
            sql::JoinType::Inner => " INNER JOIN ",
            sql::JoinType::Left => " LEFT JOIN ",
            sql::JoinType::Right => " RIGHT JOIN ",
            sql::JoinType::Full => " FULL JOIN ",
        });
        v.visit_table_source(ctx, &join.target, out)?;
        out.push_sql(" ON ");

        if join.conds.is_empty() {
            out.push_sql("1=1");
        } else {
            expr_list(v, ctx, &join.conds, " AND ", true, out)?;
        }
    }

    Ok(())
}

pub fn table_ref<V: SqlVisitor + ?Sized>(
    v: &V,
    table: &sql::TableRef,
    out: &mut dyn Collector,
) -> Result<()> {
    out.push_sql(&table_name(v, table));

    if let Some(alias) = &table.alias {
        out.push_sql(" AS ");
        out.push_sql(&v.quote_identifier(alias));
    }

    Ok(())
}

/// The quoted, schema-qualified name of the table, without its alias
pub fn table_name<V: SqlVisitor + ?Sized>(v: &V, table: &sql::TableRef) -> String {
    match &table.schema {
        Some(schema) => format!(
            "{}.{}",
            v.quote_identifier(schema),
            v.quote_identifier(&table.name)
        ),
        None => v.quote_identifier(&table.name),
    }
}

pub fn orders<V: SqlVisitor + ?Sized>(
    v: &V,
    ctx: &mut VisitContext,
    orders: &[sql::Ordering],
    out: &mut dyn Collector,
) -> Result<()> {
    if orders.is_empty() {
        return Ok(());
    }

    out.push_sql(" ORDER BY ");
    ordering_list(v, ctx, orders, out)
}

/// Emits the orderings without the ORDER BY keyword
pub fn ordering_list<V: SqlVisitor + ?Sized>(
    v: &V,
    ctx: &mut VisitContext,
    orders: &[sql::Ordering],
    out: &mut dyn Collector,
) -> Result<()> {
    for (idx, ordering) in orders.iter().enumerate() {
        if idx > 0 {
            out.push_sql(", ");
        }

        v.visit_expr(ctx, &ordering.expr, out)?;
        out.push_sql(if ordering.r#type.is_asc() {
            " ASC"
        } else {
            " DESC"
        });
    }

    Ok(())
}

/// Emits a trailing `LIMIT n OFFSET m`
pub fn limit_offset<V: SqlVisitor + ?Sized>(
    v: &V,
    ctx: &mut VisitContext,
    select: &sql::SelectStatement,
    out: &mut dyn Collector,
) -> Result<()> {
    if let Some(limit) = &select.limit {
        out.push_sql(" LIMIT ");
        v.visit_row_count(ctx, limit, out)?;
    }

    if let Some(offset) = &select.offset {
        out.push_sql(" OFFSET ");
        v.visit_row_count(ctx, offset, out)?;
    }

    Ok(())
}

/// Emits a trailing `OFFSET m ROWS FETCH FIRST n ROWS ONLY`
pub fn offset_fetch<V: SqlVisitor + ?Sized>(
    v: &V,
    ctx: &mut VisitContext,
    select: &sql::SelectStatement,
    out: &mut dyn Collector,
) -> Result<()> {
    if let Some(offset) = &select.offset {
        out.push_sql(" OFFSET ");
        v.visit_row_count(ctx, offset, out)?;
        out.push_sql(" ROWS");
    }

    if let Some(limit) = &select.limit {
        out.push_sql(" FETCH FIRST ");
        v.visit_row_count(ctx, limit, out)?;
        out.push_sql(" ROWS ONLY");
    }

    Ok(())
}

pub fn lock(lock: &sql::LockMode, out: &mut dyn Collector) -> Result<()> {
    match lock {
        sql::LockMode::ForUpdate => out.push_sql(" FOR UPDATE"),
        sql::LockMode::Custom(clause) => {
            out.push_sql(" ");
            out.push_sql(clause);
        }
    }

    Ok(())
}

pub fn row_count(rc: &sql::RowCount, out: &mut dyn Collector) -> Result<()> {
    match rc {
        sql::RowCount::Literal(n) => out.push_sql(&n.to_string()),
        sql::RowCount::Bind(p) => out.add_bind(QueryParam::Dynamic(p.clone())),
    }

    Ok(())
}

pub fn insert<V: SqlVisitor + ?Sized>(
    v: &V,
    ctx: &mut VisitContext,
    insert: &sql::InsertStatement,
    out: &mut dyn Collector,
) -> Result<()> {
    out.push_sql("INSERT INTO ");
    out.push_sql(&table_name(v, &insert.relation));

    if insert.columns.is_empty() {
        out.push_sql(" DEFAULT VALUES");
        return Ok(());
    }

    out.push_sql(" (");
    out.push_sql(
        &insert
            .columns
            .iter()
            .map(|(col, _)| v.quote_identifier(col))
            .join(", "),
    );
    out.push_sql(") VALUES (");
    for (idx, (_, expr)) in insert.columns.iter().enumerate() {
        if idx > 0 {
            out.push_sql(", ");
        }
        v.visit_expr(ctx, expr, out)?;
    }
    out.push_sql(")");

    Ok(())
}

pub fn update<V: SqlVisitor + ?Sized>(
    v: &V,
    ctx: &mut VisitContext,
    update: &sql::UpdateStatement,
    out: &mut dyn Collector,
) -> Result<()> {
    ensure!(
        !update.values.is_empty(),
        "Update statement must set at least one column"
    );

    out.push_sql("UPDATE ");
    out.push_sql(&table_name(v, &update.relation));
    out.push_sql(" SET ");

    for (idx, (col, expr)) in update.values.iter().enumerate() {
        if idx > 0 {
            out.push_sql(", ");
        }
        out.push_sql(&v.quote_identifier(col));
        out.push_sql(" = ");
        v.visit_expr(ctx, expr, out)?;
    }

    if !update.requires_subselect() {
        return conditions(v, ctx, "WHERE", &update.wheres, out);
    }

    let (key, subselect) = update_subselect(ctx, update)?;
    out.push_sql(" WHERE ");
    out.push_sql(&v.quote_identifier(&key));
    out.push_sql(" IN (");
    v.visit_select(ctx, &subselect, out)?;
    out.push_sql(")");

    Ok(())
}

/// Builds the keyed sub-select which restricts an ordered or limited update:
/// `SELECT key FROM table WHERE ... ORDER BY ... <limit>`
pub fn update_subselect(
    ctx: &VisitContext,
    update: &sql::UpdateStatement,
) -> Result<(String, sql::SelectStatement)> {
    let key = match &update.key {
        Some(key) => key.clone(),
        None => match ctx.primary_key(&update.relation.name)? {
            Some(key) => key,
            None => {
                return Err(ctx.unsupported(format!(
                    "Updating table \"{}\" with an ordering or limit requires a key column",
                    update.relation.name
                )))
            }
        },
    };

    let mut core = sql::SelectCore::new(update.relation.clone())
        .project(sql::Expr::col(update.relation.reference_name(), key.clone()));
    core.wheres = update.wheres.clone();

    let mut select = sql::SelectStatement::new(core);
    select.orders = update.orders.clone();
    select.limit = update.limit.clone();

    Ok((key, select))
}

pub fn delete<V: SqlVisitor + ?Sized>(
    v: &V,
    ctx: &mut VisitContext,
    delete: &sql::DeleteStatement,
    out: &mut dyn Collector,
) -> Result<()> {
    out.push_sql("DELETE FROM ");
    out.push_sql(&table_name(v, &delete.relation));
    conditions(v, ctx, "WHERE", &delete.wheres, out)
}

pub fn expr<V: SqlVisitor + ?Sized>(
    v: &V,
    ctx: &mut VisitContext,
    expr: &sql::Expr,
    out: &mut dyn Collector,
) -> Result<()> {
    match expr {
        sql::Expr::Column(col) => {
            if let Some(table) = &col.table {
                out.push_sql(&v.quote_identifier(table));
                out.push_sql(".");
            }
            out.push_sql(&v.quote_identifier(&col.name));
        }
        sql::Expr::Constant(c) => out.add_bind(QueryParam::Constant(c.value.clone())),
        sql::Expr::Parameter(p) => out.add_bind(QueryParam::Dynamic(p.clone())),
        sql::Expr::Literal(sql) => out.push_sql(sql),
        sql::Expr::Star => out.push_sql("*"),
        sql::Expr::Alias(a) => {
            v.visit_expr(ctx, &a.expr, out)?;
            out.push_sql(" AS ");
            out.push_sql(&v.quote_identifier(&a.alias));
        }
        sql::Expr::UnaryOp(op) => v.visit_unary_op(ctx, op, out)?,
        sql::Expr::BinaryOp(op) => v.visit_binary_op(ctx, op, out)?,
        sql::Expr::FunctionCall(call) => v.visit_function_call(ctx, call, out)?,
        sql::Expr::AggregateCall(call) => v.visit_aggregate_call(ctx, call, out)?,
    }

    Ok(())
}

/// Emits the expression wrapped in parentheses
pub fn nested<V: SqlVisitor + ?Sized>(
    v: &V,
    ctx: &mut VisitContext,
    expr: &sql::Expr,
    out: &mut dyn Collector,
) -> Result<()> {
    out.push_sql("(");
    v.visit_expr(ctx, expr, out)?;
    out.push_sql(")");
    Ok(())
}

pub fn unary_op<V: SqlVisitor + ?Sized>(
    v: &V,
    ctx: &mut VisitContext,
    op: &sql::UnaryOp,
    out: &mut dyn Collector,
) -> Result<()> {
    match op.r#type {
        sql::UnaryOpType::LogicalNot => {
            out.push_sql("NOT ");
            nested(v, ctx, &op.expr, out)
        }
        sql::UnaryOpType::Negate => {
            out.push_sql("-");
            nested(v, ctx, &op.expr, out)
        }
        sql::UnaryOpType::IsNull => {
            nested(v, ctx, &op.expr, out)?;
            out.push_sql(" IS NULL");
            Ok(())
        }
        sql::UnaryOpType::IsNotNull => {
            nested(v, ctx, &op.expr, out)?;
            out.push_sql(" IS NOT NULL");
            Ok(())
        }
    }
}

/// The infix operator of the binary op
pub fn binary_operator(r#type: sql::BinaryOpType) -> &'static str {
    match r#type {
        sql::BinaryOpType::Add => "+",
        sql::BinaryOpType::Subtract => "-",
        sql::BinaryOpType::Multiply => "*",
        sql::BinaryOpType::Divide => "/",
        sql::BinaryOpType::Modulo => "%",
        sql::BinaryOpType::LogicalAnd => "AND",
        sql::BinaryOpType::LogicalOr => "OR",
        sql::BinaryOpType::Concat => "||",
        sql::BinaryOpType::Like => "LIKE",
        sql::BinaryOpType::Equal => "=",
        sql::BinaryOpType::NotEqual => "!=",
        sql::BinaryOpType::GreaterThan => ">",
        sql::BinaryOpType::GreaterThanOrEqual => ">=",
        sql::BinaryOpType::LessThan => "<",
        sql::BinaryOpType::LessThanOrEqual => "<=",
    }
}

pub fn binary_op<V: SqlVisitor + ?Sized>(
    v: &V,
    ctx: &mut VisitContext,
    op: &sql::BinaryOp,
    out: &mut dyn Collector,
) -> Result<()> {
    nested(v, ctx, &op.left, out)?;
    out.push_sql(" ");
    out.push_sql(binary_operator(op.r#type));
    out.push_sql(" ");
    nested(v, ctx, &op.right, out)
}

/// Emits `NAME(arg1, arg2, ...)`
pub fn call<V: SqlVisitor + ?Sized>(
    v: &V,
    ctx: &mut VisitContext,
    name: &str,
    args: &[&sql::Expr],
    out: &mut dyn Collector,
) -> Result<()> {
    out.push_sql(name);
    out.push_sql("(");
    for (idx, arg) in args.iter().enumerate() {
        if idx > 0 {
            out.push_sql(", ");
        }
        v.visit_expr(ctx, arg, out)?;
    }
    out.push_sql(")");
    Ok(())
}

pub fn function_call<V: SqlVisitor + ?Sized>(
    v: &V,
    ctx: &mut VisitContext,
    func: &sql::FunctionCall,
    out: &mut dyn Collector,
) -> Result<()> {
    match func {
        sql::FunctionCall::Abs(arg) => call(v, ctx, "ABS", &[&**arg], out),
        sql::FunctionCall::Length(arg) => call(v, ctx, "LENGTH", &[&**arg], out),
        sql::FunctionCall::Uppercase(arg) => call(v, ctx, "UPPER", &[&**arg], out),
        sql::FunctionCall::Lowercase(arg) => call(v, ctx, "LOWER", &[&**arg], out),
        sql::FunctionCall::Coalesce(args) => {
            if args.is_empty() {
                bail!("COALESCE requires at least one argument");
            }

            call(v, ctx, "COALESCE", &args.iter().collect_vec(), out)
        }
        sql::FunctionCall::Now => {
            out.push_sql("CURRENT_TIMESTAMP");
            Ok(())
        }
    }
}

pub fn aggregate_call<V: SqlVisitor + ?Sized>(
    v: &V,
    ctx: &mut VisitContext,
    agg: &sql::AggregateCall,
    out: &mut dyn Collector,
) -> Result<()> {
    match agg {
        sql::AggregateCall::Count => {
            out.push_sql("COUNT(*)");
            Ok(())
        }
        sql::AggregateCall::CountDistinct(arg) => {
            out.push_sql("COUNT(DISTINCT ");
            v.visit_expr(ctx, arg, out)?;
            out.push_sql(")");
            Ok(())
        }
        sql::AggregateCall::Sum(arg) => call(v, ctx, "SUM", &[&**arg], out),
        sql::AggregateCall::Max(arg) => call(v, ctx, "MAX", &[&**arg], out),
        sql::AggregateCall::Min(arg) => call(v, ctx, "MIN", &[&**arg], out),
        sql::AggregateCall::Average(arg) => call(v, ctx, "AVG", &[&**arg], out),
    }
}

/// Replaces every projection of the statement's cores with a single expression.
/// Used to wrap counts around a paged select.
pub fn with_projection(select: &sql::SelectStatement, expr: sql::Expr) -> sql::SelectStatement {
    let mut select = select.clone();
    for core in select.cores.iter_mut() {
        core.projections = vec![expr.clone()];
    }
    select
}

/// Whether the row count is absent or a literal zero
pub fn is_absent_or_zero(rc: Option<&sql::RowCount>) -> bool {
    rc.map_or(true, |rc| rc.as_literal() == Some(0))
}

/// Emits `a + b`, folded into a single literal when both sides are literals
pub fn row_count_sum<V: SqlVisitor + ?Sized>(
    v: &V,
    ctx: &mut VisitContext,
    a: Option<&sql::RowCount>,
    b: &sql::RowCount,
    out: &mut dyn Collector,
) -> Result<()> {
    match (a, b) {
        (None, b) => v.visit_row_count(ctx, b, out),
        (Some(sql::RowCount::Literal(a)), sql::RowCount::Literal(b)) => {
            out.push_sql(&a.saturating_add(*b).to_string());
            Ok(())
        }
        (Some(a), b) => {
            out.push_sql("(");
            v.visit_row_count(ctx, a, out)?;
            out.push_sql(") + (");
            v.visit_row_count(ctx, b, out)?;
            out.push_sql(")");
            Ok(())
        }
    }
}
