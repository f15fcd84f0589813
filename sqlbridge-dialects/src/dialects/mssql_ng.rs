use sqlbridge_core::{
    data::{chrono::NaiveDateTime, DataValue},
    err::Result,
    sqlil as sql,
};

use super::mssql::{self, SqlServerVisitor};
use crate::{ansi, Collector, ConnectionMetadata, SqlVisitor, ValueQuoter, VisitContext};

/// SQL Server 2012 onwards, paging with `OFFSET m ROWS FETCH NEXT n ROWS ONLY`.
///
/// OFFSET requires an ORDER BY, so a paged select without an explicit ordering is
/// ordered by its grouping, its distinct columns or the primary key of its driving
/// table. Without any of those the rows are ordered by `(SELECT NULL)`, satisfying
/// the syntax without any guarantee of a stable order between pages.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqlServerNgVisitor;

impl ValueQuoter for SqlServerNgVisitor {
    fn quote_string(&self, value: &str) -> String {
        SqlServerVisitor.quote_string(value)
    }

    fn quote_boolean(&self, meta: &dyn ConnectionMetadata, value: bool) -> String {
        SqlServerVisitor.quote_boolean(meta, value)
    }

    fn quote_binary(&self, value: &[u8]) -> String {
        SqlServerVisitor.quote_binary(value)
    }

    fn quote_date_time(&self, value: &NaiveDateTime) -> String {
        SqlServerVisitor.quote_date_time(value)
    }

    fn quote_array(&self, meta: &dyn ConnectionMetadata, values: &[DataValue]) -> Result<String> {
        SqlServerVisitor.quote_array(meta, values)
    }
}

impl SqlVisitor for SqlServerNgVisitor {
    fn name(&self) -> &'static str {
        "sqlserver_ng"
    }

    fn as_quoter(&self) -> &dyn ValueQuoter {
        self
    }

    fn quote_identifier(&self, id: &str) -> String {
        mssql::quote_identifier(id)
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

        if select.is_count() {
            return mssql::count_of_paged(self, ctx, select, out);
        }

        ansi::select_cores(self, ctx, select, out)?;

        if !select.orders.is_empty() {
            self.visit_orders(ctx, &select.orders, out)?;
        } else if let Some(core) = select.first_core() {
            out.push_sql(" ");
            mssql::implicit_order(self, ctx, select, core, out)?;
        }

        self.visit_limit_offset(ctx, select, out)
    }

    fn visit_table_source(
        &self,
        ctx: &mut VisitContext,
        table: &sql::TableRef,
        out: &mut dyn Collector,
    ) -> Result<()> {
        mssql::table_source(self, ctx, table, out)
    }

    fn visit_limit_offset(
        &self,
        ctx: &mut VisitContext,
        select: &sql::SelectStatement,
        out: &mut dyn Collector,
    ) -> Result<()> {
        if !select.is_paged() {
            return Ok(());
        }

        out.push_sql(" OFFSET ");
        match &select.offset {
            Some(offset) => self.visit_row_count(ctx, offset, out)?,
            None => out.push_sql("0"),
        }
        out.push_sql(" ROWS");

        if let Some(limit) = &select.limit {
            out.push_sql(" FETCH NEXT ");
            self.visit_row_count(ctx, limit, out)?;
            out.push_sql(" ROWS ONLY");
        }

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
        mssql::update(self, ctx, update, out)
    }

    fn visit_binary_op(
        &self,
        ctx: &mut VisitContext,
        op: &sql::BinaryOp,
        out: &mut dyn Collector,
    ) -> Result<()> {
        mssql::binary_op(self, ctx, op, out)
    }

    fn visit_function_call(
        &self,
        ctx: &mut VisitContext,
        func: &sql::FunctionCall,
        out: &mut dyn Collector,
    ) -> Result<()> {
        mssql::function_call(self, ctx, func, out)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serial_test::serial;
    use sqlbridge_core::{
        data::chrono::{NaiveDate, NaiveTime},
        sqlil::*,
    };

    use super::*;
    use crate::{dialects::test_util::*, Dialect};

    #[test]
    fn test_mssql_ng_synthesizes_primary_key_order() {
        let select = SelectStatement::new(users()).with_limit(10).with_offset(20);

        let compiled = compile(Dialect::SqlServerNg, &meta(None), select);

        assert_eq!(
            compiled.sql,
            "SELECT [users].[name] FROM [users] ORDER BY [users].[id] ASC OFFSET 20 ROWS FETCH NEXT 10 ROWS ONLY"
        );
    }

    #[test]
    fn test_mssql_ng_aliased_table_order() {
        let core = SelectCore::new(table("users").with_alias("u")).project(Expr::col("u", "name"));
        let select = SelectStatement::new(core).with_limit(1);

        let compiled = compile(Dialect::SqlServerNg, &meta(None), select);

        assert_eq!(
            compiled.sql,
            "SELECT [u].[name] FROM [users] AS [u] ORDER BY [u].[id] ASC OFFSET 0 ROWS FETCH NEXT 1 ROWS ONLY"
        );
    }

    #[test]
    fn test_mssql_ng_explicit_order_offset_only() {
        let select = SelectStatement::new(users())
            .order_by(Ordering::desc(Expr::col("users", "name")))
            .with_offset(5);

        let compiled = compile(Dialect::SqlServerNg, &meta(None), select);

        assert_eq!(
            compiled.sql,
            "SELECT [users].[name] FROM [users] ORDER BY [users].[name] DESC OFFSET 5 ROWS"
        );
    }

    #[test]
    #[serial]
    fn test_mssql_ng_without_primary_key() {
        let core = SelectCore::new(table("logs")).project(Expr::col("logs", "msg"));
        let select = SelectStatement::new(core).with_limit(5);

        let compiled = compile(Dialect::SqlServerNg, &meta(None), select);

        assert_eq!(
            compiled.sql,
            "SELECT [logs].[msg] FROM [logs] ORDER BY (SELECT NULL) OFFSET 0 ROWS FETCH NEXT 5 ROWS ONLY"
        );
    }

    #[test]
    fn test_mssql_ng_unpaged_has_no_order() {
        let compiled = compile(
            Dialect::SqlServerNg,
            &meta(None),
            SelectStatement::new(users()),
        );

        assert_eq!(compiled.sql, "SELECT [users].[name] FROM [users]");
    }

    #[test]
    fn test_mssql_ng_count_with_limit() {
        let select =
            SelectStatement::new(SelectCore::new(table("users")).project(Expr::count())).with_limit(5);

        let compiled = compile(Dialect::SqlServerNg, &meta(None), select);

        assert_eq!(
            compiled.sql,
            "SELECT COUNT(*) AS count_id FROM (SELECT 1 AS [_one] FROM [users] ORDER BY [users].[id] ASC OFFSET 0 ROWS FETCH NEXT 5 ROWS ONLY) AS subquery"
        );
    }

    #[test]
    fn test_mssql_ng_grouped_orders_by_group() {
        let core = users().group_by(Expr::col("users", "name"));
        let select = SelectStatement::new(core).with_limit(5);

        let compiled = compile(Dialect::SqlServerNg, &meta(None), select);

        assert_eq!(
            compiled.sql,
            "SELECT [users].[name] FROM [users] GROUP BY [users].[name] ORDER BY [users].[name] OFFSET 0 ROWS FETCH NEXT 5 ROWS ONLY"
        );
    }

    #[test]
    fn test_mssql_ng_distinct_orders_by_projection() {
        let mut core = users();
        core.distinct = true;
        let select = SelectStatement::new(core).with_limit(5).with_offset(10);

        let compiled = compile(Dialect::SqlServerNg, &meta(None), select);

        assert_eq!(
            compiled.sql,
            "SELECT DISTINCT [users].[name] FROM [users] ORDER BY [users].[name] ASC OFFSET 10 ROWS FETCH NEXT 5 ROWS ONLY"
        );
    }

    #[test]
    fn test_mssql_ng_count_distinct_with_limit() {
        let core = SelectCore::new(table("users")).project(Expr::AggregateCall(
            AggregateCall::CountDistinct(Box::new(Expr::col("users", "name"))),
        ));
        let select = SelectStatement::new(core).with_limit(5);

        let compiled = compile(Dialect::SqlServerNg, &meta(None), select);

        assert_eq!(
            compiled.sql,
            "SELECT COUNT(*) AS count_id FROM (SELECT DISTINCT [users].[name] AS [_value] FROM [users] ORDER BY [users].[name] ASC OFFSET 0 ROWS FETCH NEXT 5 ROWS ONLY) AS subquery"
        );
    }

    #[test]
    #[serial]
    fn test_mssql_ng_distinct_without_columns() {
        let mut core = SelectCore::new(table("users")).project(Expr::literal("1"));
        core.distinct = true;
        let select = SelectStatement::new(core).with_limit(5);

        let compiled = compile(Dialect::SqlServerNg, &meta(None), select);

        assert_eq!(
            compiled.sql,
            "SELECT DISTINCT 1 FROM [users] ORDER BY (SELECT NULL) OFFSET 0 ROWS FETCH NEXT 5 ROWS ONLY"
        );
    }

    #[test]
    fn test_mssql_ng_paged_lock() {
        let select = SelectStatement::new(users())
            .with_limit(1)
            .with_lock(LockMode::ForUpdate);

        let compiled = compile(Dialect::SqlServerNg, &meta(None), select);

        assert_eq!(
            compiled.sql,
            "SELECT [users].[name] FROM [users] WITH(ROWLOCK,UPDLOCK) ORDER BY [users].[id] ASC OFFSET 0 ROWS FETCH NEXT 1 ROWS ONLY"
        );
    }

    #[test]
    fn test_mssql_ng_update_with_order_and_limit() {
        let mut update = UpdateStatement::new(table("users")).set("name", Expr::constant("a"));
        update.orders.push(Ordering::asc(Expr::col("users", "name")));
        update.limit = Some(RowCount::Literal(2));

        let compiled = compile(Dialect::SqlServerNg, &meta(None), update);

        assert_eq!(
            compiled.sql,
            "UPDATE [users] SET [name] = ? WHERE [id] IN (SELECT [users].[id] FROM [users] ORDER BY [users].[name] ASC OFFSET 0 ROWS FETCH NEXT 2 ROWS ONLY)"
        );
    }

    #[test]
    fn test_mssql_ng_date_time_literal() {
        let insert = InsertStatement::new(table("t")).value(
            "at",
            Expr::constant(DataValue::DateTime(NaiveDateTime::new(
                NaiveDate::from_ymd_opt(2012, 4, 1).unwrap(),
                NaiveTime::from_hms_milli_opt(10, 20, 30, 5).unwrap(),
            ))),
        );

        let compiled = compile(Dialect::SqlServerNg, &inlined(None), insert);

        assert_eq!(
            compiled.sql,
            "INSERT INTO [t] ([at]) VALUES ('2012-04-01T10:20:30.005')"
        );
    }
}
