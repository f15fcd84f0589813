use sqlbridge_core::{
    data::DataValue,
    err::{bail, DialectError, Result},
    sqlil as sql,
};

use crate::{ansi, Collector, ConnectionMetadata, SqlVisitor, ValueQuoter, VisitContext};

/// Apache Derby, paging with `OFFSET m ROWS FETCH FIRST n ROWS ONLY`
#[derive(Debug, Clone, Copy, Default)]
pub struct DerbyVisitor;

impl ValueQuoter for DerbyVisitor {
    fn can_inline(&self, value: &DataValue) -> bool {
        value.has_literal() && !value.is_large_object()
    }

    /// BOOLEAN columns were introduced in 10.7
    fn quote_boolean(&self, meta: &dyn ConnectionMetadata, value: bool) -> String {
        let native = meta
            .server_version()
            .map(|v| v.at_least(10, 7))
            .unwrap_or(true);

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

impl SqlVisitor for DerbyVisitor {
    fn name(&self) -> &'static str {
        "derby"
    }

    fn as_quoter(&self) -> &dyn ValueQuoter {
        self
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

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use sqlbridge_core::sqlil::*;

    use super::*;
    use crate::{dialects::test_util::*, Dialect};

    #[test]
    fn test_derby_limit_offset() {
        let select = SelectStatement::new(users())
            .order_by(Ordering::asc(Expr::col("users", "name")))
            .with_limit(10)
            .with_offset(5);

        let compiled = compile(Dialect::Derby, &meta(None), select);

        assert_eq!(
            compiled.sql,
            r#"SELECT "users"."name" FROM "users" ORDER BY "users"."name" ASC OFFSET 5 ROWS FETCH FIRST 10 ROWS ONLY"#
        );
    }

    #[test]
    fn test_derby_limit_only_with_lock() {
        let select = SelectStatement::new(users())
            .with_limit(1)
            .with_lock(LockMode::ForUpdate);

        let compiled = compile(Dialect::Derby, &meta(None), select);

        assert_eq!(
            compiled.sql,
            r#"SELECT "users"."name" FROM "users" FETCH FIRST 1 ROWS ONLY FOR UPDATE"#
        );
    }

    #[test]
    fn test_derby_offset_only() {
        let compiled = compile(
            Dialect::Derby,
            &meta(None),
            SelectStatement::new(users()).with_offset(3),
        );

        assert_eq!(
            compiled.sql,
            r#"SELECT "users"."name" FROM "users" OFFSET 3 ROWS"#
        );
    }

    #[test]
    fn test_derby_booleans_by_version() {
        let insert = InsertStatement::new(table("t")).value("b", Expr::constant(true));

        assert_eq!(
            compile(Dialect::Derby, &inlined(Some("10.14.2")), insert.clone()).sql,
            r#"INSERT INTO "t" ("b") VALUES (TRUE)"#
        );
        assert_eq!(
            compile(Dialect::Derby, &inlined(Some("10.5")), insert).sql,
            r#"INSERT INTO "t" ("b") VALUES (1)"#
        );
    }

    #[test]
    fn test_derby_large_objects_stay_bound() {
        let insert = InsertStatement::new(table("t"))
            .value("id", Expr::constant(1))
            .value("body", Expr::constant("text"));

        let compiled = compile(Dialect::Derby, &inlined(None), insert);

        assert_eq!(compiled.sql, r#"INSERT INTO "t" ("id", "body") VALUES (1, ?)"#);
        assert_eq!(compiled.params.len(), 1);
    }

    #[test]
    fn test_derby_array_unsupported() {
        let insert = InsertStatement::new(table("t"))
            .value("a", Expr::constant(DataValue::Array(vec![DataValue::Int32(1)])));

        let err = compile_err(Dialect::Derby, &inlined(None), insert);

        assert_eq!(
            err.downcast_ref::<DialectError>(),
            Some(&DialectError::unsupported("derby", "array values"))
        );
    }
}
