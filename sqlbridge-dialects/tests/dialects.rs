use pretty_assertions::assert_eq;
use sqlbridge_core::{
    config::{parse_config, BridgeConfig},
    data::DataValue,
    err::DialectError,
    sqlil::{table, Expr, LockMode, Query, SelectCore, SelectStatement},
};
use sqlbridge_dialects::{
    BindCollector, Dialect, PlaceholderStyle, ProxyCollector, QueryParam, StaticMetadata,
};

mod common;

fn meta() -> StaticMetadata {
    StaticMetadata::new(common::documents_config())
}

fn titles() -> SelectCore {
    SelectCore::new(table("documents")).project(Expr::col("documents", "title"))
}

fn compile(dialect: Dialect, query: impl Into<Query>) -> String {
    dialect.compile(&meta(), &query.into()).unwrap().sql
}

#[test]
fn test_paging_across_dialects() {
    let select = SelectStatement::new(titles()).with_limit(10).with_offset(20);

    let cases = [
        (
            Dialect::Generic,
            r#"SELECT "documents"."title" FROM "documents" LIMIT 10 OFFSET 20"#,
        ),
        (
            Dialect::Db2,
            r#"SELECT B.* FROM (SELECT A.*, ROW_NUMBER() OVER () AS "internal$rownum" FROM (SELECT "documents"."title" FROM "documents") AS A) AS B WHERE B."internal$rownum" > 20 AND B."internal$rownum" <= 30"#,
        ),
        (
            Dialect::Derby,
            r#"SELECT "documents"."title" FROM "documents" OFFSET 20 ROWS FETCH FIRST 10 ROWS ONLY"#,
        ),
        (
            Dialect::Firebird,
            r#"SELECT FIRST 10 SKIP 20 "documents"."title" FROM "documents""#,
        ),
        (
            Dialect::Hsqldb,
            r#"SELECT LIMIT 20 10 "documents"."title" FROM "documents""#,
        ),
        (
            Dialect::H2,
            r#"SELECT LIMIT 20 10 "documents"."title" FROM "documents""#,
        ),
        (
            Dialect::SqlServer,
            "SELECT _t.* FROM (SELECT [documents].[title], ROW_NUMBER() OVER (ORDER BY [documents].[id] ASC) AS [_row_num] FROM [documents]) AS _t WHERE _t.[_row_num] BETWEEN 21 AND 30",
        ),
        (
            Dialect::SqlServerNg,
            "SELECT [documents].[title] FROM [documents] ORDER BY [documents].[id] ASC OFFSET 20 ROWS FETCH NEXT 10 ROWS ONLY",
        ),
    ];

    assert_eq!(cases.len(), Dialect::ALL.len());
    for (dialect, expected) in cases {
        assert_eq!(compile(dialect, select.clone()), expected, "{dialect}");
    }
}

#[test]
fn test_db2_modern_paging() {
    let mut conf = common::documents_config();
    conf.server_version = Some("11.5".parse().unwrap());
    let select = SelectStatement::new(titles()).with_limit(10).with_offset(20);

    let compiled = Dialect::Db2
        .compile(&StaticMetadata::new(conf), &select.into())
        .unwrap();

    assert_eq!(
        compiled.sql,
        r#"SELECT "documents"."title" FROM "documents" OFFSET 20 ROWS FETCH FIRST 10 ROWS ONLY"#
    );
}

#[test]
fn test_sqlserver_ng_orders_paging_by_primary_key() {
    let select = SelectStatement::new(titles()).with_limit(3).with_offset(6);

    let sql = compile(Dialect::SqlServerNg, select);

    assert!(sql.contains("ORDER BY [documents].[id] ASC"), "{sql}");
}

#[test]
fn test_count_of_limited_select_is_wrapped() {
    let select =
        SelectStatement::new(SelectCore::new(table("documents")).project(Expr::count())).with_limit(5);

    for dialect in [Dialect::SqlServer, Dialect::SqlServerNg] {
        let sql = compile(dialect, select.clone());

        assert!(
            sql.starts_with("SELECT COUNT(*) AS count_id FROM ("),
            "{dialect}: {sql}"
        );
        assert!(sql.ends_with(") AS subquery"), "{dialect}: {sql}");
    }
}

#[test]
fn test_sqlserver_lock_is_a_table_hint() {
    let select = SelectStatement::new(titles()).with_lock(LockMode::ForUpdate);

    for dialect in [Dialect::SqlServer, Dialect::SqlServerNg] {
        let sql = compile(dialect, select.clone());

        assert_eq!(
            sql,
            "SELECT [documents].[title] FROM [documents] WITH(ROWLOCK,UPDLOCK)"
        );
        assert!(!sql.contains("FOR UPDATE"));
    }
}

#[test]
fn test_failed_compile_does_not_leak_lock() {
    let locked = SelectStatement::new(titles())
        .with_offset(5)
        .with_lock(LockMode::ForUpdate);
    let err = Dialect::SqlServer
        .compile(&meta(), &locked.into())
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<DialectError>(),
        Some(DialectError::UnsupportedStatementShape { .. })
    ));

    let sql = compile(Dialect::SqlServer, SelectStatement::new(titles()));

    assert_eq!(sql, "SELECT [documents].[title] FROM [documents]");
}

#[test]
fn test_compile_query_from_json() {
    let query = Query::from_json(
        r#"
{
  "Select": {
    "cores": [
      {
        "projections": [{ "Column": { "table": "documents", "name": "title" } }],
        "source": { "left": { "name": "documents" } },
        "wheres": [
          {
            "BinaryOp": {
              "left": { "Column": { "table": "documents", "name": "id" } },
              "type": "Equal",
              "right": { "Constant": { "value": { "Int64": 7 } } }
            }
          }
        ]
      }
    ],
    "orders": [{ "type": "Asc", "expr": { "Column": { "table": "documents", "name": "title" } } }],
    "limit": { "Literal": 10 }
  }
}
"#,
    )
    .unwrap();

    let compiled = Dialect::Firebird.compile(&meta(), &query).unwrap();

    assert_eq!(
        compiled.sql,
        r#"SELECT FIRST 10 "documents"."title" FROM "documents" WHERE (("documents"."id") = (?)) ORDER BY "documents"."title" ASC"#
    );
    assert_eq!(compiled.params, vec![QueryParam::Constant(DataValue::Int64(7))]);
}

#[test]
fn test_dialect_from_config() {
    let conf = BridgeConfig::parse(
        parse_config(
            r#"
dialect: mssql_ng
prepared_statements: false
tables:
  - name: documents
    primary_key: id
    columns:
      - name: id
        type: Int64
"#,
        )
        .unwrap(),
    )
    .unwrap();
    let dialect: Dialect = conf.dialect.as_deref().unwrap().parse().unwrap();
    let meta = StaticMetadata::new(conf);
    let select = SelectStatement::new(
        SelectCore::new(table("documents"))
            .project(Expr::col("documents", "id"))
            .filter(Expr::equals(Expr::col("documents", "id"), Expr::constant(true))),
    )
    .with_limit(1);

    let compiled = dialect.compile(&meta, &select.into()).unwrap();

    assert_eq!(dialect, Dialect::SqlServerNg);
    assert_eq!(
        compiled.sql,
        "SELECT [documents].[id] FROM [documents] WHERE (([documents].[id]) = (1)) ORDER BY [documents].[id] ASC OFFSET 0 ROWS FETCH NEXT 1 ROWS ONLY"
    );
    assert!(compiled.params.is_empty());
}

#[test]
fn test_inlined_booleans_per_dialect() {
    let mut conf = common::documents_config();
    conf.prepared_statements = false;
    let meta = StaticMetadata::new(conf);
    let select = SelectStatement::new(titles().filter(Expr::constant(false)));

    let sqls = [Dialect::Generic, Dialect::Firebird, Dialect::SqlServer]
        .into_iter()
        .map(|d| d.compile(&meta, &select.clone().into()).unwrap().sql)
        .collect::<Vec<_>>();

    assert_eq!(
        sqls,
        vec![
            r#"SELECT "documents"."title" FROM "documents" WHERE (FALSE)"#.to_string(),
            r#"SELECT "documents"."title" FROM "documents" WHERE (0)"#.to_string(),
            "SELECT [documents].[title] FROM [documents] WHERE (0)".to_string(),
        ]
    );
}

#[test]
fn test_placeholder_styles() {
    let select = SelectStatement::new(
        titles()
            .filter(Expr::equals(Expr::col("documents", "id"), Expr::constant(1)))
            .filter(Expr::equals(Expr::col("documents", "title"), Expr::constant("x"))),
    );
    let query: Query = select.into();

    let numbered = Dialect::Generic
        .compile_with(&meta(), &query, &mut BindCollector::new(PlaceholderStyle::Numbered))
        .unwrap();
    let named = Dialect::Generic
        .compile_with(&meta(), &query, &mut BindCollector::new(PlaceholderStyle::Named))
        .unwrap();

    assert_eq!(
        numbered.sql,
        r#"SELECT "documents"."title" FROM "documents" WHERE (("documents"."id") = ($1)) AND (("documents"."title") = ($2))"#
    );
    assert_eq!(
        named.sql,
        r#"SELECT "documents"."title" FROM "documents" WHERE (("documents"."id") = (:p1)) AND (("documents"."title") = (:p2))"#
    );
    assert_eq!(numbered.params, named.params);
}

#[test]
fn test_proxy_collector_wraps_compiled_sql() {
    let mut out = ProxyCollector::new(BindCollector::default(), |sql| format!("EXPLAIN {sql}"));

    let compiled = Dialect::H2
        .compile_with(&meta(), &SelectStatement::new(titles()).into(), &mut out)
        .unwrap();

    assert_eq!(
        compiled.sql,
        r#"EXPLAIN SELECT "documents"."title" FROM "documents""#
    );
}
