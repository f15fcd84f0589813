mod db2;
mod derby;
mod firebird;
mod generic;
mod h2;
mod hsqldb;
mod mssql;
mod mssql_ng;

pub use db2::*;
pub use derby::*;
pub use firebird::*;
pub use generic::*;
pub use h2::*;
pub use hsqldb::*;
pub use mssql::*;
pub use mssql_ng::*;

#[cfg(test)]
pub(crate) mod test_util {
    use sqlbridge_core::{
        config::{BridgeConfig, ColumnConfig, TableConfig},
        data::DataType,
        sqlil::{self as sql, table, Expr, SelectCore},
    };

    use crate::{CompiledQuery, Dialect, StaticMetadata};

    /// Metadata where "users" has primary key "id" and "logs" has none
    pub fn meta(version: Option<&str>) -> StaticMetadata {
        StaticMetadata::new(BridgeConfig {
            server_version: version.map(|v| v.parse().unwrap()),
            tables: vec![
                TableConfig::new(
                    "users",
                    Some("id"),
                    vec![
                        ColumnConfig::new("id", DataType::Int64),
                        ColumnConfig::new("name", DataType::rust_string()),
                    ],
                ),
                TableConfig::new("logs", None, vec![]),
            ],
            ..Default::default()
        })
    }

    pub fn inlined(version: Option<&str>) -> StaticMetadata {
        let mut conf = meta(version).config().clone();
        conf.prepared_statements = false;
        StaticMetadata::new(conf)
    }

    pub fn users() -> SelectCore {
        SelectCore::new(table("users")).project(Expr::col("users", "name"))
    }

    pub fn compile(
        dialect: Dialect,
        meta: &StaticMetadata,
        query: impl Into<sql::Query>,
    ) -> CompiledQuery {
        dialect.compile(meta, &query.into()).unwrap()
    }

    pub fn compile_err(
        dialect: Dialect,
        meta: &StaticMetadata,
        query: impl Into<sql::Query>,
    ) -> sqlbridge_core::err::Error {
        dialect.compile(meta, &query.into()).unwrap_err()
    }
}
