use std::collections::HashSet;

use itertools::Itertools;
use sqlbridge_core::{
    data::DataValue,
    err::{anyhow, bail, Context, DialectError, Result},
    sqlil as sql,
};
use sqlbridge_logging::{debug, warn};

use crate::{BindCollector, Connection, Dialect, PlaceholderStyle};

/// Inserts the row, writing large object values in separate statements for the
/// dialects which defer them. Returns the generated key of the row, if any.
///
/// The row is first inserted with its large object columns set to NULL, then
/// each value is written by key within the same transaction.
pub fn insert_with_large_objects<C: Connection>(
    conn: &mut C,
    dialect: Dialect,
    insert: &sql::InsertStatement,
) -> Result<Option<DataValue>> {
    let deferred = if dialect.defers_large_objects() {
        let columns = large_object_columns(conn, &insert.relation.name)?;
        insert
            .columns
            .iter()
            .filter_map(|(col, expr)| deferrable(&columns, col, expr))
            .collect_vec()
    } else {
        vec![]
    };

    if deferred.is_empty() {
        let query = dialect.compile(&*conn, &insert.clone().into())?;
        return conn.execute_insert(&query);
    }

    let pk = require_primary_key(conn, dialect, &insert.relation)?;
    let mut row = insert.clone();
    for (col, expr) in row.columns.iter_mut() {
        if deferred.iter().any(|(c, _)| c == col) {
            *expr = sql::Expr::constant(DataValue::Null);
        }
    }

    debug!(
        "Deferring {} large object values of table \"{}\"",
        deferred.len(),
        insert.relation.name
    );

    in_transaction(conn, dialect, |conn| {
        let query = dialect.compile(&*conn, &row.into())?;
        let generated = conn.execute_insert(&query)?;

        let id = match (&generated, insert.get(&pk)) {
            (Some(id), _) => id.clone(),
            (None, Some(sql::Expr::Constant(c))) => c.value.clone(),
            _ => bail!(
                "Cannot write large objects of table \"{}\" without the key of the inserted row",
                insert.relation.name
            ),
        };

        write_large_objects(conn, dialect, &insert.relation, &pk, &id, deferred)?;
        Ok(generated)
    })
}

/// Updates the row identified by `id`, writing large object values in separate
/// statements for the dialects which defer them. Returns the number of rows
/// affected by the main update, if known.
pub fn update_with_large_objects<C: Connection>(
    conn: &mut C,
    dialect: Dialect,
    update: &sql::UpdateStatement,
    id: &DataValue,
) -> Result<Option<u64>> {
    let deferred = if dialect.defers_large_objects() {
        let columns = large_object_columns(conn, &update.relation.name)?;
        update
            .values
            .iter()
            .filter_map(|(col, expr)| deferrable(&columns, col, expr))
            .collect_vec()
    } else {
        vec![]
    };

    if deferred.is_empty() {
        let query = dialect.compile(&*conn, &update.clone().into())?;
        return conn.execute_modify(&query);
    }

    let pk = require_primary_key(conn, dialect, &update.relation)?;
    let mut row = update.clone();
    row.values
        .retain(|(col, _)| !deferred.iter().any(|(c, _)| c == col));

    in_transaction(conn, dialect, |conn| {
        let affected = if row.values.is_empty() {
            None
        } else {
            let query = dialect.compile(&*conn, &row.into())?;
            conn.execute_modify(&query)?
        };

        write_large_objects(conn, dialect, &update.relation, &pk, id, deferred)?;
        Ok(affected)
    })
}

fn large_object_columns<C: Connection>(conn: &C, table: &str) -> Result<HashSet<String>> {
    Ok(conn
        .columns(table)?
        .into_iter()
        .filter(|c| c.r#type.is_large_object())
        .map(|c| c.name)
        .collect())
}

/// A non-null constant assigned to a large object column
fn deferrable(
    columns: &HashSet<String>,
    col: &str,
    expr: &sql::Expr,
) -> Option<(String, DataValue)> {
    match expr {
        sql::Expr::Constant(c) if columns.contains(col) && !c.value.is_null() => {
            Some((col.to_string(), c.value.clone()))
        }
        _ => None,
    }
}

fn require_primary_key<C: Connection>(
    conn: &C,
    dialect: Dialect,
    table: &sql::TableRef,
) -> Result<String> {
    match conn.primary_key(&table.name)? {
        Some(pk) => Ok(pk),
        None => bail!(DialectError::unsupported(
            dialect.name(),
            format!(
                "Large objects of table \"{}\" cannot be written without a primary key",
                table.name
            )
        )),
    }
}

fn write_large_objects<C: Connection>(
    conn: &mut C,
    dialect: Dialect,
    table: &sql::TableRef,
    pk: &str,
    id: &DataValue,
    deferred: Vec<(String, DataValue)>,
) -> Result<()> {
    let target = sql::TableRef {
        alias: None,
        ..table.clone()
    };

    for (column, value) in deferred {
        let update = sql::UpdateStatement::new(target.clone())
            .set(column.clone(), sql::Expr::constant(value))
            .filter(sql::Expr::equals(
                sql::Expr::bare_col(pk),
                sql::Expr::constant(id.clone()),
            ));

        // Large values are always bound, regardless of the connection settings
        let res = dialect
            .compile_with(
                &*conn,
                &update.into(),
                &mut BindCollector::new(PlaceholderStyle::QuestionMark),
            )
            .and_then(|query| conn.execute_modify(&query))
            .and_then(|affected| match affected {
                Some(0) => Err(anyhow!("No row found where \"{pk}\" = {id:?}")),
                _ => Ok(()),
            });

        res.with_context(|| DialectError::SecondaryWriteFailure {
            table: table.name.clone(),
            column,
        })?;
    }

    Ok(())
}

/// Runs the callback within a transaction, beginning one if none is active.
/// A transaction begun here is committed on success and rolled back on failure.
///
/// The row and its large objects must be written atomically, so a connection
/// without transactions is rejected before anything is executed.
fn in_transaction<C: Connection, T>(
    conn: &mut C,
    dialect: Dialect,
    cb: impl FnOnce(&mut C) -> Result<T>,
) -> Result<T> {
    let began = match conn.transaction_manager() {
        Some(tm) => {
            if tm.is_in_transaction()? {
                false
            } else {
                tm.begin_transaction()?;
                true
            }
        }
        None => bail!(DialectError::unsupported(
            dialect.name(),
            "Deferred large object writes require a connection supporting transactions"
        )),
    };

    let res = cb(conn);

    if !began {
        return res;
    }

    let tm = match conn.transaction_manager() {
        Some(tm) => tm,
        None => bail!("Transaction manager is no longer available"),
    };

    match res {
        Ok(val) => {
            tm.commit_transaction()?;
            Ok(val)
        }
        Err(err) => {
            if let Err(rollback_err) = tm.rollback_transaction() {
                warn!("Failed to rollback transaction: {:?}", rollback_err);
            }
            Err(err)
        }
    }
}
