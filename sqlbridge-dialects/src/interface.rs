use sqlbridge_core::{
    config::{ColumnConfig, ServerVersion},
    data::DataValue,
    err::Result,
};

use crate::CompiledQuery;

/// Schema and server information about the connected database
pub trait ConnectionMetadata {
    /// Gets the primary key column of the table, if it has one
    fn primary_key(&self, table: &str) -> Result<Option<String>>;

    /// Gets the columns of the table
    fn columns(&self, table: &str) -> Result<Vec<ColumnConfig>>;

    /// Gets the version of the database server, if known
    fn server_version(&self) -> Option<ServerVersion>;

    /// Whether values are sent as bind parameters
    fn prepared_statements(&self) -> bool {
        true
    }

    /// The delimiter used within array literals
    fn array_delimiter(&self) -> char {
        ','
    }
}

/// Manages transaction state for a connection
pub trait TransactionManager {
    /// Checks if the current connection is in a transaction
    fn is_in_transaction(&mut self) -> Result<bool>;

    /// Starts a transaction
    fn begin_transaction(&mut self) -> Result<()>;

    /// Rolls back the current transaction
    fn rollback_transaction(&mut self) -> Result<()>;

    /// Commits the current transaction
    fn commit_transaction(&mut self) -> Result<()>;
}

/// An open connection which executes compiled queries
pub trait Connection: ConnectionMetadata {
    /// Executes the query, returning the number of affected rows, if known
    fn execute_modify(&mut self, query: &CompiledQuery) -> Result<Option<u64>>;

    /// Executes an insert, returning the generated key of the row, if any
    fn execute_insert(&mut self, query: &CompiledQuery) -> Result<Option<DataValue>>;

    /// Gets the transaction manager if transactions are supported
    fn transaction_manager(&mut self) -> Option<&mut dyn TransactionManager>;
}
