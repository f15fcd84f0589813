use sqlbridge_core::{
    config::{BridgeConfig, ColumnConfig, ServerVersion, TableConfig},
    data::{DataType, DataValue, StringOptions},
    err::{bail, Result},
};
use sqlbridge_dialects::{
    CompiledQuery, Connection, ConnectionMetadata, StaticMetadata, TransactionManager,
};

/// Records transaction calls
#[derive(Debug, Default)]
pub struct MockTransactions {
    pub active: bool,
    pub log: Vec<&'static str>,
}

impl TransactionManager for MockTransactions {
    fn is_in_transaction(&mut self) -> Result<bool> {
        Ok(self.active)
    }

    fn begin_transaction(&mut self) -> Result<()> {
        self.active = true;
        self.log.push("begin");
        Ok(())
    }

    fn rollback_transaction(&mut self) -> Result<()> {
        self.active = false;
        self.log.push("rollback");
        Ok(())
    }

    fn commit_transaction(&mut self) -> Result<()> {
        self.active = false;
        self.log.push("commit");
        Ok(())
    }
}

/// A connection which records the queries it is asked to execute
pub struct MockConnection {
    pub meta: StaticMetadata,
    pub executed: Vec<CompiledQuery>,
    pub transactions: MockTransactions,
    pub transactional: bool,
    /// Queries containing this text fail
    pub fail_on: Option<String>,
    pub affected_rows: Option<u64>,
    pub generated_key: Option<DataValue>,
}

impl MockConnection {
    pub fn new(conf: BridgeConfig) -> Self {
        Self {
            meta: StaticMetadata::new(conf),
            executed: vec![],
            transactions: MockTransactions::default(),
            transactional: true,
            fail_on: None,
            affected_rows: Some(1),
            generated_key: None,
        }
    }

    fn record(&mut self, query: &CompiledQuery) -> Result<()> {
        self.executed.push(query.clone());

        if let Some(text) = &self.fail_on {
            if query.sql.contains(text.as_str()) {
                bail!("Mock failure executing: {}", query.sql);
            }
        }

        Ok(())
    }
}

impl ConnectionMetadata for MockConnection {
    fn primary_key(&self, table: &str) -> Result<Option<String>> {
        self.meta.primary_key(table)
    }

    fn columns(&self, table: &str) -> Result<Vec<ColumnConfig>> {
        self.meta.columns(table)
    }

    fn server_version(&self) -> Option<ServerVersion> {
        self.meta.server_version()
    }

    fn prepared_statements(&self) -> bool {
        self.meta.prepared_statements()
    }

    fn array_delimiter(&self) -> char {
        self.meta.array_delimiter()
    }
}

impl Connection for MockConnection {
    fn execute_modify(&mut self, query: &CompiledQuery) -> Result<Option<u64>> {
        self.record(query)?;
        Ok(self.affected_rows)
    }

    fn execute_insert(&mut self, query: &CompiledQuery) -> Result<Option<DataValue>> {
        self.record(query)?;
        Ok(self.generated_key.clone())
    }

    fn transaction_manager(&mut self) -> Option<&mut dyn TransactionManager> {
        if self.transactional {
            Some(&mut self.transactions)
        } else {
            None
        }
    }
}

/// "documents" has a primary key and large object columns "body" and "data",
/// "notes" has a large object column but no primary key
pub fn documents_config() -> BridgeConfig {
    BridgeConfig {
        tables: vec![
            TableConfig::new(
                "documents",
                Some("id"),
                vec![
                    ColumnConfig::new("id", DataType::Int64),
                    ColumnConfig::new("title", DataType::Utf8String(StringOptions::new(Some(255)))),
                    ColumnConfig::new("body", DataType::rust_string()),
                    ColumnConfig::new("data", DataType::Binary),
                ],
            ),
            TableConfig::new(
                "notes",
                None,
                vec![ColumnConfig::new("body", DataType::rust_string())],
            ),
        ],
        ..Default::default()
    }
}

pub fn mock_connection() -> MockConnection {
    sqlbridge_logging::init_for_tests();
    MockConnection::new(documents_config())
}
