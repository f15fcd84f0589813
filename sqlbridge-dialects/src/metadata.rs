use sqlbridge_core::{
    config::{BridgeConfig, ColumnConfig, ServerVersion},
    err::Result,
};

use crate::ConnectionMetadata;

/// Connection metadata backed by static configuration
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StaticMetadata {
    conf: BridgeConfig,
}

impl StaticMetadata {
    pub fn new(conf: BridgeConfig) -> Self {
        Self { conf }
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.conf
    }
}

impl From<BridgeConfig> for StaticMetadata {
    fn from(conf: BridgeConfig) -> Self {
        Self::new(conf)
    }
}

impl ConnectionMetadata for StaticMetadata {
    fn primary_key(&self, table: &str) -> Result<Option<String>> {
        Ok(self.conf.table(table).and_then(|t| t.primary_key.clone()))
    }

    fn columns(&self, table: &str) -> Result<Vec<ColumnConfig>> {
        Ok(self
            .conf
            .table(table)
            .map(|t| t.columns.clone())
            .unwrap_or_default())
    }

    fn server_version(&self) -> Option<ServerVersion> {
        self.conf.server_version
    }

    fn prepared_statements(&self) -> bool {
        self.conf.prepared_statements
    }

    fn array_delimiter(&self) -> char {
        self.conf.array_delimiter
    }
}

#[cfg(test)]
mod tests {
    use sqlbridge_core::{
        config::{parse_config, TableConfig},
        data::DataType,
    };

    use super::*;

    #[test]
    fn test_static_metadata_from_config() {
        let conf = BridgeConfig::parse(
            parse_config(
                r#"
prepared_statements: false
server_version: "11.0"
tables:
  - name: users
    primary_key: id
    columns:
      - name: id
        type: Int64
"#,
            )
            .unwrap(),
        )
        .unwrap();
        let meta = StaticMetadata::new(conf);

        assert_eq!(meta.primary_key("users").unwrap(), Some("id".to_string()));
        assert_eq!(meta.primary_key("other").unwrap(), None);
        assert_eq!(
            meta.columns("users").unwrap(),
            vec![ColumnConfig::new("id", DataType::Int64)]
        );
        assert!(meta.columns("other").unwrap().is_empty());
        assert_eq!(meta.server_version(), Some(ServerVersion::new(11, 0)));
        assert!(!meta.prepared_statements());
        assert_eq!(meta.array_delimiter(), ',');
    }

    #[test]
    fn test_static_metadata_table_without_pk() {
        let meta = StaticMetadata::new(BridgeConfig {
            tables: vec![TableConfig::new("logs", None, vec![])],
            ..Default::default()
        });

        assert_eq!(meta.primary_key("logs").unwrap(), None);
    }
}
