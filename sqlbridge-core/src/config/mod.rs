use serde::{Deserialize, Serialize};

pub use serde_yaml::{from_value, Mapping, Value};

use crate::data::DataType;

mod util;
pub use util::*;
mod version;
pub use version::*;

/// Options controlling how statements are compiled for a connection
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// The dialect name, detected from the JDBC url if omitted
    #[serde(default)]
    pub dialect: Option<String>,
    /// Whether values are sent as bind parameters rather than inlined
    #[serde(default = "default_prepared_statements")]
    pub prepared_statements: bool,
    /// Delimiter used in array literals
    #[serde(default = "default_array_delimiter")]
    pub array_delimiter: char,
    /// Version of the database server, eg "11.0"
    #[serde(default)]
    pub server_version: Option<ServerVersion>,
    /// Static schema information for the tables in use
    #[serde(default)]
    pub tables: Vec<TableConfig>,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            dialect: None,
            prepared_statements: default_prepared_statements(),
            array_delimiter: default_array_delimiter(),
            server_version: None,
            tables: vec![],
        }
    }
}

fn default_prepared_statements() -> bool {
    true
}

fn default_array_delimiter() -> char {
    ','
}

impl BridgeConfig {
    pub fn parse(conf: Value) -> anyhow::Result<Self> {
        use anyhow::Context;

        from_value::<Self>(conf).context("Failed to parse bridge configuration")
    }

    /// Gets the config of the supplied table
    pub fn table(&self, name: &str) -> Option<&TableConfig> {
        self.tables.iter().find(|t| t.name == name)
    }
}

/// Schema of a table
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct TableConfig {
    pub name: String,
    #[serde(default)]
    pub primary_key: Option<String>,
    #[serde(default)]
    pub columns: Vec<ColumnConfig>,
}

impl TableConfig {
    pub fn new(name: impl Into<String>, primary_key: Option<&str>, columns: Vec<ColumnConfig>) -> Self {
        Self {
            name: name.into(),
            primary_key: primary_key.map(|s| s.to_string()),
            columns,
        }
    }
}

/// Schema of a column
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct ColumnConfig {
    pub name: String,
    pub r#type: DataType,
}

impl ColumnConfig {
    pub fn new(name: impl Into<String>, r#type: DataType) -> Self {
        Self {
            name: name.into(),
            r#type,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::data::StringOptions;

    #[test]
    fn test_parse_bridge_config_defaults() {
        let parsed = BridgeConfig::parse(parse_config("{}").unwrap()).unwrap();

        assert_eq!(parsed, BridgeConfig::default());
        assert!(parsed.prepared_statements);
        assert_eq!(parsed.array_delimiter, ',');
    }

    #[test]
    fn test_parse_bridge_config() {
        let conf = parse_config(
            r#"
dialect: firebird
prepared_statements: false
array_delimiter: ";"
server_version: "3.0"
tables:
  - name: documents
    primary_key: id
    columns:
      - name: id
        type: Int64
      - name: body
        type: !Utf8String {}
      - name: title
        type: !Utf8String { length: 255 }
"#,
        )
        .unwrap();

        let parsed = BridgeConfig::parse(conf).unwrap();

        assert_eq!(
            parsed,
            BridgeConfig {
                dialect: Some("firebird".into()),
                prepared_statements: false,
                array_delimiter: ';',
                server_version: Some(ServerVersion::new(3, 0)),
                tables: vec![TableConfig::new(
                    "documents",
                    Some("id"),
                    vec![
                        ColumnConfig::new("id", DataType::Int64),
                        ColumnConfig::new("body", DataType::rust_string()),
                        ColumnConfig::new(
                            "title",
                            DataType::Utf8String(StringOptions::new(Some(255)))
                        ),
                    ]
                )]
            }
        );
        assert!(parsed.table("documents").is_some());
        assert!(parsed.table("missing").is_none());
    }
}
