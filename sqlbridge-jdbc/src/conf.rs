use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use sqlbridge_core::{
    config::{self, BridgeConfig},
    err::{Context, Result},
};
use sqlbridge_dialects::Dialect;
use sqlbridge_logging::debug;

use crate::{detect_dialect, driver_for_url, resolve_driver, DriverInfo};

/// The connection config for a JDBC data source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JdbcConnectionConfig {
    pub jdbc_url: String,
    /// Logical driver name, eg "jtds" or "firebird", detected from the url if omitted
    #[serde(default)]
    pub driver: Option<String>,
    /// Overrides the driver class name
    #[serde(default)]
    pub driver_class: Option<String>,
    /// Overrides the driver jar file name
    #[serde(default)]
    pub driver_jar: Option<String>,
    /// Overrides the default version of the driver jar
    #[serde(default)]
    pub driver_version: Option<String>,
    #[serde(default)]
    pub properties: HashMap<String, String>,
}

impl JdbcConnectionConfig {
    pub fn new(jdbc_url: impl Into<String>, properties: HashMap<String, String>) -> Self {
        Self {
            jdbc_url: jdbc_url.into(),
            driver: None,
            driver_class: None,
            driver_jar: None,
            driver_version: None,
            properties,
        }
    }

    pub fn parse(options: config::Value) -> Result<Self> {
        config::from_value::<Self>(options)
            .context("Failed to parse connection configuration options")
    }

    /// Resolves the driver to load, applying the configured overrides
    pub fn driver(&self) -> Result<DriverInfo> {
        let name = match &self.driver {
            Some(name) => name.as_str(),
            None => driver_for_url(&self.jdbc_url)?,
        };

        let mut driver = resolve_driver(name, self.driver_version.as_deref())?;

        if let Some(jar) = &self.driver_jar {
            driver.jar = jar.clone();
        }
        if let Some(class_name) = &self.driver_class {
            driver.class_name = class_name.clone();
        }

        Ok(driver)
    }

    /// The dialect used for this connection, the one named in the bridge config
    /// takes precedence over detection from the url
    pub fn dialect(&self, bridge: &BridgeConfig) -> Result<Dialect> {
        let dialect = match &bridge.dialect {
            Some(name) => name.parse::<Dialect>()?,
            None => detect_dialect(&self.jdbc_url, bridge.server_version.as_ref())?,
        };

        debug!("Using {} dialect for {}", dialect, self.jdbc_url);
        Ok(dialect)
    }
}
