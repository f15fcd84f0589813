use std::{collections::HashMap, env, fs, path::PathBuf};

use itertools::Itertools;
use sqlbridge_core::err::{bail, Context, DialectError, Result};
use sqlbridge_dialects::Dialect;
use sqlbridge_logging::{debug, warn};

/// Environment variable listing the directories searched for driver jars
pub const CLASSPATH_ENV: &str = "SQLBRIDGE_CLASSPATH";

/// A JDBC driver known to the bridge
#[derive(Debug, Clone, Copy, PartialEq)]
struct KnownDriver {
    name: &'static str,
    /// The jar file name, `{version}` is replaced by the driver version
    jar: &'static str,
    version: &'static str,
    class_name: &'static str,
    dialect: Dialect,
}

lazy_static::lazy_static! {
    static ref DRIVERS: HashMap<&'static str, KnownDriver> = {
        let drivers = [
            KnownDriver {
                name: "jtds",
                jar: "jtds-{version}.jar",
                version: "1.3.1",
                class_name: "net.sourceforge.jtds.jdbc.Driver",
                dialect: Dialect::SqlServer,
            },
            KnownDriver {
                name: "sqlserver",
                jar: "mssql-jdbc-{version}.jre8.jar",
                version: "12.2.0",
                class_name: "com.microsoft.sqlserver.jdbc.SQLServerDriver",
                dialect: Dialect::SqlServer,
            },
            KnownDriver {
                name: "db2",
                jar: "jcc-{version}.jar",
                version: "11.5.8.0",
                class_name: "com.ibm.db2.jcc.DB2Driver",
                dialect: Dialect::Db2,
            },
            KnownDriver {
                name: "derby",
                jar: "derby-{version}.jar",
                version: "10.14.2.0",
                class_name: "org.apache.derby.jdbc.EmbeddedDriver",
                dialect: Dialect::Derby,
            },
            KnownDriver {
                name: "firebird",
                jar: "jaybird-{version}.jar",
                version: "4.0.9.java8",
                class_name: "org.firebirdsql.jdbc.FBDriver",
                dialect: Dialect::Firebird,
            },
            KnownDriver {
                name: "hsqldb",
                jar: "hsqldb-{version}.jar",
                version: "2.7.1",
                class_name: "org.hsqldb.jdbc.JDBCDriver",
                dialect: Dialect::Hsqldb,
            },
            KnownDriver {
                name: "h2",
                jar: "h2-{version}.jar",
                version: "2.1.214",
                class_name: "org.h2.Driver",
                dialect: Dialect::H2,
            },
        ];

        drivers.into_iter().map(|d| (d.name, d)).collect()
    };
}

/// The jar and class of a resolved JDBC driver
#[derive(Debug, Clone, PartialEq)]
pub struct DriverInfo {
    /// The canonical driver name
    pub name: String,
    /// File name of the driver jar, eg "jtds-1.3.1.jar"
    pub jar: String,
    /// Fully qualified class name of the driver
    pub class_name: String,
    /// The dialect spoken by databases reached through this driver
    pub dialect: Dialect,
}

/// Resolves the logical driver name to its jar and class.
/// The default jar version can be replaced by passing `version`.
pub fn resolve_driver(name: &str, version: Option<&str>) -> Result<DriverInfo> {
    let canonical = match name.trim().to_lowercase().as_str() {
        "jaybird" | "firebirdsql" => "firebird".to_string(),
        "mssql" | "mssql-jdbc" => "sqlserver".to_string(),
        other => other.to_string(),
    };

    let driver = match DRIVERS.get(canonical.as_str()) {
        Some(driver) => driver,
        None => bail!(DialectError::driver_load(
            name,
            format!(
                "unknown driver, expected one of {}",
                DRIVERS.keys().sorted().join(", ")
            )
        )),
    };

    let version = version.unwrap_or(driver.version);

    Ok(DriverInfo {
        name: driver.name.to_string(),
        jar: driver.jar.replace("{version}", version),
        class_name: driver.class_name.to_string(),
        dialect: driver.dialect,
    })
}

impl DriverInfo {
    /// Finds the driver jar in the class path directories.
    ///
    /// The directories default to those listed in `SQLBRIDGE_CLASSPATH`, falling back
    /// to the directory of the current executable.
    pub fn find_jar(&self, class_path: Option<&str>) -> Result<PathBuf> {
        let class_paths = class_path
            .map(split_class_path)
            .unwrap_or_else(default_class_paths);

        for path in class_paths.iter() {
            let candidate = path.join(&self.jar);

            if candidate.is_file() {
                debug!("Found driver jar {}", candidate.display());
                return Ok(candidate);
            }
        }

        bail!(DialectError::driver_load(
            &self.name,
            format!(
                "could not find {} in {}",
                self.jar,
                class_paths.iter().map(|p| p.display()).join(":")
            )
        ))
    }
}

/// Lists the jars in the class path directory
pub fn list_jars(dir: &str) -> Result<Vec<PathBuf>> {
    let files = fs::read_dir(dir).with_context(|| format!("Failed to read files in {dir}"))?;

    let mut jars = vec![];
    for file in files {
        let path = file
            .with_context(|| format!("Failed to read files in {dir}"))?
            .path();

        let is_jar = path
            .extension()
            .map(|ext| ext.to_string_lossy() == "jar")
            .unwrap_or(false);

        if path.is_file() && is_jar {
            jars.push(path);
        }
    }

    jars.sort();
    Ok(jars)
}

fn split_class_path(paths: &str) -> Vec<PathBuf> {
    paths
        .split(':')
        .filter(|p| !p.is_empty())
        .map(PathBuf::from)
        .collect()
}

fn default_class_paths() -> Vec<PathBuf> {
    match env::var(CLASSPATH_ENV) {
        Ok(paths) => split_class_path(&paths),
        Err(_) => current_exe_dir()
            .map_err(|e| warn!("Failed to get current class path {:?}", e))
            .map(|dir| vec![dir])
            .unwrap_or_default(),
    }
}

/// Gets the parent dir of the currently running binary
fn current_exe_dir() -> Result<PathBuf> {
    env::current_exe()
        .context("Failed to get current bin path")
        .and_then(|p| {
            p.parent()
                .map(|p| p.to_path_buf())
                .context("Failed to get parent path")
        })
}
