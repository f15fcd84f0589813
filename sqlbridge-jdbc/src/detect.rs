use sqlbridge_core::{
    config::ServerVersion,
    err::{bail, DialectError, Result},
};
use sqlbridge_dialects::Dialect;
use sqlbridge_logging::debug;

/// JDBC url prefixes and the logical driver handling them
const URL_PREFIXES: [(&str, &str); 8] = [
    ("jdbc:jtds:sqlserver:", "jtds"),
    ("jdbc:sqlserver:", "sqlserver"),
    ("jdbc:db2:", "db2"),
    ("jdbc:derby:", "derby"),
    ("jdbc:firebirdsql:", "firebird"),
    ("jdbc:firebird:", "firebird"),
    ("jdbc:hsqldb:", "hsqldb"),
    ("jdbc:h2:", "h2"),
];

/// The first SQL Server major version supporting `OFFSET .. FETCH` (2012)
const SQLSERVER_NG_MAJOR: u32 = 11;

/// Gets the logical driver name for the JDBC url
pub fn driver_for_url(jdbc_url: &str) -> Result<&'static str> {
    let url = jdbc_url.trim().to_lowercase();

    match URL_PREFIXES.iter().find(|(prefix, _)| url.starts_with(*prefix)) {
        Some((_, driver)) => Ok(*driver),
        None => bail!(DialectError::driver_load(
            jdbc_url,
            "no known driver handles this url"
        )),
    }
}

/// Detects the dialect of the database at the JDBC url.
///
/// SQL Server 2012 onwards uses the `sqlserver_ng` dialect. Urls of drivers without
/// a dedicated dialect use the generic one.
pub fn detect_dialect(jdbc_url: &str, version: Option<&ServerVersion>) -> Result<Dialect> {
    if !jdbc_url.trim().to_lowercase().starts_with("jdbc:") {
        bail!("Invalid JDBC url \"{}\"", jdbc_url);
    }

    let dialect = match driver_for_url(jdbc_url) {
        Ok("jtds" | "sqlserver") => match version {
            Some(v) if v.at_least(SQLSERVER_NG_MAJOR, 0) => Dialect::SqlServerNg,
            _ => Dialect::SqlServer,
        },
        Ok(driver) => crate::resolve_driver(driver, None)?.dialect,
        Err(_) => {
            debug!(
                "No dedicated dialect for {}, falling back to generic SQL",
                jdbc_url
            );
            Dialect::Generic
        }
    };

    Ok(dialect)
}
