pub use anyhow::{anyhow, bail, ensure, Context, Error, Result};

use thiserror::Error as ThisError;

/// Failures that callers are expected to distinguish from one another.
///
/// These are raised through `anyhow`, either directly (`bail!(DialectError::..)`) or
/// attached as context to an underlying failure, so they can be recovered with
/// `err.downcast_ref::<DialectError>()`.
#[derive(Debug, Clone, PartialEq, ThisError)]
pub enum DialectError {
    /// The statement requests a feature the dialect cannot express
    #[error("Unsupported statement for dialect {dialect}: {reason}")]
    UnsupportedStatementShape { dialect: String, reason: String },
    /// The JDBC driver could not be resolved or loaded
    #[error("Failed to load driver \"{driver}\": {reason}")]
    DriverLoadFailure { driver: String, reason: String },
    /// The follow-up write of a deferred large object value failed
    #[error("Failed to write large object to column \"{column}\" of table \"{table}\"")]
    SecondaryWriteFailure { table: String, column: String },
}

impl DialectError {
    pub fn unsupported(dialect: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::UnsupportedStatementShape {
            dialect: dialect.into(),
            reason: reason.into(),
        }
    }

    pub fn driver_load(driver: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::DriverLoadFailure {
            driver: driver.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fails() -> Result<()> {
        bail!(DialectError::unsupported("derby", "offset requires a limit"));
    }

    #[test]
    fn test_dialect_error_downcast() {
        let err = fails().unwrap_err();

        assert_eq!(
            err.downcast_ref::<DialectError>(),
            Some(&DialectError::unsupported("derby", "offset requires a limit"))
        );
        assert_eq!(
            err.to_string(),
            "Unsupported statement for dialect derby: offset requires a limit"
        );
    }

    #[test]
    fn test_dialect_error_as_context() {
        let res: Result<()> = Err(anyhow!("connection reset"));
        let err = res
            .context(DialectError::SecondaryWriteFailure {
                table: "docs".into(),
                column: "body".into(),
            })
            .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<DialectError>(),
            Some(DialectError::SecondaryWriteFailure { .. })
        ));
        assert_eq!(err.root_cause().to_string(), "connection reset");
    }
}
