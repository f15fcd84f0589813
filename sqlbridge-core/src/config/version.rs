use std::{fmt, str::FromStr};

use anyhow::{bail, Context, Error, Result};
use serde::{Deserialize, Serialize};

/// Major and minor version of a database server
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ServerVersion {
    pub major: u32,
    pub minor: u32,
}

impl ServerVersion {
    pub fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    pub fn at_least(&self, major: u32, minor: u32) -> bool {
        *self >= Self::new(major, minor)
    }
}

impl FromStr for ServerVersion {
    type Err = Error;

    /// Parses "major[.minor[.patch...]]", ignoring anything after the minor version
    fn from_str(s: &str) -> Result<Self> {
        let mut parts = s.trim().split('.');

        let major = match parts.next() {
            Some(p) if !p.is_empty() => p
                .parse()
                .with_context(|| format!("Invalid major version in \"{s}\""))?,
            _ => bail!("Invalid server version \"{s}\""),
        };
        let minor = match parts.next() {
            Some(p) => p
                .parse()
                .with_context(|| format!("Invalid minor version in \"{s}\""))?,
            None => 0,
        };

        Ok(Self::new(major, minor))
    }
}

impl TryFrom<String> for ServerVersion {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<ServerVersion> for String {
    fn from(v: ServerVersion) -> Self {
        v.to_string()
    }
}

impl fmt::Display for ServerVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}
