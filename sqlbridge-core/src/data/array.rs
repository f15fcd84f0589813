use anyhow::{bail, Context, Result};
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use super::{DataType, DataValue};

/// Converts between array values and the `{a,"b,c",NULL}` wire text form.
///
/// Only one-dimensional arrays are supported.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArrayCodec {
    pub delimiter: char,
}

impl Default for ArrayCodec {
    fn default() -> Self {
        Self { delimiter: ',' }
    }
}

impl ArrayCodec {
    pub fn new(delimiter: char) -> Self {
        Self { delimiter }
    }

    /// Encodes the elements into the array literal text
    pub fn encode(&self, values: &[DataValue]) -> Result<String> {
        let elements = values
            .iter()
            .map(|value| match value {
                DataValue::Null => Ok("NULL".to_string()),
                DataValue::Array(_) => bail!("Nested arrays are not supported"),
                _ => Ok(self.quote_element(&value.to_text()?)),
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(format!(
            "{{{}}}",
            elements.iter().join(&self.delimiter.to_string())
        ))
    }

    fn quote_element(&self, text: &str) -> String {
        if !self.requires_quoting(text) {
            return text.to_string();
        }

        let mut out = String::with_capacity(text.len() + 2);
        out.push('"');
        for c in text.chars() {
            if c == '"' || c == '\\' {
                out.push('\\');
            }
            out.push(c);
        }
        out.push('"');
        out
    }

    fn requires_quoting(&self, text: &str) -> bool {
        text.is_empty()
            || text.eq_ignore_ascii_case("null")
            || text
                .chars()
                .any(|c| c == self.delimiter || matches!(c, '"' | '\\' | '{' | '}') || c.is_whitespace())
    }

    /// Decodes the array literal text into a flat list of elements of the supplied type
    pub fn decode(&self, text: &str, element: &DataType) -> Result<Vec<DataValue>> {
        let inner = text
            .trim()
            .strip_prefix('{')
            .and_then(|s| s.strip_suffix('}'))
            .with_context(|| format!("Invalid array literal, expected braces: \"{text}\""))?;

        let mut values = vec![];
        if inner.trim().is_empty() {
            return Ok(values);
        }

        let mut chars = inner.chars().peekable();

        loop {
            while chars.next_if(|c| c.is_whitespace()).is_some() {}

            let value = match chars.peek() {
                Some('"') => {
                    chars.next();
                    let mut buf = String::new();
                    loop {
                        match chars.next() {
                            Some('\\') => buf.push(
                                chars
                                    .next()
                                    .context("Invalid array literal, dangling escape")?,
                            ),
                            Some('"') => break,
                            Some(c) => buf.push(c),
                            None => bail!("Invalid array literal, unterminated quoted element"),
                        }
                    }
                    while chars.next_if(|c| c.is_whitespace()).is_some() {}
                    DataValue::parse_text(&buf, element)?
                }
                Some('{') => bail!("Nested arrays are not supported"),
                _ => {
                    let mut buf = String::new();
                    while let Some(c) = chars.next_if(|c| *c != self.delimiter) {
                        buf.push(c);
                    }
                    let buf = buf.trim();

                    if buf.is_empty() {
                        bail!("Invalid array literal, empty unquoted element in \"{text}\"");
                    }

                    if buf.eq_ignore_ascii_case("null") {
                        DataValue::Null
                    } else {
                        DataValue::parse_text(buf, element)?
                    }
                }
            };

            values.push(value);

            match chars.next() {
                Some(c) if c == self.delimiter => continue,
                None => break,
                Some(c) => bail!("Invalid array literal, unexpected '{c}' in \"{text}\""),
            }
        }

        Ok(values)
    }
}
