use anyhow::{bail, Context, Result};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use uuid::Uuid;

use super::{DataType, DataValue};

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M:%S%.f";
const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

impl DataValue {
    /// Parses the textual wire representation of a scalar into a value of the supplied type
    pub fn parse_text(data: &str, r#type: &DataType) -> Result<DataValue> {
        match r#type {
            DataType::Utf8String(_) => return Ok(Self::Utf8String(data.to_string())),
            DataType::Binary => {
                if let Some(hex) = data.strip_prefix("\\x") {
                    return Ok(Self::Binary(decode_hex(hex)?));
                }

                return Ok(Self::Binary(data.as_bytes().to_vec()));
            }
            DataType::JSON if serde_json::from_str::<serde_json::Value>(data).is_ok() => {
                return Ok(Self::JSON(data.to_string()))
            }
            DataType::Boolean => match data.to_lowercase().as_str() {
                "1" | "t" | "true" => return Ok(Self::Boolean(true)),
                "0" | "f" | "false" => return Ok(Self::Boolean(false)),
                _ => {}
            },
            DataType::Int16 => {
                if let Ok(n) = data.parse() {
                    return Ok(DataValue::Int16(n));
                }
            }
            DataType::Int32 => {
                if let Ok(n) = data.parse() {
                    return Ok(DataValue::Int32(n));
                }
            }
            DataType::Int64 => {
                if let Ok(n) = data.parse() {
                    return Ok(DataValue::Int64(n));
                }
            }
            DataType::Float64 => {
                if let Ok(n) = data.parse() {
                    return Ok(DataValue::Float64(n));
                }
            }
            DataType::Decimal(_) => {
                if let Ok(n) = data.parse() {
                    return Ok(DataValue::Decimal(n));
                }
            }
            DataType::Date => {
                if let Ok(date) = NaiveDate::parse_from_str(data, DATE_FORMAT) {
                    return Ok(Self::Date(date));
                }
            }
            DataType::Time => {
                if let Ok(time) = NaiveTime::parse_from_str(data, TIME_FORMAT) {
                    return Ok(Self::Time(time));
                }
            }
            DataType::DateTime => {
                if let Ok(dt) = NaiveDateTime::parse_from_str(data, DATE_TIME_FORMAT) {
                    return Ok(Self::DateTime(dt));
                }
                if let Ok(dt) = NaiveDateTime::parse_from_str(data, "%Y-%m-%dT%H:%M:%S%.f") {
                    return Ok(Self::DateTime(dt));
                }
            }
            DataType::Uuid => {
                if let Ok(uuid) = Uuid::try_parse(data) {
                    return Ok(Self::Uuid(uuid));
                }
            }
            DataType::Null if data.eq_ignore_ascii_case("null") => return Ok(Self::Null),
            _ => {}
        };

        bail!(
            "Cannot parse \"{}\" as {:?}",
            data.chars().take(50).collect::<String>(),
            r#type
        )
    }

    /// Formats the value in its default textual representation.
    ///
    /// This is the unquoted form, the inverse of [`DataValue::parse_text`].
    pub fn to_text(&self) -> Result<String> {
        Ok(match self {
            DataValue::Null => "NULL".into(),
            DataValue::Utf8String(s) => s.clone(),
            DataValue::Binary(b) => format!("\\x{}", encode_hex(b)),
            DataValue::Boolean(b) => (if *b { "true" } else { "false" }).into(),
            DataValue::Int16(n) => n.to_string(),
            DataValue::Int32(n) => n.to_string(),
            DataValue::Int64(n) => n.to_string(),
            DataValue::Float64(n) => n.to_string(),
            DataValue::Decimal(n) => n.to_string(),
            DataValue::JSON(s) => s.clone(),
            DataValue::Date(d) => d.format(DATE_FORMAT).to_string(),
            DataValue::Time(t) => t.format(TIME_FORMAT).to_string(),
            DataValue::DateTime(dt) => dt.format(DATE_TIME_FORMAT).to_string(),
            DataValue::Uuid(u) => u.to_string(),
            DataValue::Array(_) => bail!("Arrays do not have a scalar text representation"),
        })
    }
}

/// Encodes the bytes as uppercase hex digits
pub fn encode_hex(data: &[u8]) -> String {
    data.iter().map(|b| format!("{:02X}", b)).collect()
}

pub(crate) fn decode_hex(hex: &str) -> Result<Vec<u8>> {
    if !hex.is_ascii() {
        bail!("Invalid hex string, found non-ascii characters");
    }

    if hex.len() % 2 != 0 {
        bail!("Invalid hex string, odd number of digits: \"{hex}\"");
    }

    (0..hex.len())
        .step_by(2)
        .map(|i| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .with_context(|| format!("Invalid hex digits \"{}\"", &hex[i..i + 2]))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    #[test]
    fn test_parse_text_numbers() {
        assert_eq!(
            DataValue::parse_text("123", &DataType::Int32).unwrap(),
            DataValue::Int32(123)
        );
        assert_eq!(
            DataValue::parse_text("-5", &DataType::Int64).unwrap(),
            DataValue::Int64(-5)
        );
        assert_eq!(
            DataValue::parse_text("1.5", &DataType::Float64).unwrap(),
            DataValue::Float64(1.5)
        );
        assert_eq!(
            DataValue::parse_text("12.340", &DataType::Decimal(Default::default())).unwrap(),
            DataValue::Decimal(Decimal::new(12340, 3))
        );
        assert!(DataValue::parse_text("abc", &DataType::Int16).is_err());
    }

    #[test]
    fn test_parse_text_boolean() {
        assert_eq!(
            DataValue::parse_text("t", &DataType::Boolean).unwrap(),
            DataValue::Boolean(true)
        );
        assert_eq!(
            DataValue::parse_text("FALSE", &DataType::Boolean).unwrap(),
            DataValue::Boolean(false)
        );
        assert!(DataValue::parse_text("yes", &DataType::Boolean).is_err());
    }

    #[test]
    fn test_parse_text_date_time() {
        assert_eq!(
            DataValue::parse_text("2020-01-05", &DataType::Date).unwrap(),
            DataValue::Date(NaiveDate::from_ymd_opt(2020, 1, 5).unwrap())
        );
        assert_eq!(
            DataValue::parse_text("2020-01-05 10:11:12", &DataType::DateTime).unwrap(),
            DataValue::DateTime(
                NaiveDate::from_ymd_opt(2020, 1, 5)
                    .unwrap()
                    .and_hms_opt(10, 11, 12)
                    .unwrap()
            )
        );
    }

    #[test]
    fn test_to_text_and_parse_binary() {
        let val = DataValue::Binary(vec![0xDE, 0xAD, 0x01]);
        let text = val.to_text().unwrap();

        assert_eq!(text, "\\xDEAD01");
        assert_eq!(DataValue::parse_text(&text, &DataType::Binary).unwrap(), val);
    }

    #[test]
    fn test_to_text_array_fails() {
        assert!(DataValue::Array(vec![]).to_text().is_err());
    }

    #[test]
    fn test_decode_hex_invalid() {
        assert!(decode_hex("ABC").is_err());
        assert!(decode_hex("ZZ").is_err());
    }

    #[test]
    fn test_decode_hex_non_ascii() {
        assert!(decode_hex("0é0").is_err());
        assert!(DataValue::parse_text("\\x0é0", &DataType::Binary).is_err());
    }

    #[test]
    fn test_parse_text_error_truncates_multibyte() {
        let data = format!("a{}", "ä".repeat(30));
        let err = DataValue::parse_text(&data, &DataType::Int32).unwrap_err();

        assert_eq!(
            err.to_string(),
            format!("Cannot parse \"a{}\" as Int32", "ä".repeat(30))
        );
    }
}
