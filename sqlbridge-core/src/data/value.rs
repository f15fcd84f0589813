use serde::{Deserialize, Serialize};

use super::{DataType, DecimalOptions, StringOptions};

/// Data container for respective types
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub enum DataValue {
    Null,
    Utf8String(String),
    Binary(Vec<u8>),
    Boolean(bool),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Float64(f64),
    Decimal(rust_decimal::Decimal),
    JSON(String),
    Date(chrono::NaiveDate),
    Time(chrono::NaiveTime),
    DateTime(chrono::NaiveDateTime),
    Uuid(uuid::Uuid),
    Array(Vec<DataValue>),
}

impl DataValue {
    pub fn is_null(&self) -> bool {
        *self == DataValue::Null
    }

    /// Gets the data type of the value
    pub fn r#type(&self) -> DataType {
        match self {
            DataValue::Null => DataType::Null,
            DataValue::Utf8String(_) => DataType::Utf8String(StringOptions::default()),
            DataValue::Binary(_) => DataType::Binary,
            DataValue::Boolean(_) => DataType::Boolean,
            DataValue::Int16(_) => DataType::Int16,
            DataValue::Int32(_) => DataType::Int32,
            DataValue::Int64(_) => DataType::Int64,
            DataValue::Float64(_) => DataType::Float64,
            DataValue::Decimal(_) => DataType::Decimal(DecimalOptions::default()),
            DataValue::JSON(_) => DataType::JSON,
            DataValue::Date(_) => DataType::Date,
            DataValue::Time(_) => DataType::Time,
            DataValue::DateTime(_) => DataType::DateTime,
            DataValue::Uuid(_) => DataType::Uuid,
            DataValue::Array(els) => DataType::array_of(
                els.iter()
                    .find(|i| !i.is_null())
                    .map(|i| i.r#type())
                    .unwrap_or(DataType::Null),
            ),
        }
    }

    /// Whether the value would be written to a BLOB/CLOB column
    pub fn is_large_object(&self) -> bool {
        matches!(self, DataValue::Binary(_) | DataValue::Utf8String(_))
    }

    /// Whether the value can be expressed as a SQL literal.
    /// NaN and the infinities have no literal form.
    pub fn has_literal(&self) -> bool {
        match self {
            DataValue::Float64(n) => n.is_finite(),
            DataValue::Array(els) => els.iter().all(|e| e.has_literal()),
            _ => true,
        }
    }
}

impl From<&str> for DataValue {
    fn from(str: &str) -> Self {
        DataValue::Utf8String(str.to_string())
    }
}

impl From<String> for DataValue {
    fn from(str: String) -> Self {
        DataValue::Utf8String(str)
    }
}

impl From<bool> for DataValue {
    fn from(v: bool) -> Self {
        DataValue::Boolean(v)
    }
}

impl From<i32> for DataValue {
    fn from(v: i32) -> Self {
        DataValue::Int32(v)
    }
}

impl From<i64> for DataValue {
    fn from(v: i64) -> Self {
        DataValue::Int64(v)
    }
}

impl From<f64> for DataValue {
    fn from(n: f64) -> Self {
        DataValue::Float64(n)
    }
}

impl From<Vec<u8>> for DataValue {
    fn from(v: Vec<u8>) -> Self {
        DataValue::Binary(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_value_has_literal() {
        assert!(DataValue::Float64(1.5).has_literal());
        assert!(!DataValue::Float64(f64::NAN).has_literal());
        assert!(!DataValue::Float64(f64::NEG_INFINITY).has_literal());
        assert!(!DataValue::Array(vec![DataValue::Float64(f64::INFINITY)]).has_literal());
        assert!(DataValue::from("NaN").has_literal());
    }

    #[test]
    fn test_data_value_type() {
        assert_eq!(DataValue::Int32(1).r#type(), DataType::Int32);
        assert_eq!(DataValue::from("a").r#type(), DataType::rust_string());
        assert_eq!(
            DataValue::Array(vec![DataValue::Null, DataValue::Int64(1)]).r#type(),
            DataType::array_of(DataType::Int64)
        );
        assert_eq!(
            DataValue::Array(vec![]).r#type(),
            DataType::array_of(DataType::Null)
        );
    }

    #[test]
    fn test_data_value_is_null() {
        assert!(DataValue::Null.is_null());
        assert!(!DataValue::Int16(0).is_null());
    }
}
