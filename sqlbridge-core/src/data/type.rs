use serde::{Deserialize, Serialize};

/// Data type of values
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub enum DataType {
    Utf8String(StringOptions),
    Binary,
    Boolean,
    Int16,
    Int32,
    Int64,
    Float64,
    Decimal(DecimalOptions),
    JSON,
    Date,
    Time,
    DateTime,
    Uuid,
    Array(Box<DataType>),
    Null,
}

impl DataType {
    pub fn rust_string() -> Self {
        Self::Utf8String(StringOptions::new(None))
    }

    pub fn array_of(element: DataType) -> Self {
        Self::Array(Box::new(element))
    }

    /// Whether values of this type are stored as BLOB/CLOB columns.
    ///
    /// Strings without a declared length map to CLOB's.
    pub fn is_large_object(&self) -> bool {
        match self {
            DataType::Binary => true,
            DataType::Utf8String(opts) => opts.length.is_none(),
            _ => false,
        }
    }
}

/// Options for the VARCHAR data type
#[derive(Debug, Default, PartialEq, Clone, Serialize, Deserialize)]
pub struct StringOptions {
    /// Maximum length of the varchar data in characters
    pub length: Option<u32>,
}

impl StringOptions {
    pub fn new(length: Option<u32>) -> Self {
        Self { length }
    }
}

/// Decimal options
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize, Default)]
pub struct DecimalOptions {
    /// The capacity of number of digits for the type
    pub precision: Option<u16>,
    /// The number of digits after the decimal point '.'
    pub scale: Option<u16>,
}

impl DecimalOptions {
    pub fn new(precision: Option<u16>, scale: Option<u16>) -> Self {
        Self { precision, scale }
    }
}
