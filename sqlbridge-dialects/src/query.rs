use enum_as_inner::EnumAsInner;
use serde::Serialize;
use sqlbridge_core::{
    data::{DataType, DataValue},
    sqlil,
};

/// A query parameter
#[derive(Debug, Clone, PartialEq, Serialize, EnumAsInner)]
pub enum QueryParam {
    /// A late-bound parameter whose value is supplied at execution
    Dynamic(sqlil::Parameter),
    /// A constant value taken from the statement tree
    Constant(DataValue),
}

impl QueryParam {
    pub fn dynamic(param: sqlil::Parameter) -> Self {
        Self::Dynamic(param)
    }

    pub fn dynamic2(id: u32, r#type: DataType) -> Self {
        Self::Dynamic(sqlil::Parameter::new(r#type, id))
    }

    pub fn constant(value: impl Into<DataValue>) -> Self {
        Self::Constant(value.into())
    }

    /// Gets the type of the query parameter
    pub fn r#type(&self) -> DataType {
        match self {
            QueryParam::Dynamic(p) => p.r#type.clone(),
            QueryParam::Constant(v) => v.r#type(),
        }
    }
}

/// SQL text in the dialect of the target database, ready to be executed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompiledQuery {
    pub sql: String,
    /// Bind values in placeholder order
    pub params: Vec<QueryParam>,
}

impl CompiledQuery {
    pub fn new(sql: impl Into<String>, params: Vec<QueryParam>) -> Self {
        Self {
            sql: sql.into(),
            params,
        }
    }
}
