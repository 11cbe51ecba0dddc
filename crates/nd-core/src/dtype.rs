use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Element types a tensor buffer can hold.
///
/// Serialized by name; deserializing accepts the same aliases as
/// [`FromStr`] (`"float"`, `"double"`, `"int"`, `"long"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DType {
    /// 32-bit IEEE 754 single-precision float
    #[default]
    F32,
    /// 64-bit IEEE 754 double-precision float
    F64,
    /// 32-bit signed integer
    I32,
    /// 64-bit signed integer
    I64,
}

impl DType {
    /// Whether this dtype is an integer type.
    pub fn is_integer(&self) -> bool {
        matches!(self, DType::I32 | DType::I64)
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DType::F32 => write!(f, "f32"),
            DType::F64 => write!(f, "f64"),
            DType::I32 => write!(f, "i32"),
            DType::I64 => write!(f, "i64"),
        }
    }
}

impl FromStr for DType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "f32" | "float" => Ok(DType::F32),
            "f64" | "double" => Ok(DType::F64),
            "i32" | "int" => Ok(DType::I32),
            "i64" | "long" => Ok(DType::I64),
            other => Err(CoreError::UnknownDType(other.to_string())),
        }
    }
}

impl TryFrom<String> for DType {
    type Error = CoreError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<DType> for String {
    fn from(dtype: DType) -> Self {
        dtype.to_string()
    }
}
