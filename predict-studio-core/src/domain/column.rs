use serde::{Deserialize, Serialize};

/// Column type decoded from the backend's declared dtype string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    Integer,
    Float,
    Boolean,
    DateTime,
    Categorical,
    Other(String),
}

impl ColumnType {
    /// Decode a pandas-style dtype name such as `int64`, `float32` or `object`.
    pub fn from_dtype(dtype: &str) -> Self {
        let d = dtype.trim().to_lowercase();
        if d.starts_with("int") || d.starts_with("uint") {
            ColumnType::Integer
        } else if d.starts_with("float") {
            ColumnType::Float
        } else if d == "bool" || d == "boolean" {
            ColumnType::Boolean
        } else if d.starts_with("datetime") {
            ColumnType::DateTime
        } else if d == "object" || d == "string" || d == "category" {
            ColumnType::Categorical
        } else {
            ColumnType::Other(dtype.to_string())
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnType::Integer | ColumnType::Float | ColumnType::Boolean)
    }
}

impl std::fmt::Display for ColumnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Integer => write!(f, "integer"),
            Self::Float => write!(f, "float"),
            Self::Boolean => write!(f, "boolean"),
            Self::DateTime => write!(f, "datetime"),
            Self::Categorical => write!(f, "categorical"),
            Self::Other(raw) => write!(f, "{}", raw),
        }
    }
}
