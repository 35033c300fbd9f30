use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

/// Logical type of a column as far as the text encoding is concerned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Float,
    Double,
    BigInt,
    Varchar,
    Map {
        key: Box<ColumnType>,
        value: Box<ColumnType>,
    },
}

impl ColumnType {
    pub fn map(key: ColumnType, value: ColumnType) -> Self {
        ColumnType::Map {
            key: Box::new(key),
            value: Box::new(value),
        }
    }

    pub fn is_primitive(&self) -> bool {
        !matches!(self, ColumnType::Map { .. })
    }
}

impl Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnType::Float => f.write_str("real"),
            ColumnType::Double => f.write_str("double"),
            ColumnType::BigInt => f.write_str("bigint"),
            ColumnType::Varchar => f.write_str("varchar"),
            ColumnType::Map { key, value } => write!(f, "map({}, {})", key, value),
        }
    }
}
