use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{
    ColumnType, DoubleEncoding, FloatEncoding, LongEncoding, MapEncoding, Result, StringEncoding,
    TextCodecError, TextColumnEncoding,
};

pub const NULL_FORMAT_KEY: &str = "serialization.null.format";
pub const FIELD_DELIM_KEY: &str = "field.delim";
pub const SERIALIZATION_FORMAT_KEY: &str = "serialization.format";
pub const COLLECTION_DELIM_KEY: &str = "collection.delim";
/// The misspelled key Hive has always written.
pub const COLLECTION_DELIM_HIVE_KEY: &str = "colelection.delim";
pub const MAPKEY_DELIM_KEY: &str = "mapkey.delim";
pub const ESCAPE_DELIM_KEY: &str = "escape.delim";

pub const DEFAULT_NULL_SEQUENCE: &[u8] = b"\\N";

/// `\x01..=\x08`, then the control bytes that are neither `\n` nor `\r`.
pub const DEFAULT_SEPARATORS: [u8; 23] = [
    1, 2, 3, 4, 5, 6, 7, 8, 11, 12, 14, 15, 16, 17, 18, 19, 20, 21, 22, 23, 24, 25, 26,
];

/// How values are laid out in a text file.
///
/// `separators[0]` splits the columns of a row, every deeper nesting level
/// uses the next byte.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextEncodingOptions {
    pub null_sequence: Vec<u8>,
    pub separators: Vec<u8>,
    pub escape_byte: Option<u8>,
}

impl Default for TextEncodingOptions {
    fn default() -> Self {
        Self {
            null_sequence: DEFAULT_NULL_SEQUENCE.to_vec(),
            separators: DEFAULT_SEPARATORS.to_vec(),
            escape_byte: None,
        }
    }
}

impl TextEncodingOptions {
    /// Reads the options from Hive table (SerDe) properties.
    pub fn from_schema(properties: &HashMap<String, String>) -> Result<Self> {
        let mut options = TextEncodingOptions::default();

        if let Some(null_format) = properties.get(NULL_FORMAT_KEY) {
            options.null_sequence = null_format.as_bytes().to_vec();
        }

        let field = properties
            .get(FIELD_DELIM_KEY)
            .map(|v| (FIELD_DELIM_KEY, v))
            .or_else(|| {
                properties
                    .get(SERIALIZATION_FORMAT_KEY)
                    .map(|v| (SERIALIZATION_FORMAT_KEY, v))
            });
        if let Some((key, value)) = field {
            options.separators[0] = parse_byte(key, value)?;
        }

        let collection = properties
            .get(COLLECTION_DELIM_HIVE_KEY)
            .map(|v| (COLLECTION_DELIM_HIVE_KEY, v))
            .or_else(|| {
                properties
                    .get(COLLECTION_DELIM_KEY)
                    .map(|v| (COLLECTION_DELIM_KEY, v))
            });
        if let Some((key, value)) = collection {
            options.separators[1] = parse_byte(key, value)?;
        }

        if let Some(value) = properties.get(MAPKEY_DELIM_KEY) {
            options.separators[2] = parse_byte(MAPKEY_DELIM_KEY, value)?;
        }

        if let Some(value) = properties.get(ESCAPE_DELIM_KEY) {
            options.escape_byte = Some(parse_byte(ESCAPE_DELIM_KEY, value)?);
        }

        Ok(options)
    }

    /// The separator of nesting level `depth`.
    pub fn separator(&self, depth: usize) -> Result<u8> {
        self.separators
            .get(depth)
            .copied()
            .ok_or(TextCodecError::NestingTooDeep(depth))
    }

    /// Builds the encoding of a top-level column.
    pub fn encoding(&self, ty: &ColumnType) -> Result<Box<dyn TextColumnEncoding>> {
        self.encoding_at(ty, 1)
    }

    fn encoding_at(&self, ty: &ColumnType, depth: usize) -> Result<Box<dyn TextColumnEncoding>> {
        let null_sequence = self.null_sequence.clone();
        Ok(match ty {
            ColumnType::Float => Box::new(FloatEncoding::new(null_sequence)),
            ColumnType::Double => Box::new(DoubleEncoding::new(null_sequence)),
            ColumnType::BigInt => Box::new(LongEncoding::new(null_sequence)),
            ColumnType::Varchar => Box::new(StringEncoding::new(
                null_sequence,
                self.escape_byte,
                self.separators.clone(),
            )),
            ColumnType::Map { key, value } => {
                if !key.is_primitive() {
                    return Err(TextCodecError::UnsupportedType(ty.to_string()));
                }
                let element_separator = self.separator(depth)?;
                let key_value_separator = self.separator(depth + 1)?;
                Box::new(MapEncoding::new(
                    null_sequence,
                    element_separator,
                    key_value_separator,
                    self.escape_byte,
                    self.encoding_at(key, depth + 2)?,
                    self.encoding_at(value, depth + 2)?,
                ))
            }
        })
    }
}

/// A delimiter property is either a signed decimal byte or a literal whose first byte is used.
fn parse_byte(key: &str, value: &str) -> Result<u8> {
    if value.is_empty() {
        return Err(TextCodecError::InvalidOption {
            key: key.to_string(),
            reason: "value is empty".to_string(),
        });
    }
    match value.parse::<i8>() {
        Ok(number) => Ok(number as u8),
        Err(_) => Ok(value.as_bytes()[0]),
    }
}
