//! ## Text encodings
//!
//! Column codecs of the Hive text SerDe family. A row of a text file is a
//! sequence of bytes where every nesting level has its own single-byte
//! separator (`\x01` between columns, `\x02` between map entries, `\x03`
//! between a key and its value, ...), an optional escape byte protects
//! separator bytes inside values, and a null sequence (`\N` by default)
//! stands for NULL.
//!
//! Every codec implements [`TextColumnEncoding`]:
//!
//! - [`FloatEncoding`] / [`DoubleEncoding`]: shortest round-trip decimal text
//! - [`LongEncoding`]: BIGINT
//! - [`StringEncoding`]: VARCHAR, escaped with the escape byte
//! - [`MapEncoding`]: `key\x03value\x02key\x03value`, recursive over its key and value encodings
//!
//! [`TextEncodingOptions`] reads the layout from Hive table properties and
//! builds the codec tree of a [`ColumnType`].
//!
//! ```ignore
//! let options = TextEncodingOptions::default();
//! let encoding = options.encoding(&ColumnType::map(ColumnType::Varchar, ColumnType::Float))?;
//! let mut output = ColumnDataBuilder::new();
//! encoding.encode_column(&column, &mut output)?;
//! let decoded = encoding.decode_column(&output.finish())?;
//! ```

mod err;
pub use err::{Result, TextCodecError};
mod types;
pub use types::ColumnType;
mod column;
pub use column::{
    BytesColumn, BytesColumnBuilder, Column, ColumnBuilder, LongColumn, LongColumnBuilder,
    MapColumn, MapColumnBuilder,
};
mod column_data;
pub use column_data::{ColumnData, ColumnDataBuilder, EncodeOutput};
mod encoding;
pub use encoding::{
    DoubleEncoding, FloatEncoding, LongEncoding, MapEncoding, StringEncoding, TextColumnEncoding,
    TextEncodingBase, TextFloat, TextFloatEncoding,
};
mod options;
pub use options::{
    TextEncodingOptions, COLLECTION_DELIM_HIVE_KEY, COLLECTION_DELIM_KEY, DEFAULT_NULL_SEQUENCE,
    DEFAULT_SEPARATORS, ESCAPE_DELIM_KEY, FIELD_DELIM_KEY, MAPKEY_DELIM_KEY, NULL_FORMAT_KEY,
    SERIALIZATION_FORMAT_KEY,
};
