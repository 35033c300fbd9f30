mod float;
mod long;
mod map;
mod string;

use std::fmt::Debug;

pub use float::{DoubleEncoding, FloatEncoding, TextFloat, TextFloatEncoding};
pub use long::LongEncoding;
pub use map::MapEncoding;
pub use string::StringEncoding;

use crate::{Column, ColumnBuilder, ColumnData, EncodeOutput, Result};

/// Conversion between one column type and its text form inside a row buffer.
///
/// The single value methods are what composite encodings call recursively on
/// their children; the column methods frame a whole batch.
pub trait TextColumnEncoding: Debug + Send + Sync {
    /// Configuration shared by every text encoding.
    fn base(&self) -> &TextEncodingBase;

    fn create_builder(&self, capacity: usize) -> ColumnBuilder;

    /// Writes the value at `position` without any trailing separator.
    fn encode_value_into(&self, column: &Column, position: usize, output: &mut Vec<u8>) -> Result<()>;

    /// Whether `decode_value_into` reads `slice[offset..offset + length]` as NULL.
    fn is_null_span(&self, slice: &[u8], offset: usize, length: usize) -> bool {
        self.base().is_null_sequence(slice, offset, length)
    }

    /// Decodes the non-null span `slice[offset..offset + length]` and appends it to `builder`.
    fn decode_value_into(
        &self,
        builder: &mut ColumnBuilder,
        slice: &[u8],
        offset: usize,
        length: usize,
    ) -> Result<()>;

    fn encode_column(&self, column: &Column, output: &mut dyn EncodeOutput) -> Result<()> {
        for position in 0..column.len() {
            if column.is_null(position) {
                output.write_bytes(&self.base().null_sequence);
            } else {
                self.encode_value_into(column, position, output.output())?;
            }
            output.close_entry();
        }
        Ok(())
    }

    fn decode_column(&self, column_data: &ColumnData) -> Result<Column> {
        let size = column_data.row_count();
        let mut builder = self.create_builder(size);
        let slice = column_data.slice();
        for row in 0..size {
            let offset = column_data.offset(row);
            let length = column_data.length(row);
            if length == 0 || self.base().is_null_sequence(slice, offset, length) {
                builder.append_null();
            } else {
                self.decode_value_into(&mut builder, slice, offset, length)?;
            }
        }
        tracing::trace!(rows = size, "decoded text column");
        Ok(builder.build())
    }
}

/// The null sequence and escape byte every text encoding is configured with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEncodingBase {
    pub(crate) null_sequence: Vec<u8>,
    pub(crate) escape_byte: Option<u8>,
}

impl TextEncodingBase {
    pub fn new(null_sequence: impl Into<Vec<u8>>, escape_byte: Option<u8>) -> Self {
        Self {
            null_sequence: null_sequence.into(),
            escape_byte,
        }
    }

    pub fn null_sequence(&self) -> &[u8] {
        &self.null_sequence
    }

    pub fn escape_byte(&self) -> Option<u8> {
        self.escape_byte
    }

    #[inline]
    pub fn is_null_sequence(&self, slice: &[u8], offset: usize, length: usize) -> bool {
        slice[offset..offset + length] == self.null_sequence[..]
    }

    #[inline]
    pub fn is_escape_byte(&self, byte: u8) -> bool {
        self.escape_byte == Some(byte)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn null_sequence_matches_exactly() {
        let base = TextEncodingBase::new(&b"\\N"[..], None);
        let slice = b"x\\N\\Ny";
        assert!(base.is_null_sequence(slice, 1, 2));
        assert!(!base.is_null_sequence(slice, 1, 3));
        assert!(!base.is_null_sequence(slice, 0, 0));

        let empty = TextEncodingBase::new(Vec::new(), None);
        assert!(empty.is_null_sequence(slice, 3, 0));
        assert!(!empty.is_null_sequence(slice, 3, 1));
    }

    #[test]
    fn escape_byte_is_optional() {
        assert!(!TextEncodingBase::new(Vec::new(), None).is_escape_byte(b'\\'));
        assert!(TextEncodingBase::new(Vec::new(), Some(b'\\')).is_escape_byte(b'\\'));
    }
}
