use crate::{Column, ColumnBuilder, Result, TextCodecError};

use super::{TextColumnEncoding, TextEncodingBase};

/// MAP as `key<kv>value<elem>key<kv>value...` at one nesting depth.
///
/// Keys and values are delegated to child encodings, which may be maps
/// themselves. Decoding scans the span once; a byte after the escape byte
/// never counts as a separator, but it is handed to the children untouched.
#[derive(Debug)]
pub struct MapEncoding {
    base: TextEncodingBase,
    element_separator: u8,
    key_value_separator: u8,
    key_encoding: Box<dyn TextColumnEncoding>,
    value_encoding: Box<dyn TextColumnEncoding>,
}

impl MapEncoding {
    /// The separators and the escape byte must be pairwise distinct.
    pub fn new(
        null_sequence: impl Into<Vec<u8>>,
        element_separator: u8,
        key_value_separator: u8,
        escape_byte: Option<u8>,
        key_encoding: Box<dyn TextColumnEncoding>,
        value_encoding: Box<dyn TextColumnEncoding>,
    ) -> Self {
        Self {
            base: TextEncodingBase::new(null_sequence, escape_byte),
            element_separator,
            key_value_separator,
            key_encoding,
            value_encoding,
        }
    }

    pub fn element_separator(&self) -> u8 {
        self.element_separator
    }

    pub fn key_value_separator(&self) -> u8 {
        self.key_value_separator
    }

    /// Decodes one entry spanning `slice[offset..offset + length]`.
    ///
    /// `key_value_separator` is the position of the first key/value separator
    /// of the entry, if there is one.
    fn decode_entry_into(
        &self,
        keys: &mut ColumnBuilder,
        values: &mut ColumnBuilder,
        slice: &[u8],
        offset: usize,
        length: usize,
        key_value_separator: Option<usize>,
    ) -> Result<()> {
        // without a separator the whole entry is the key and the value is null
        let key_length = key_value_separator.map_or(length, |position| position - offset);

        // keys are never null: an entry whose key reads as NULL is dropped
        if self.base.is_null_sequence(slice, offset, key_length)
            || self.key_encoding.is_null_span(slice, offset, key_length)
        {
            tracing::trace!(offset, "dropping map entry with a null key");
            return Ok(());
        }
        self.key_encoding
            .decode_value_into(keys, slice, offset, key_length)?;

        match key_value_separator {
            None => values.append_null(),
            Some(position) => {
                let value_offset = position + 1;
                let value_length = length - key_length - 1;
                if self.base.is_null_sequence(slice, value_offset, value_length) {
                    values.append_null();
                } else {
                    self.value_encoding
                        .decode_value_into(values, slice, value_offset, value_length)?;
                }
            }
        }
        Ok(())
    }
}

impl TextColumnEncoding for MapEncoding {
    fn base(&self) -> &TextEncodingBase {
        &self.base
    }

    fn create_builder(&self, capacity: usize) -> ColumnBuilder {
        ColumnBuilder::map(
            self.key_encoding.create_builder(capacity),
            self.value_encoding.create_builder(capacity),
            capacity,
        )
    }

    fn encode_value_into(&self, column: &Column, position: usize, output: &mut Vec<u8>) -> Result<()> {
        if column.is_null(position) {
            output.extend_from_slice(&self.base.null_sequence);
            return Ok(());
        }
        let map = column.as_map()?;
        let keys = map.keys();
        let values = map.values();
        let entries = map.entries(position);
        if entries.clone().any(|entry| keys.is_null(entry)) {
            return Err(TextCodecError::ProtocolViolation(
                "map must never contain null keys".to_string(),
            ));
        }

        for (i, entry) in entries.enumerate() {
            if i > 0 {
                output.push(self.element_separator);
            }
            self.key_encoding.encode_value_into(keys, entry, output)?;
            output.push(self.key_value_separator);
            if values.is_null(entry) {
                output.extend_from_slice(&self.base.null_sequence);
            } else {
                self.value_encoding.encode_value_into(values, entry, output)?;
            }
        }
        Ok(())
    }

    fn decode_value_into(
        &self,
        builder: &mut ColumnBuilder,
        slice: &[u8],
        offset: usize,
        length: usize,
    ) -> Result<()> {
        let end = offset + length;
        builder.append_map_with(|keys, values| {
            if length == 0 {
                return Ok(());
            }

            let mut entry_offset = offset;
            let mut key_value_separator = None;
            let mut position = offset;
            while position < end {
                let byte = slice[position];
                if self.base.is_escape_byte(byte) && position + 1 < end {
                    // the byte after the escape byte is data
                    position += 2;
                    continue;
                }
                if byte == self.element_separator {
                    self.decode_entry_into(
                        keys,
                        values,
                        slice,
                        entry_offset,
                        position - entry_offset,
                        key_value_separator,
                    )?;
                    entry_offset = position + 1;
                    key_value_separator = None;
                } else if byte == self.key_value_separator && key_value_separator.is_none() {
                    key_value_separator = Some(position);
                }
                position += 1;
            }
            self.decode_entry_into(
                keys,
                values,
                slice,
                entry_offset,
                end - entry_offset,
                key_value_separator,
            )
        })
    }
}
