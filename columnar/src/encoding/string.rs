use crate::{Column, ColumnBuilder, ColumnType, Result};

use super::{TextColumnEncoding, TextEncodingBase};

/// VARCHAR bytes, escaped when an escape byte is configured.
///
/// On encode every separator and the escape byte itself are prefixed with the
/// escape byte; on decode each escape byte is dropped and the byte after it is
/// kept as is.
#[derive(Debug, Clone)]
pub struct StringEncoding {
    base: TextEncodingBase,
    separators: Vec<u8>,
}

impl StringEncoding {
    pub fn new(null_sequence: impl Into<Vec<u8>>, escape_byte: Option<u8>, separators: Vec<u8>) -> Self {
        Self {
            base: TextEncodingBase::new(null_sequence, escape_byte),
            separators,
        }
    }

    fn needs_escape(&self, byte: u8) -> bool {
        self.base.is_escape_byte(byte) || self.separators.contains(&byte)
    }
}

impl TextColumnEncoding for StringEncoding {
    fn base(&self) -> &TextEncodingBase {
        &self.base
    }

    fn create_builder(&self, capacity: usize) -> ColumnBuilder {
        ColumnBuilder::new(&ColumnType::Varchar, capacity)
    }

    fn encode_value_into(&self, column: &Column, position: usize, output: &mut Vec<u8>) -> Result<()> {
        let value = match column.as_bytes()?.get(position) {
            Some(value) => value,
            None => {
                output.extend_from_slice(&self.base.null_sequence);
                return Ok(());
            }
        };
        match self.base.escape_byte {
            Some(escape) => {
                for &b in value {
                    if self.needs_escape(b) {
                        output.push(escape);
                    }
                    output.push(b);
                }
            }
            None => output.extend_from_slice(value),
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
        let value = &slice[offset..offset + length];
        let escape = match self.base.escape_byte {
            Some(escape) if value.contains(&escape) => escape,
            _ => return builder.append_bytes(value),
        };

        let mut unescaped = Vec::with_capacity(value.len());
        let mut i = 0;
        while i < value.len() {
            if value[i] == escape && i + 1 < value.len() {
                i += 1;
            }
            unescaped.push(value[i]);
            i += 1;
        }
        builder.append_bytes(&unescaped)
    }
}
