use crate::{Column, ColumnBuilder, ColumnType, Result, TextCodecError};

use super::{TextColumnEncoding, TextEncodingBase};

/// BIGINT as optionally signed decimal digits.
#[derive(Debug, Clone)]
pub struct LongEncoding {
    base: TextEncodingBase,
}

impl LongEncoding {
    pub fn new(null_sequence: impl Into<Vec<u8>>) -> Self {
        Self {
            base: TextEncodingBase::new(null_sequence, None),
        }
    }
}

impl TextColumnEncoding for LongEncoding {
    fn base(&self) -> &TextEncodingBase {
        &self.base
    }

    fn create_builder(&self, capacity: usize) -> ColumnBuilder {
        ColumnBuilder::new(&ColumnType::BigInt, capacity)
    }

    fn encode_value_into(&self, column: &Column, position: usize, output: &mut Vec<u8>) -> Result<()> {
        match column.as_long()?.get(position) {
            Some(value) => output.extend_from_slice(value.to_string().as_bytes()),
            None => output.extend_from_slice(&self.base.null_sequence),
        }
        Ok(())
    }

    /// An empty span is NULL whatever the null sequence.
    fn is_null_span(&self, slice: &[u8], offset: usize, length: usize) -> bool {
        length == 0 || self.base.is_null_sequence(slice, offset, length)
    }

    fn decode_value_into(
        &self,
        builder: &mut ColumnBuilder,
        slice: &[u8],
        offset: usize,
        length: usize,
    ) -> Result<()> {
        if self.is_null_span(slice, offset, length) {
            builder.append_null();
            return Ok(());
        }
        let value = parse_long(slice, offset, length)?;
        builder.append_long(value)
    }
}

fn parse_long(slice: &[u8], offset: usize, length: usize) -> Result<i64> {
    let (negative, digits) = match &slice[offset..offset + length] {
        [b'-', digits @ ..] => (true, digits),
        [b'+', digits @ ..] => (false, digits),
        digits => (false, digits),
    };
    if digits.is_empty() {
        return Err(TextCodecError::corrupt("invalid bigint value", slice, offset, length));
    }

    // accumulate negatively so that i64::MIN does not overflow
    let mut value: i64 = 0;
    for &b in digits {
        let digit = match b {
            b'0'..=b'9' => (b - b'0') as i64,
            _ => return Err(TextCodecError::corrupt("invalid bigint value", slice, offset, length)),
        };
        value = value
            .checked_mul(10)
            .and_then(|v| v.checked_sub(digit))
            .ok_or_else(|| TextCodecError::corrupt("bigint value out of range", slice, offset, length))?;
    }
    if negative {
        Ok(value)
    } else {
        value
            .checked_neg()
            .ok_or_else(|| TextCodecError::corrupt("bigint value out of range", slice, offset, length))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{ColumnDataBuilder, LongColumn};

    fn parse(text: &str) -> Result<i64> {
        parse_long(text.as_bytes(), 0, text.len())
    }

    #[test]
    fn parse_bigint() {
        assert_eq!(parse("0").unwrap(), 0);
        assert_eq!(parse("+42").unwrap(), 42);
        assert_eq!(parse("-42").unwrap(), -42);
        assert_eq!(parse("9223372036854775807").unwrap(), i64::MAX);
        assert_eq!(parse("-9223372036854775808").unwrap(), i64::MIN);
    }

    #[test]
    fn parse_bigint_failures() {
        for text in ["", "-", "1.0", "12a", "9223372036854775808", " 1"] {
            assert!(
                matches!(parse(text), Err(TextCodecError::CorruptData { .. })),
                "{text:?} should not parse"
            );
        }
    }

    #[test]
    fn column_round_trip() {
        let encoding = LongEncoding::new(&b"\\N"[..]);
        let column = Column::Long(LongColumn::from_iter([Some(1), None, Some(i64::MIN)]));
        let mut output = ColumnDataBuilder::with_row_separator(b'\n');
        encoding.encode_column(&column, &mut output).unwrap();
        assert_eq!(output.bytes(), b"1\n\\N\n-9223372036854775808\n");
        let decoded = encoding.decode_column(&output.finish()).unwrap();
        assert_eq!(decoded, column);
    }
}
