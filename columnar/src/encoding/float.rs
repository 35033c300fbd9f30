use std::{fmt::LowerExp, marker::PhantomData, str::FromStr};

use crate::{Column, ColumnBuilder, ColumnType, Result, TextCodecError};

use super::{TextColumnEncoding, TextEncodingBase};

/// A floating point type that lives in a 64-bit storage cell.
pub trait TextFloat: Copy + PartialEq + FromStr + LowerExp + Send + Sync + 'static {
    const NAN: Self;
    const INFINITY: Self;
    const NEG_INFINITY: Self;

    fn column_type() -> ColumnType;
    fn from_cell(cell: i64) -> Self;
    fn to_cell(self) -> i64;
    fn is_nan(self) -> bool;
    fn is_infinite(self) -> bool;
    fn is_sign_negative(self) -> bool;
}

impl TextFloat for f32 {
    const NAN: Self = f32::NAN;
    const INFINITY: Self = f32::INFINITY;
    const NEG_INFINITY: Self = f32::NEG_INFINITY;

    fn column_type() -> ColumnType {
        ColumnType::Float
    }

    #[inline]
    fn from_cell(cell: i64) -> Self {
        f32::from_bits(cell as u32)
    }

    #[inline]
    fn to_cell(self) -> i64 {
        self.to_bits() as i32 as i64
    }

    fn is_nan(self) -> bool {
        f32::is_nan(self)
    }

    fn is_infinite(self) -> bool {
        f32::is_infinite(self)
    }

    fn is_sign_negative(self) -> bool {
        f32::is_sign_negative(self)
    }
}

impl TextFloat for f64 {
    const NAN: Self = f64::NAN;
    const INFINITY: Self = f64::INFINITY;
    const NEG_INFINITY: Self = f64::NEG_INFINITY;

    fn column_type() -> ColumnType {
        ColumnType::Double
    }

    #[inline]
    fn from_cell(cell: i64) -> Self {
        f64::from_bits(cell as u64)
    }

    #[inline]
    fn to_cell(self) -> i64 {
        self.to_bits() as i64
    }

    fn is_nan(self) -> bool {
        f64::is_nan(self)
    }

    fn is_infinite(self) -> bool {
        f64::is_infinite(self)
    }

    fn is_sign_negative(self) -> bool {
        f64::is_sign_negative(self)
    }
}

/// Text encoding of a floating point column.
///
/// Values are written as the shortest decimal that parses back to the same
/// bits, in the canonical Hive form: plain notation with at least one
/// fractional digit for magnitudes in `[1e-3, 1e7)`, `d.dddE[-]n` otherwise,
/// and `NaN`, `Infinity`, `-Infinity` for the special values. NaN payloads are
/// not preserved.
#[derive(Debug, Clone)]
pub struct TextFloatEncoding<F> {
    base: TextEncodingBase,
    _float: PhantomData<fn() -> F>,
}

pub type FloatEncoding = TextFloatEncoding<f32>;
pub type DoubleEncoding = TextFloatEncoding<f64>;

impl<F: TextFloat> TextFloatEncoding<F> {
    pub fn new(null_sequence: impl Into<Vec<u8>>) -> Self {
        Self {
            base: TextEncodingBase::new(null_sequence, None),
            _float: PhantomData,
        }
    }
}

impl<F: TextFloat + std::fmt::Debug> TextColumnEncoding for TextFloatEncoding<F> {
    fn base(&self) -> &TextEncodingBase {
        &self.base
    }

    fn create_builder(&self, capacity: usize) -> ColumnBuilder {
        ColumnBuilder::new(&F::column_type(), capacity)
    }

    fn encode_value_into(&self, column: &Column, position: usize, output: &mut Vec<u8>) -> Result<()> {
        match column.as_long()?.get(position) {
            Some(cell) => write_float(F::from_cell(cell), output),
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
        let value: F = parse_float(slice, offset, length)?;
        builder.append_long(value.to_cell())
    }
}

pub(crate) fn write_float<F: TextFloat>(value: F, output: &mut Vec<u8>) {
    if value.is_nan() {
        output.extend_from_slice(b"NaN");
        return;
    }
    if value.is_infinite() {
        if value.is_sign_negative() {
            output.extend_from_slice(b"-Infinity");
        } else {
            output.extend_from_slice(b"Infinity");
        }
        return;
    }

    // `{:e}` yields the shortest round-trip digits as `-d.ddde-n`
    let scientific = format!("{:e}", value);
    let (negative, unsigned) = match scientific.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, scientific.as_str()),
    };
    let (mantissa, exponent) = unsigned.split_once('e').unwrap_or((unsigned, "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let digits: Vec<u8> = mantissa.bytes().filter(|&b| b != b'.').collect();
    let is_zero = digits.iter().all(|&b| b == b'0');

    if negative {
        output.push(b'-');
    }
    if is_zero || (-3..7).contains(&exponent) {
        write_plain(&digits, exponent, output);
    } else {
        output.push(digits[0]);
        output.push(b'.');
        if digits.len() > 1 {
            output.extend_from_slice(&digits[1..]);
        } else {
            output.push(b'0');
        }
        output.push(b'E');
        output.extend_from_slice(exponent.to_string().as_bytes());
    }
}

fn write_plain(digits: &[u8], exponent: i32, output: &mut Vec<u8>) {
    if exponent < 0 {
        output.extend_from_slice(b"0.");
        output.extend(std::iter::repeat(b'0').take((-exponent - 1) as usize));
        output.extend_from_slice(digits);
        return;
    }

    let integer_digits = exponent as usize + 1;
    if digits.len() > integer_digits {
        output.extend_from_slice(&digits[..integer_digits]);
        output.push(b'.');
        output.extend_from_slice(&digits[integer_digits..]);
    } else {
        output.extend_from_slice(digits);
        output.extend(std::iter::repeat(b'0').take(integer_digits - digits.len()));
        output.extend_from_slice(b".0");
    }
}

pub(crate) fn parse_float<F: TextFloat>(slice: &[u8], offset: usize, length: usize) -> Result<F> {
    let text = trim(&slice[offset..offset + length]);
    let text = strip_type_suffix(text);
    match text {
        b"NaN" | b"+NaN" | b"-NaN" => return Ok(F::NAN),
        b"Infinity" | b"+Infinity" => return Ok(F::INFINITY),
        b"-Infinity" => return Ok(F::NEG_INFINITY),
        _ => {}
    }

    let invalid = || {
        tracing::debug!(offset, length, "invalid floating point text");
        TextCodecError::corrupt("invalid float value", slice, offset, length)
    };
    // Rust also accepts `inf` and `nan` spellings, the text format does not
    if !text
        .iter()
        .all(|&b| b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'e' | b'E'))
    {
        return Err(invalid());
    }
    std::str::from_utf8(text)
        .ok()
        .and_then(|text| text.parse::<F>().ok())
        .ok_or_else(invalid)
}

fn trim(mut text: &[u8]) -> &[u8] {
    while let [first, rest @ ..] = text {
        if *first > b' ' {
            break;
        }
        text = rest;
    }
    while let [rest @ .., last] = text {
        if *last > b' ' {
            break;
        }
        text = rest;
    }
    text
}

fn strip_type_suffix(text: &[u8]) -> &[u8] {
    match text {
        [rest @ .., before, b'f' | b'F' | b'd' | b'D'] if before.is_ascii_digit() || *before == b'.' => {
            &text[..rest.len() + 1]
        }
        _ => text,
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::LongColumn;

    fn format<F: TextFloat>(value: F) -> String {
        let mut output = Vec::new();
        write_float(value, &mut output);
        String::from_utf8(output).unwrap()
    }

    fn parse(text: &str) -> Result<f32> {
        parse_float(text.as_bytes(), 0, text.len())
    }

    #[test]
    fn canonical_float_text() {
        assert_eq!(format(1.0f32), "1.0");
        assert_eq!(format(-0.0f32), "-0.0");
        assert_eq!(format(0.0f32), "0.0");
        assert_eq!(format(100.0f32), "100.0");
        assert_eq!(format(123.45f32), "123.45");
        assert_eq!(format(0.001f32), "0.001");
        assert_eq!(format(0.1f32), "0.1");
        assert_eq!(format(9999999.0f32), "9999999.0");
        assert_eq!(format(1e7f32), "1.0E7");
        assert_eq!(format(1.0e-4f32), "1.0E-4");
        assert_eq!(format(-1.5e-5f32), "-1.5E-5");
        assert_eq!(format(f32::MAX), "3.4028235E38");
        assert_eq!(format(f32::NAN), "NaN");
        assert_eq!(format(f32::INFINITY), "Infinity");
        assert_eq!(format(f32::NEG_INFINITY), "-Infinity");
    }

    #[test]
    fn canonical_double_text() {
        assert_eq!(format(0.1f64), "0.1");
        assert_eq!(format(1.0e10f64), "1.0E10");
        assert_eq!(format(f64::MIN_POSITIVE), "2.2250738585072014E-308");
    }

    #[test]
    fn parse_accepts_the_text_format() {
        assert_eq!(parse("1.5").unwrap(), 1.5);
        assert_eq!(parse("+1.5").unwrap(), 1.5);
        assert_eq!(parse("-2").unwrap(), -2.0);
        assert_eq!(parse(".5").unwrap(), 0.5);
        assert_eq!(parse("1.").unwrap(), 1.0);
        assert_eq!(parse("1e3").unwrap(), 1000.0);
        assert_eq!(parse("1.0E-4").unwrap(), 1.0e-4);
        assert_eq!(parse(" 3.25 ").unwrap(), 3.25);
        assert_eq!(parse("2.5f").unwrap(), 2.5);
        assert_eq!(parse("2D").unwrap(), 2.0);
        assert!(parse("NaN").unwrap().is_nan());
        assert_eq!(parse("Infinity").unwrap(), f32::INFINITY);
        assert_eq!(parse("-Infinity").unwrap(), f32::NEG_INFINITY);
    }

    #[test]
    fn parse_rejects_malformed_numerals() {
        for text in ["abc", "", " ", "1.2.3", "inf", "nan", "infinity", "1e", "--1", "0x10", "f"] {
            assert!(
                matches!(parse(text), Err(TextCodecError::CorruptData { .. })),
                "{text:?} should not parse"
            );
        }
    }

    #[test]
    fn corrupt_data_carries_the_span() {
        let slice = b"1.0,abc,2.0";
        let err = parse_float::<f32>(slice, 4, 3).unwrap_err();
        assert_eq!(
            err,
            TextCodecError::CorruptData {
                message: "invalid float value".to_string(),
                offset: 4,
                span: b"abc".to_vec(),
            }
        );
    }

    #[test]
    fn encode_value_reads_the_low_bits() {
        let encoding = FloatEncoding::new(&b"\\N"[..]);
        let column = Column::Long(LongColumn::from_iter([
            Some(0x4000_0000),
            Some((-1 << 32) | 0x3fc0_0000),
            None,
        ]));
        let mut output = Vec::new();
        encoding.encode_value_into(&column, 0, &mut output).unwrap();
        output.push(b',');
        encoding.encode_value_into(&column, 1, &mut output).unwrap();
        output.push(b',');
        encoding.encode_value_into(&column, 2, &mut output).unwrap();
        assert_eq!(output, b"2.0,1.5,\\N");
    }

    #[test]
    fn decode_value_sign_extends_into_the_cell() {
        let encoding = FloatEncoding::new(&b"\\N"[..]);
        let mut builder = encoding.create_builder(2);
        encoding.decode_value_into(&mut builder, b"-1.0", 0, 4).unwrap();
        encoding.decode_value_into(&mut builder, b"\\N", 0, 2).unwrap();
        let column = builder.build();
        let column = column.as_long().unwrap();
        assert_eq!(column.cell(0), (-1.0f32).to_bits() as i32 as i64);
        assert_eq!(column.get(1), None);
    }

    #[test]
    fn empty_span_is_null() {
        let encoding = FloatEncoding::new(&b"\\N"[..]);
        assert!(encoding.is_null_span(b"1.0,", 4, 0));
        assert!(encoding.is_null_span(b"1.0,\\N", 4, 2));
        assert!(!encoding.is_null_span(b"1.0,", 0, 3));

        let mut builder = encoding.create_builder(1);
        encoding.decode_value_into(&mut builder, b"1.0,", 4, 0).unwrap();
        assert_eq!(builder.build().as_long().unwrap().get(0), None);
    }
}
