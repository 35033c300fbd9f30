use std::borrow::Cow;

/// Encoded rows of one column: a shared byte slice plus the span of every row inside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnData<'a> {
    slice: Cow<'a, [u8]>,
    offsets: Vec<usize>,
    lengths: Vec<usize>,
}

impl<'a> ColumnData<'a> {
    /// # Panics
    ///
    /// Panics if `offsets` and `lengths` differ in length or a span exceeds the slice.
    pub fn new(slice: impl Into<Cow<'a, [u8]>>, offsets: Vec<usize>, lengths: Vec<usize>) -> Self {
        let slice = slice.into();
        assert_eq!(offsets.len(), lengths.len(), "one length per offset");
        assert!(
            offsets
                .iter()
                .zip(&lengths)
                .all(|(offset, length)| offset + length <= slice.len()),
            "row span out of bounds"
        );
        Self {
            slice,
            offsets,
            lengths,
        }
    }

    /// Splits `slice` on every `separator` byte, one row per piece.
    ///
    /// A trailing separator does not start another row.
    pub fn split(slice: &'a [u8], separator: u8) -> Self {
        let mut offsets = Vec::new();
        let mut lengths = Vec::new();
        let mut start = 0;
        for (i, &b) in slice.iter().enumerate() {
            if b == separator {
                offsets.push(start);
                lengths.push(i - start);
                start = i + 1;
            }
        }
        if start < slice.len() {
            offsets.push(start);
            lengths.push(slice.len() - start);
        }
        Self {
            slice: Cow::Borrowed(slice),
            offsets,
            lengths,
        }
    }

    pub fn row_count(&self) -> usize {
        self.offsets.len()
    }

    pub fn offset(&self, row: usize) -> usize {
        self.offsets[row]
    }

    pub fn length(&self, row: usize) -> usize {
        self.lengths[row]
    }

    pub fn slice(&self) -> &[u8] {
        &self.slice
    }

    pub fn row(&self, row: usize) -> &[u8] {
        let offset = self.offsets[row];
        &self.slice[offset..offset + self.lengths[row]]
    }

    pub fn into_owned(self) -> ColumnData<'static> {
        ColumnData {
            slice: Cow::Owned(self.slice.into_owned()),
            offsets: self.offsets,
            lengths: self.lengths,
        }
    }
}

/// Sink of [`TextColumnEncoding::encode_column`](crate::TextColumnEncoding::encode_column).
///
/// Values are written into [`EncodeOutput::output`]; the framing decides what
/// `close_entry` does at each row boundary.
pub trait EncodeOutput {
    fn output(&mut self) -> &mut Vec<u8>;

    fn write_byte(&mut self, byte: u8) {
        self.output().push(byte);
    }

    fn write_bytes(&mut self, bytes: &[u8]) {
        self.output().extend_from_slice(bytes);
    }

    fn close_entry(&mut self);
}

/// Collects the rows written by an encoder back-to-back and remembers where each one ends.
#[derive(Debug, Default, Clone)]
pub struct ColumnDataBuilder {
    buffer: Vec<u8>,
    offsets: Vec<usize>,
    lengths: Vec<usize>,
    entry_start: usize,
    row_separator: Option<u8>,
}

impl ColumnDataBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes `separator` between rows, producing a buffer that [`ColumnData::split`] reads back.
    pub fn with_row_separator(separator: u8) -> Self {
        Self {
            row_separator: Some(separator),
            ..Self::default()
        }
    }

    pub fn row_count(&self) -> usize {
        self.offsets.len()
    }

    pub fn bytes(&self) -> &[u8] {
        &self.buffer
    }

    pub fn finish(self) -> ColumnData<'static> {
        ColumnData {
            slice: Cow::Owned(self.buffer),
            offsets: self.offsets,
            lengths: self.lengths,
        }
    }
}

impl EncodeOutput for ColumnDataBuilder {
    fn output(&mut self) -> &mut Vec<u8> {
        &mut self.buffer
    }

    fn close_entry(&mut self) {
        self.offsets.push(self.entry_start);
        self.lengths.push(self.buffer.len() - self.entry_start);
        if let Some(separator) = self.row_separator {
            self.buffer.push(separator);
        }
        self.entry_start = self.buffer.len();
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn builder_frames_each_closed_entry() {
        let mut builder = ColumnDataBuilder::new();
        builder.write_bytes(b"1.0");
        builder.close_entry();
        builder.close_entry();
        builder.write_byte(b'x');
        builder.close_entry();

        let data = builder.finish();
        assert_eq!(data.row_count(), 3);
        assert_eq!(data.row(0), b"1.0");
        assert_eq!(data.row(1), b"");
        assert_eq!(data.offset(2), 3);
        assert_eq!(data.length(2), 1);
    }

    #[test]
    fn split_matches_separated_builder() {
        let mut builder = ColumnDataBuilder::with_row_separator(b'\n');
        builder.write_bytes(b"a");
        builder.close_entry();
        builder.close_entry();
        builder.write_bytes(b"bc");
        builder.close_entry();
        assert_eq!(builder.bytes(), b"a\n\nbc\n");

        let split = ColumnData::split(builder.bytes(), b'\n');
        let rows: Vec<&[u8]> = (0..split.row_count()).map(|i| split.row(i)).collect();
        assert_eq!(rows, vec![&b"a"[..], b"", b"bc"]);
        assert_eq!(split.into_owned(), builder.finish());
    }
}
