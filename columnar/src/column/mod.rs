mod builder;

use std::ops::Range;

pub use builder::{BytesColumnBuilder, ColumnBuilder, LongColumnBuilder, MapColumnBuilder};

use crate::{Result, TextCodecError};

/// A batch of values of one column, one value per row.
///
/// Numeric columns keep every value in a 64-bit storage cell: BIGINT as is,
/// DOUBLE as its IEEE-754 bits and REAL as its 32 IEEE-754 bits, sign-extended,
/// in the low half of the cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    Long(LongColumn),
    Bytes(BytesColumn),
    Map(MapColumn),
}

impl Column {
    pub fn len(&self) -> usize {
        match self {
            Column::Long(c) => c.len(),
            Column::Bytes(c) => c.len(),
            Column::Map(c) => c.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_null(&self, position: usize) -> bool {
        match self {
            Column::Long(c) => c.nulls[position],
            Column::Bytes(c) => c.nulls[position],
            Column::Map(c) => c.nulls[position],
        }
    }

    pub fn null_count(&self) -> usize {
        (0..self.len()).filter(|&p| self.is_null(p)).count()
    }

    pub(crate) fn kind_name(&self) -> &'static str {
        match self {
            Column::Long(_) => "long",
            Column::Bytes(_) => "bytes",
            Column::Map(_) => "map",
        }
    }

    pub fn as_long(&self) -> Result<&LongColumn> {
        match self {
            Column::Long(c) => Ok(c),
            other => Err(TextCodecError::TypeMismatch {
                expected: "long",
                found: other.kind_name(),
            }),
        }
    }

    pub fn as_bytes(&self) -> Result<&BytesColumn> {
        match self {
            Column::Bytes(c) => Ok(c),
            other => Err(TextCodecError::TypeMismatch {
                expected: "bytes",
                found: other.kind_name(),
            }),
        }
    }

    pub fn as_map(&self) -> Result<&MapColumn> {
        match self {
            Column::Map(c) => Ok(c),
            other => Err(TextCodecError::TypeMismatch {
                expected: "map",
                found: other.kind_name(),
            }),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LongColumn {
    values: Vec<i64>,
    nulls: Vec<bool>,
}

impl LongColumn {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Raw storage cell, meaningless for null rows.
    pub fn cell(&self, position: usize) -> i64 {
        self.values[position]
    }

    pub fn get(&self, position: usize) -> Option<i64> {
        (!self.nulls[position]).then(|| self.values[position])
    }

    pub fn get_f32(&self, position: usize) -> Option<f32> {
        self.get(position).map(|cell| f32::from_bits(cell as u32))
    }

    pub fn get_f64(&self, position: usize) -> Option<f64> {
        self.get(position).map(|cell| f64::from_bits(cell as u64))
    }

    pub fn from_floats<I: IntoIterator<Item = Option<f32>>>(iter: I) -> Self {
        iter.into_iter()
            .map(|v| v.map(|f| f.to_bits() as i32 as i64))
            .collect()
    }

    pub fn from_doubles<I: IntoIterator<Item = Option<f64>>>(iter: I) -> Self {
        iter.into_iter()
            .map(|v| v.map(|f| f.to_bits() as i64))
            .collect()
    }
}

impl FromIterator<Option<i64>> for LongColumn {
    fn from_iter<T: IntoIterator<Item = Option<i64>>>(iter: T) -> Self {
        let mut column = LongColumn::default();
        for value in iter {
            column.values.push(value.unwrap_or_default());
            column.nulls.push(value.is_none());
        }
        column
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BytesColumn {
    offsets: Vec<usize>,
    data: Vec<u8>,
    nulls: Vec<bool>,
}

impl Default for BytesColumn {
    fn default() -> Self {
        Self {
            offsets: vec![0],
            data: Vec::new(),
            nulls: Vec::new(),
        }
    }
}

impl BytesColumn {
    pub fn len(&self) -> usize {
        self.nulls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nulls.is_empty()
    }

    /// Bytes of the row, empty for null rows.
    pub fn value(&self, position: usize) -> &[u8] {
        &self.data[self.offsets[position]..self.offsets[position + 1]]
    }

    pub fn get(&self, position: usize) -> Option<&[u8]> {
        (!self.nulls[position]).then(|| self.value(position))
    }
}

impl<'a> FromIterator<Option<&'a [u8]>> for BytesColumn {
    fn from_iter<T: IntoIterator<Item = Option<&'a [u8]>>>(iter: T) -> Self {
        let mut column = BytesColumn::default();
        for value in iter {
            column.data.extend_from_slice(value.unwrap_or_default());
            column.offsets.push(column.data.len());
            column.nulls.push(value.is_none());
        }
        column
    }
}

impl<'a> FromIterator<Option<&'a str>> for BytesColumn {
    fn from_iter<T: IntoIterator<Item = Option<&'a str>>>(iter: T) -> Self {
        iter.into_iter().map(|v| v.map(str::as_bytes)).collect()
    }
}

/// Map rows stored as ranges into a key column and a value column of equal length.
#[derive(Debug, Clone, PartialEq)]
pub struct MapColumn {
    offsets: Vec<usize>,
    keys: Box<Column>,
    values: Box<Column>,
    nulls: Vec<bool>,
}

impl MapColumn {
    pub fn len(&self) -> usize {
        self.nulls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nulls.is_empty()
    }

    pub fn keys(&self) -> &Column {
        &self.keys
    }

    pub fn values(&self) -> &Column {
        &self.values
    }

    /// Positions in [`MapColumn::keys`] and [`MapColumn::values`] holding the entries of the row.
    pub fn entries(&self, position: usize) -> Range<usize> {
        self.offsets[position]..self.offsets[position + 1]
    }

    pub fn entry_count(&self, position: usize) -> usize {
        self.entries(position).len()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn float_cells_use_the_low_half() {
        let column = LongColumn::from_floats([Some(1.5), None, Some(-0.0)]);
        assert_eq!(column.cell(0), 1.5f32.to_bits() as i32 as i64);
        assert_eq!(column.get_f32(0), Some(1.5));
        assert_eq!(column.get(1), None);
        assert_eq!(column.get_f32(2).map(f32::to_bits), Some((-0.0f32).to_bits()));
    }

    #[test]
    fn bytes_column_tracks_nulls_separately() {
        let column: BytesColumn = [Some("ab"), None, Some("")].into_iter().collect();
        assert_eq!(column.len(), 3);
        assert_eq!(column.get(0), Some(&b"ab"[..]));
        assert_eq!(column.get(1), None);
        assert_eq!(column.get(2), Some(&b""[..]));
    }

    #[test]
    fn accessor_of_wrong_kind_is_an_error() {
        let column = Column::Long(LongColumn::from_iter([Some(1)]));
        assert_eq!(
            column.as_map().unwrap_err(),
            TextCodecError::TypeMismatch {
                expected: "map",
                found: "long"
            }
        );
    }
}
