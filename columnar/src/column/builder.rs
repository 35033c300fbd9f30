use crate::{ColumnType, Result, TextCodecError};

use super::{BytesColumn, Column, LongColumn, MapColumn};

/// Append-only builder of a [`Column`], driven by the decoders.
#[derive(Debug)]
pub enum ColumnBuilder {
    Long(LongColumnBuilder),
    Bytes(BytesColumnBuilder),
    Map(MapColumnBuilder),
}

impl ColumnBuilder {
    pub fn new(ty: &ColumnType, capacity: usize) -> Self {
        match ty {
            ColumnType::Float | ColumnType::Double | ColumnType::BigInt => {
                ColumnBuilder::Long(LongColumnBuilder::with_capacity(capacity))
            }
            ColumnType::Varchar => ColumnBuilder::Bytes(BytesColumnBuilder::with_capacity(capacity)),
            ColumnType::Map { key, value } => ColumnBuilder::map(
                ColumnBuilder::new(key, capacity),
                ColumnBuilder::new(value, capacity),
                capacity,
            ),
        }
    }

    /// Builder of map rows whose entries go to `keys` and `values`.
    pub fn map(keys: ColumnBuilder, values: ColumnBuilder, capacity: usize) -> Self {
        let mut offsets = Vec::with_capacity(capacity + 1);
        offsets.push(keys.len());
        ColumnBuilder::Map(MapColumnBuilder {
            offsets,
            keys: Box::new(keys),
            values: Box::new(values),
            nulls: Vec::with_capacity(capacity),
        })
    }

    pub fn len(&self) -> usize {
        match self {
            ColumnBuilder::Long(b) => b.column.len(),
            ColumnBuilder::Bytes(b) => b.column.len(),
            ColumnBuilder::Map(b) => b.nulls.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn kind_name(&self) -> &'static str {
        match self {
            ColumnBuilder::Long(_) => "long",
            ColumnBuilder::Bytes(_) => "bytes",
            ColumnBuilder::Map(_) => "map",
        }
    }

    fn mismatch(&self, expected: &'static str) -> TextCodecError {
        TextCodecError::TypeMismatch {
            expected,
            found: self.kind_name(),
        }
    }

    pub fn append_null(&mut self) {
        match self {
            ColumnBuilder::Long(b) => {
                b.column.values.push(0);
                b.column.nulls.push(true);
            }
            ColumnBuilder::Bytes(b) => {
                b.column.offsets.push(b.column.data.len());
                b.column.nulls.push(true);
            }
            ColumnBuilder::Map(b) => {
                b.offsets.push(b.keys.len());
                b.nulls.push(true);
            }
        }
    }

    /// Appends a 64-bit storage cell.
    pub fn append_long(&mut self, cell: i64) -> Result<()> {
        match self {
            ColumnBuilder::Long(b) => {
                b.column.values.push(cell);
                b.column.nulls.push(false);
                Ok(())
            }
            other => Err(other.mismatch("long")),
        }
    }

    pub fn append_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        match self {
            ColumnBuilder::Bytes(b) => {
                b.column.data.extend_from_slice(bytes);
                b.column.offsets.push(b.column.data.len());
                b.column.nulls.push(false);
                Ok(())
            }
            other => Err(other.mismatch("bytes")),
        }
    }

    /// Begins a map entry, lets `fill` append its keys and values, then closes the entry.
    ///
    /// On error the entry is left open and the builder must be discarded.
    pub fn append_map_with<F>(&mut self, fill: F) -> Result<()>
    where
        F: FnOnce(&mut ColumnBuilder, &mut ColumnBuilder) -> Result<()>,
    {
        match self {
            ColumnBuilder::Map(b) => {
                fill(&mut *b.keys, &mut *b.values)?;
                if b.keys.len() != b.values.len() {
                    return Err(TextCodecError::ProtocolViolation(format!(
                        "map entry has {} keys but {} values",
                        b.keys.len(),
                        b.values.len()
                    )));
                }
                b.offsets.push(b.keys.len());
                b.nulls.push(false);
                Ok(())
            }
            other => Err(other.mismatch("map")),
        }
    }

    pub fn build(self) -> Column {
        match self {
            ColumnBuilder::Long(b) => Column::Long(b.column),
            ColumnBuilder::Bytes(b) => Column::Bytes(b.column),
            ColumnBuilder::Map(b) => Column::Map(MapColumn {
                offsets: b.offsets,
                keys: Box::new(b.keys.build()),
                values: Box::new(b.values.build()),
                nulls: b.nulls,
            }),
        }
    }
}

#[derive(Debug, Default)]
pub struct LongColumnBuilder {
    column: LongColumn,
}

impl LongColumnBuilder {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            column: LongColumn {
                values: Vec::with_capacity(capacity),
                nulls: Vec::with_capacity(capacity),
            },
        }
    }
}

#[derive(Debug, Default)]
pub struct BytesColumnBuilder {
    column: BytesColumn,
}

impl BytesColumnBuilder {
    fn with_capacity(capacity: usize) -> Self {
        let mut offsets = Vec::with_capacity(capacity + 1);
        offsets.push(0);
        Self {
            column: BytesColumn {
                offsets,
                data: Vec::new(),
                nulls: Vec::with_capacity(capacity),
            },
        }
    }
}

#[derive(Debug)]
pub struct MapColumnBuilder {
    offsets: Vec<usize>,
    keys: Box<ColumnBuilder>,
    values: Box<ColumnBuilder>,
    nulls: Vec<bool>,
}

#[cfg(test)]
mod test {
    use super::*;

    fn string_to_long_map() -> ColumnType {
        ColumnType::map(ColumnType::Varchar, ColumnType::BigInt)
    }

    #[test]
    fn map_builder_records_entry_ranges() {
        let mut builder = ColumnBuilder::new(&string_to_long_map(), 3);
        builder
            .append_map_with(|keys, values| {
                keys.append_bytes(b"a")?;
                values.append_long(1)?;
                keys.append_bytes(b"b")?;
                values.append_null();
                Ok(())
            })
            .unwrap();
        builder.append_null();
        builder.append_map_with(|_, _| Ok(())).unwrap();

        let column = builder.build();
        let map = column.as_map().unwrap();
        assert_eq!(map.len(), 3);
        assert_eq!(map.entries(0), 0..2);
        assert!(column.is_null(1));
        assert_eq!(map.entry_count(1), 0);
        assert_eq!(map.entry_count(2), 0);
        assert!(!column.is_null(2));
        assert_eq!(map.keys().as_bytes().unwrap().get(1), Some(&b"b"[..]));
        assert_eq!(map.values().as_long().unwrap().get(1), None);
    }

    #[test]
    fn unbalanced_map_entry_is_rejected() {
        let mut builder = ColumnBuilder::new(&string_to_long_map(), 1);
        let err = builder
            .append_map_with(|keys, _| keys.append_bytes(b"a"))
            .unwrap_err();
        assert!(matches!(err, TextCodecError::ProtocolViolation(_)));
    }

    #[test]
    fn appending_the_wrong_kind_fails() {
        let mut builder = ColumnBuilder::new(&ColumnType::Float, 1);
        assert_eq!(
            builder.append_bytes(b"1.0").unwrap_err(),
            TextCodecError::TypeMismatch {
                expected: "bytes",
                found: "long"
            }
        );
    }
}
