use arbitrary::Arbitrary;
use hive_columnar_text::{
    Column, ColumnBuilder, ColumnDataBuilder, ColumnType, FloatEncoding, LongColumn,
    TextColumnEncoding, TextEncodingOptions,
};

/// One map row: keys are raw bytes, values are REAL bit patterns.
#[derive(Debug, Clone, Arbitrary, PartialEq)]
pub struct MapRow {
    pub entries: Vec<(Vec<u8>, Option<u32>)>,
}

pub fn map_type() -> ColumnType {
    ColumnType::map(
        ColumnType::Varchar,
        ColumnType::map(ColumnType::Varchar, ColumnType::Float),
    )
}

pub fn string_to_float() -> ColumnType {
    ColumnType::map(ColumnType::Varchar, ColumnType::Float)
}

pub fn escaped_options() -> TextEncodingOptions {
    TextEncodingOptions {
        escape_byte: Some(b'\\'),
        ..TextEncodingOptions::default()
    }
}

pub fn build_column(rows: &[Option<MapRow>]) -> Column {
    let mut builder = ColumnBuilder::new(&string_to_float(), rows.len());
    for row in rows {
        match row {
            None => builder.append_null(),
            Some(row) => builder
                .append_map_with(|keys, values| {
                    for (key, value) in &row.entries {
                        keys.append_bytes(key)?;
                        match value {
                            Some(bits) => values.append_long(*bits as i32 as i64)?,
                            None => values.append_null(),
                        }
                    }
                    Ok(())
                })
                .unwrap(),
        }
    }
    builder.build()
}

/// Decoding arbitrary bytes may fail but must never panic.
pub fn check_decode(bytes: &[u8]) {
    let encoding = escaped_options().encoding(&map_type()).unwrap();
    let mut builder = encoding.create_builder(1);
    if encoding
        .decode_value_into(&mut builder, bytes, 0, bytes.len())
        .is_ok()
    {
        assert_eq!(builder.build().len(), 1);
    }
}

/// Maps without null keys survive encoding; empty rows come back as NULL.
pub fn check_map_round_trip(rows: &[Option<MapRow>]) {
    let encoding = escaped_options().encoding(&string_to_float()).unwrap();
    let column = build_column(rows);
    let mut output = ColumnDataBuilder::new();
    encoding.encode_column(&column, &mut output).unwrap();
    let decoded = encoding.decode_column(&output.finish()).unwrap();

    let map = decoded.as_map().unwrap();
    let keys = map.keys().as_bytes().unwrap();
    let values = map.values().as_long().unwrap();
    for (position, row) in rows.iter().enumerate() {
        let row = match row {
            Some(row) if !row.entries.is_empty() => row,
            _ => {
                assert!(decoded.is_null(position));
                continue;
            }
        };
        let entries = map.entries(position);
        assert_eq!(entries.len(), row.entries.len());
        for (entry, (key, value)) in entries.zip(&row.entries) {
            assert_eq!(keys.value(entry), &key[..]);
            match (values.get_f32(entry), value) {
                (None, None) => {}
                (Some(decoded), Some(bits)) if f32::from_bits(*bits).is_nan() => {
                    assert!(decoded.is_nan())
                }
                (Some(decoded), Some(bits)) => assert_eq!(decoded.to_bits(), *bits),
                other => panic!("value mismatch {:?}", other),
            }
        }
    }
}

pub fn check_float_round_trip(bits: u32) {
    let encoding = FloatEncoding::new(&b"\\N"[..]);
    let column = Column::Long(LongColumn::from_floats([Some(f32::from_bits(bits))]));
    let mut text = Vec::new();
    encoding.encode_value_into(&column, 0, &mut text).unwrap();
    let mut builder = encoding.create_builder(1);
    encoding
        .decode_value_into(&mut builder, &text, 0, text.len())
        .unwrap();
    let decoded = builder.build();
    let decoded = decoded.as_long().unwrap().get_f32(0).unwrap();
    if f32::from_bits(bits).is_nan() {
        assert!(decoded.is_nan());
    } else {
        assert_eq!(decoded.to_bits(), bits);
    }
}
