use std::collections::HashMap;

use hive_columnar_text::{
    ColumnData, ColumnDataBuilder, ColumnType, TextColumnEncoding, TextEncodingOptions,
};

#[test]
fn column_type_from_json() {
    let ty: ColumnType =
        serde_json::from_str(r#"{"map": {"key": "varchar", "value": {"map": {"key": "bigint", "value": "double"}}}}"#)
            .unwrap();
    assert_eq!(
        ty,
        ColumnType::map(
            ColumnType::Varchar,
            ColumnType::map(ColumnType::BigInt, ColumnType::Double)
        )
    );
    assert_eq!(ty.to_string(), "map(varchar, map(bigint, double))");
    assert_eq!(serde_json::to_string(&ColumnType::Float).unwrap(), r#""float""#);
}

#[test]
fn options_json_round_trip() {
    let options = TextEncodingOptions {
        escape_byte: Some(b'\\'),
        ..TextEncodingOptions::default()
    };
    let json = serde_json::to_string(&options).unwrap();
    let back: TextEncodingOptions = serde_json::from_str(&json).unwrap();
    assert_eq!(back, options);
}

#[test]
fn decode_table_written_with_custom_delimiters() {
    let properties: HashMap<String, String> = [
        ("field.delim", ","),
        ("collection.delim", "|"),
        ("mapkey.delim", ":"),
        ("escape.delim", "\\"),
        ("serialization.null.format", "NULL"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();
    let options = TextEncodingOptions::from_schema(&properties).unwrap();
    let encoding = options
        .encoding(&ColumnType::map(ColumnType::Varchar, ColumnType::Float))
        .unwrap();

    let data = ColumnData::split(b"a:1.5|b:NULL\nNULL\nc\\|d:2.5e3\n", b'\n');
    let column = encoding.decode_column(&data).unwrap();
    assert_eq!(column.len(), 3);
    assert!(column.is_null(1));

    let map = column.as_map().unwrap();
    let keys = map.keys().as_bytes().unwrap();
    let values = map.values().as_long().unwrap();
    assert_eq!(map.entries(0), 0..2);
    assert_eq!(keys.value(0), b"a");
    assert_eq!(values.get_f32(0), Some(1.5));
    assert_eq!(keys.value(1), b"b");
    assert_eq!(values.get_f32(1), None);
    assert_eq!(map.entries(2), 2..3);
    assert_eq!(keys.value(2), b"c|d");
    assert_eq!(values.get_f32(2), Some(2500.0));

    let mut output = ColumnDataBuilder::with_row_separator(b'\n');
    encoding.encode_column(&column, &mut output).unwrap();
    assert_eq!(output.bytes(), b"a:1.5|b:NULL\nNULL\nc\\|d:2500.0\n");
}
