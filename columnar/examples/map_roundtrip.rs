use hive_columnar_text::{
    ColumnBuilder, ColumnDataBuilder, ColumnType, Result, TextEncodingOptions,
};

fn main() -> Result<()> {
    let ty = ColumnType::map(ColumnType::Varchar, ColumnType::Float);
    let options = TextEncodingOptions {
        escape_byte: Some(b'\\'),
        ..TextEncodingOptions::default()
    };
    let encoding = options.encoding(&ty)?;

    let mut builder = ColumnBuilder::new(&ty, 2);
    builder.append_map_with(|keys, values| {
        keys.append_bytes(b"pi")?;
        values.append_long(std::f32::consts::PI.to_bits() as i32 as i64)?;
        keys.append_bytes(b"missing")?;
        values.append_null();
        Ok(())
    })?;
    builder.append_null();
    let column = builder.build();

    let mut output = ColumnDataBuilder::with_row_separator(b'\n');
    encoding.encode_column(&column, &mut output)?;
    println!("{}", output.bytes().escape_ascii());

    let decoded = encoding.decode_column(&output.finish())?;
    assert_eq!(decoded, column);
    Ok(())
}
