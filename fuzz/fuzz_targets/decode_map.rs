#![no_main]
use hive_columnar_text_fuzz::check_decode;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|bytes: &[u8]| {
    check_decode(bytes);
});
