#![no_main]
use hive_columnar_text_fuzz::check_float_round_trip;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|bits: u32| {
    check_float_round_trip(bits);
});
