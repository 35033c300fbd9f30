#![no_main]
use hive_columnar_text_fuzz::{check_map_round_trip, MapRow};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|rows: Vec<Option<MapRow>>| {
    check_map_round_trip(&rows);
});
