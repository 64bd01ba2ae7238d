#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    curl2ffuf::fuzz_convert_bytes(data);
});
