#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Errors are fine, panics are bugs.
    if let Ok(document) = nota::xml::parse_bytes(data) {
        let _ = nota::rules::Validator::default().validate(&document);
    }
});
