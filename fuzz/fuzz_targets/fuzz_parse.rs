#![no_main]
use boardarchive::{parse_str, validate_services, ParseOptions, Schema};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    // Includes would touch the filesystem
    let options = ParseOptions::default().with_follow_includes(false);
    if let Ok(services) = parse_str(text, &options) {
        let _ = validate_services(&services, &Schema::default());
    }
});
