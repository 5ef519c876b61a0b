#![no_main]
use libfuzzer_sys::fuzz_target;
use std::sync::Arc;
use texsieve_log::{LogParser, ParserConfig};

fuzz_target!(|data: &[u8]| {
    // The parser accepts any text; it must never panic on it.
    // Lossy conversion keeps inputs that are "almost" text.
    let s = String::from_utf8_lossy(data);
    let _ = LogParser::new().parse(&s);

    // A tiny wrap width makes nearly every line a continuation.
    if let Ok(config) = ParserConfig::default().with_wrap_width(3) {
        let _ = LogParser::with_config(Arc::new(config)).parse(&s);
    }
});
