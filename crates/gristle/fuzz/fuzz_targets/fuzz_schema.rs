//! Fuzz target for the schema loader.
//!
//! Any text must either load or be rejected with a schema error; the loader
//! must never panic.

#![no_main]

use gristle::SchemaDocument;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() > 64 * 1024 {
        return;
    }
    if let Ok(text) = std::str::from_utf8(data) {
        let _ = SchemaDocument::parse(text);
    }
});
