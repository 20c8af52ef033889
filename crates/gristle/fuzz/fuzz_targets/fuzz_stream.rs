//! Fuzz target for the read-validate-write loop.
//!
//! Sniffs a dialect from the input, then runs every record through a
//! field-count check and both outputs.

#![no_main]

use std::io::Cursor;

use gristle::{InputStream, OutputRouter, RouterOptions, Sniffer, ValidationRun};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() > 100_000 {
        return;
    }
    let Ok(dialect) = Sniffer::new().sniff_bytes(data) else {
        return;
    };

    let mut stream = InputStream::from_reader("fuzz", Cursor::new(data.to_vec()), dialect);
    let mut router = OutputRouter::new(
        ("good".to_string(), Vec::new()),
        ("bad".to_string(), Vec::new()),
        RouterOptions {
            errmsg: true,
            ..Default::default()
        },
        &dialect,
    );
    let mut run = ValidationRun::new(&dialect, None, None);
    let _ = run.process(&mut stream, &mut router);
});
