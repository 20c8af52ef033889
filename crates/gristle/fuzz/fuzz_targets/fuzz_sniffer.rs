//! Fuzz target for dialect sniffing.

#![no_main]

use gristle::Sniffer;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let _ = Sniffer::new().sniff_bytes(data);
    let _ = Sniffer::with_sample_bytes(64).sniff_bytes(data);
});
