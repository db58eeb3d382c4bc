#![no_main]

use libfuzzer_sys::fuzz_target;
use strata_core::frame::{self, Deframed};

fuzz_target!(|data: &[u8]| {
    // Feed arbitrary bytes to the frame decoder. It must never panic on
    // malformed input: truncated prefixes, length fields larger than the
    // buffer, bad checksums, invalid UTF-8 keys.
    match frame::decode(data) {
        Deframed::Record { record, len } => {
            assert!(len <= data.len());
            // a decoded frame must re-encode to the exact bytes it came from
            assert_eq!(frame::encode(&record), &data[..len]);
        }
        Deframed::Incomplete | Deframed::Corrupt => {}
    }

    // scanning consumes at most the buffer and never panics
    let (records, consumed) = frame::decode_all(data);
    assert!(consumed <= data.len());
    assert!(records.len() <= data.len() / frame::MIN_FRAME_LEN + 1);
});
