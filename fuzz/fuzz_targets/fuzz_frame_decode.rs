#![no_main]

//! Frame decoder fuzzer.
//!
//! Feeds arbitrary text to the frame decoder. Decoding may fail but must not
//! panic, and any map it accepts must re-encode to a frame that decodes to
//! the same map.

use arbitrary::Arbitrary;
use floodbot::protocol::{decode_frame, encode_frame};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct FrameInput {
    width: u8,
    height: u8,
    productions: Vec<u8>,
    line: String,
}

fuzz_target!(|input: FrameInput| {
    let width = u16::from(input.width % 32);
    let height = u16::from(input.height % 32);

    let Ok(map) = decode_frame(width, height, &input.productions, &input.line) else {
        return;
    };

    let productions: Vec<u8> = map.cells().iter().map(|c| c.production).collect();
    let again = decode_frame(width, height, &productions, &encode_frame(&map)).unwrap();
    assert_eq!(map, again);
});
