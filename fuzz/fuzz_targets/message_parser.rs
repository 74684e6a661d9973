//! Fuzz target for IRC message parsing
//!
//! This fuzzer tests the robustness of the IRC message parser by feeding it
//! randomly generated input data and ensuring it doesn't panic or crash.

#![no_main]

use libfuzzer_sys::fuzz_target;
use slirc_client::{LineCodec, Message};
use std::str;

fuzz_target!(|data: &[u8]| {
    // Only fuzz valid UTF-8 strings to focus on protocol-level issues
    if let Ok(input) = str::from_utf8(data) {
        // Parsing is infallible and must never panic
        let message = Message::parse(input);

        // Serializing whatever came out must not panic either
        let _ = Message::parse(&message.to_string());

        // Outgoing line sanitization - should never panic
        let _ = LineCodec::sanitize(input.to_string());
    }
});
