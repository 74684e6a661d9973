//! Fuzz target for CRLF line framing.
//!
//! Feeds arbitrary bytes to the codec in two chunks and checks that the
//! split point never changes which lines come out.

#![no_main]

use bytes::BytesMut;
use libfuzzer_sys::fuzz_target;
use slirc_client::LineCodec;
use tokio_util::codec::Decoder;

fn decode(chunks: &[&[u8]]) -> Vec<String> {
    let mut codec = LineCodec::default();
    let mut buf = BytesMut::new();
    let mut lines = Vec::new();
    for chunk in chunks {
        buf.extend_from_slice(chunk);
        while let Ok(Some(line)) = codec.decode(&mut buf) {
            lines.push(line);
        }
    }
    lines
}

fuzz_target!(|data: &[u8]| {
    let Some((&split, data)) = data.split_first() else {
        return;
    };
    let at = usize::from(split) % (data.len() + 1);
    let (a, b) = data.split_at(at);
    assert_eq!(decode(&[data]), decode(&[a, b]));
});
