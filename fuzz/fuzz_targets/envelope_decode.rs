//! Fuzz target for `Envelope::decode`
//!
//! Arbitrary bytes off the channel must never panic the decoder. Anything
//! that does decode must re-encode to the bytes it was read from, and its
//! inbound view must either validate or be rejected with an error.

#![no_main]

use huddle_proto::{Envelope, Inbound};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(envelope) = Envelope::decode(data) else {
        return;
    };

    let encoded = envelope.to_bytes().expect("decoded envelope re-encodes");
    assert_eq!(&encoded[..], &data[..encoded.len()]);

    let _ = Inbound::from_envelope(&envelope);
});
