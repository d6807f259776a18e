//! Fuzz target for `Inbound::from_envelope` and `Outbound::from_envelope`
//!
//! Feeds the same CBOR bytes under every event name to check that malformed
//! payloads, wrong-shape payloads and payloads for the wrong direction are
//! rejected without panicking. An accepted inbound payload must survive a
//! second trip through the codec unchanged.

#![no_main]

use bytes::Bytes;
use huddle_proto::{Envelope, EventName, Inbound, Outbound};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    for name in EventName::INBOUND.into_iter().chain(EventName::OUTBOUND) {
        let envelope = Envelope::new(name, Bytes::copy_from_slice(data));

        let _ = Outbound::from_envelope(&envelope);

        if let Ok(inbound) = Inbound::from_envelope(&envelope) {
            let again = inbound.clone().into_envelope().expect("accepted payload re-encodes");
            let decoded = Inbound::from_envelope(&again).expect("re-encoded payload decodes");
            assert_eq!(decoded, inbound);
        }
    }
});
