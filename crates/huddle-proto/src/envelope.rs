//! Envelope type combining event name and payload.
//!
//! An `Envelope` is the unit the transport moves:
//! - one-byte name length followed by the UTF-8 event name
//! - four-byte big-endian payload length followed by the CBOR payload
//!
//! This is a pure data holder (name + bytes). For typed access, see
//! [`crate::Outbound::into_envelope`] and [`crate::Inbound::from_envelope`].

use bytes::{Buf, BufMut, Bytes};

use crate::{
    EventName,
    errors::{ProtocolError, Result},
};

/// Named event with raw payload bytes.
///
/// # Invariants
///
/// - `name` is always part of the known vocabulary; unknown names never
///   produce an `Envelope`.
/// - Encoded payloads never exceed [`Envelope::MAX_PAYLOAD_SIZE`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    /// Event name.
    pub name: EventName,
    /// Raw payload bytes (already CBOR-encoded).
    pub payload: Bytes,
}

impl Envelope {
    /// Largest payload accepted in either direction (64 KiB).
    pub const MAX_PAYLOAD_SIZE: usize = 64 * 1024;

    const NAME_LEN_SIZE: usize = 1;
    const PAYLOAD_LEN_SIZE: usize = 4;

    /// Create an envelope from an event name and encoded payload.
    #[must_use]
    pub fn new(name: EventName, payload: impl Into<Bytes>) -> Self {
        Self { name, payload: payload.into() }
    }

    /// Number of bytes [`Envelope::encode`] writes.
    pub fn encoded_len(&self) -> usize {
        Self::NAME_LEN_SIZE + self.name.as_str().len() + Self::PAYLOAD_LEN_SIZE + self.payload.len()
    }

    /// Encode envelope into buffer.
    ///
    /// # Errors
    ///
    /// - `ProtocolError::PayloadTooLarge` if the payload exceeds
    ///   `MAX_PAYLOAD_SIZE`
    pub fn encode(&self, dst: &mut impl BufMut) -> Result<()> {
        if self.payload.len() > Self::MAX_PAYLOAD_SIZE {
            return Err(ProtocolError::PayloadTooLarge {
                size: self.payload.len(),
                max: Self::MAX_PAYLOAD_SIZE,
            });
        }

        let name = self.name.as_str().as_bytes();
        let name_len =
            u8::try_from(name.len()).map_err(|_| ProtocolError::NameTooLong(name.len()))?;
        let payload_len = u32::try_from(self.payload.len()).map_err(|_| {
            ProtocolError::PayloadTooLarge { size: self.payload.len(), max: Self::MAX_PAYLOAD_SIZE }
        })?;

        dst.put_u8(name_len);
        dst.put_slice(name);
        dst.put_u32(payload_len);
        dst.put_slice(&self.payload);

        Ok(())
    }

    /// Encode into a freshly allocated buffer.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::with_capacity(self.encoded_len());
        self.encode(&mut buf)?;
        Ok(buf)
    }

    /// Decode envelope from wire format.
    ///
    /// Returns an envelope with raw payload bytes; the payload is not
    /// deserialized here.
    ///
    /// # Errors
    ///
    /// - `ProtocolError::Truncated` if input ends early
    /// - `ProtocolError::UnknownEvent` if the name is not in the vocabulary
    /// - `ProtocolError::PayloadTooLarge` if the declared payload length
    ///   exceeds `MAX_PAYLOAD_SIZE` (checked before reading the payload)
    pub fn decode(mut src: &[u8]) -> Result<Self> {
        ensure_remaining(src, Self::NAME_LEN_SIZE)?;
        let name_len = usize::from(src.get_u8());

        ensure_remaining(src, name_len)?;
        let raw_name = String::from_utf8_lossy(&src[..name_len]).into_owned();
        src.advance(name_len);
        let name = EventName::from_name(&raw_name).ok_or(ProtocolError::UnknownEvent(raw_name))?;

        ensure_remaining(src, Self::PAYLOAD_LEN_SIZE)?;
        let payload_len = src.get_u32() as usize;
        if payload_len > Self::MAX_PAYLOAD_SIZE {
            return Err(ProtocolError::PayloadTooLarge {
                size: payload_len,
                max: Self::MAX_PAYLOAD_SIZE,
            });
        }

        ensure_remaining(src, payload_len)?;
        let payload = Bytes::copy_from_slice(&src[..payload_len]);

        Ok(Self { name, payload })
    }
}

fn ensure_remaining(src: &[u8], expected: usize) -> Result<()> {
    if src.len() < expected {
        return Err(ProtocolError::Truncated { expected, actual: src.len() });
    }
    Ok(())
}
