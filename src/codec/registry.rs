//! Embedded-serializer registry.
//!
//! Every serializer is identified on the wire by a stable `i32`. Ids are
//! derived deterministically from a serializer's name so that two
//! processes built from the same code agree on ids without a handshake.
//! Collisions (including with the reserved system range `[0, 40]`) are
//! resolved by deterministic salting: the name is rehashed with an
//! increasing salt until a free slot is found, so the outcome depends
//! only on registration order, not on wall-clock or process state.

// Layer 1: Standard library imports
// (none)

// Layer 2: Third-party crate imports
use bytes::{Buf, BufMut, Bytes, BytesMut};
use dashmap::DashMap;

// Layer 3: Internal module imports
use super::error::CodecError;
use super::stream::{WireDecode, WireEncode};

/// Wire identifier for a registered serializer.
pub type SerializerId = i32;

/// Upper bound (inclusive) of the range reserved for well-known system
/// serializers (clock, heartbeat, lifecycle, bus events).
pub const RESERVED_RANGE_END: SerializerId = 40;

/// Maximum number of salted rehash attempts before giving up on a name.
const MAX_SALT_ATTEMPTS: u32 = 10_000;

fn fnv1a(data: &[u8]) -> u64 {
    let mut hash: u64 = 0xcbf29ce484222325;
    for &byte in data {
        hash ^= byte as u64;
        hash = hash.wrapping_mul(0x100000001b3);
    }
    hash
}

fn candidate_id(name: &str, salt: u32) -> SerializerId {
    let mut buf = Vec::with_capacity(name.len() + 4);
    buf.extend_from_slice(name.as_bytes());
    buf.extend_from_slice(&salt.to_be_bytes());
    (fnv1a(&buf) as i32).abs()
}

/// Registry mapping serializer names to stable wire ids and back.
///
/// Grounded in the broker's `DashMap`-backed registry idiom: concurrent
/// readers never block each other, writers only contend on the single
/// slot they are inserting into.
#[derive(Debug, Default)]
pub struct SerializerRegistry {
    by_id: DashMap<SerializerId, &'static str>,
    by_name: DashMap<&'static str, SerializerId>,
}

impl SerializerRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `name`, returning its stable id. Idempotent: registering
    /// the same name twice returns the same id.
    pub fn register(&self, name: &'static str) -> Result<SerializerId, CodecError> {
        if let Some(existing) = self.by_name.get(name) {
            return Ok(*existing);
        }
        for salt in 0..MAX_SALT_ATTEMPTS {
            let id = candidate_id(name, salt);
            if id <= RESERVED_RANGE_END {
                // Reserved for system serializers; salt and retry rather
                // than letting a hashed name land here and collide with a
                // well-known id registered later.
                continue;
            }
            match self.by_id.entry(id) {
                dashmap::mapref::entry::Entry::Vacant(slot) => {
                    slot.insert(name);
                    self.by_name.insert(name, id);
                    return Ok(id);
                }
                dashmap::mapref::entry::Entry::Occupied(slot) => {
                    if *slot.get() == name {
                        return Ok(id);
                    }
                    // Collision with a different name: salt and retry.
                }
            }
        }
        Err(CodecError::IdAllocationExhausted(name))
    }

    /// Look up the name registered for `id`, if any.
    pub fn name_for(&self, id: SerializerId) -> Option<&'static str> {
        self.by_id.get(&id).map(|entry| *entry)
    }

    /// Number of distinct serializers registered.
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// True if no serializers are registered.
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

/// Write `value` as an embedded, length-prefixed frame: `i32` id followed
/// by a `u32` length and the encoded payload.
pub fn write_embedded<T: WireEncode>(
    out: &mut BytesMut,
    id: SerializerId,
    value: &T,
) -> Result<(), CodecError> {
    out.put_i32(id);
    let mut payload = BytesMut::new();
    value.encode(&mut payload)?;
    out.put_u32(payload.len() as u32);
    out.put_slice(&payload);
    Ok(())
}

/// Read an embedded frame's id and raw payload, without decoding the
/// payload. The caller dispatches on `id`: known ids decode the payload
/// with the matching `WireDecode` impl, unknown ids keep it as an opaque
/// blob (the generic fallback path for forward-compatible messages).
pub fn read_embedded_raw(buf: &mut Bytes) -> Result<(SerializerId, Bytes), CodecError> {
    if buf.remaining() < 4 {
        return Err(CodecError::UnexpectedEof {
            needed: 4,
            available: buf.remaining(),
        });
    }
    let id = buf.get_i32();
    if buf.remaining() < 4 {
        return Err(CodecError::UnexpectedEof {
            needed: 4,
            available: buf.remaining(),
        });
    }
    let len = buf.get_u32() as usize;
    super::primitives::check_size(len)?;
    if buf.remaining() < len {
        return Err(CodecError::UnexpectedEof {
            needed: len,
            available: buf.remaining(),
        });
    }
    Ok((id, buf.copy_to_bytes(len)))
}

/// Read and decode an embedded frame whose id is expected to match `id`,
/// decoding the payload as `T`.
pub fn read_embedded<T: WireDecode>(buf: &mut Bytes, id: SerializerId) -> Result<T, CodecError> {
    let (actual, mut payload) = read_embedded_raw(buf)?;
    if actual != id {
        return Err(CodecError::UnknownSerializer(actual));
    }
    T::decode(&mut payload)
}
