//! Binary wire codec.
//!
//! Big-endian primitives ([`primitives`]), reusable settable byte streams
//! ([`stream`]), and an embedded-serializer registry with deterministic id
//! salting ([`registry`]) used to frame and unframe messages crossing a
//! [`crate::remote`] connection.

pub mod error;
pub mod primitives;
pub mod registry;
pub mod stream;

pub use error::CodecError;
pub use primitives::MAX_COLLECTION_SIZE;
pub use registry::{SerializerId, SerializerRegistry};
pub use stream::{DecodeStream, EncodeStream, WireDecode, WireEncode};
