//! Settable byte-stream adapters.
//!
//! A single [`EncodeStream`] or [`DecodeStream`] can be retargeted to a new
//! underlying buffer with [`EncodeStream::retarget`] / [`DecodeStream::retarget`]
//! so that one serializer instance is reused across many encode/decode calls
//! instead of being reallocated per message.

// Layer 1: Standard library imports
// (none)

// Layer 2: Third-party crate imports
use bytes::{Bytes, BytesMut};

// Layer 3: Internal module imports
use super::error::CodecError;

/// A type that knows how to write itself onto the wire.
pub trait WireEncode {
    /// Append this value's wire representation to `out`.
    fn encode(&self, out: &mut BytesMut) -> Result<(), CodecError>;
}

/// A type that knows how to read itself from the wire.
pub trait WireDecode: Sized {
    /// Consume this value's wire representation from `buf`.
    fn decode(buf: &mut Bytes) -> Result<Self, CodecError>;
}

/// A reusable encode target. Call [`retarget`](Self::retarget) between
/// messages instead of constructing a new `BytesMut` each time.
#[derive(Debug, Default)]
pub struct EncodeStream {
    buf: BytesMut,
}

impl EncodeStream {
    /// Create an empty stream with the given initial capacity hint.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: BytesMut::with_capacity(capacity),
        }
    }

    /// Clear the underlying buffer, retargeting this stream for a new
    /// message while keeping its allocated capacity.
    pub fn retarget(&mut self) {
        self.buf.clear();
    }

    /// Encode `value` into this stream.
    pub fn write<T: WireEncode>(&mut self, value: &T) -> Result<(), CodecError> {
        value.encode(&mut self.buf)
    }

    /// Freeze the current contents into an immutable, shareable [`Bytes`],
    /// leaving this stream's buffer empty for reuse.
    pub fn finish(&mut self) -> Bytes {
        std::mem::take(&mut self.buf).freeze()
    }

    /// Current number of bytes written since the last retarget/finish.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// True if nothing has been written yet.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }
}

/// A reusable decode source. Call [`retarget`](Self::retarget) to point this
/// stream at a new incoming buffer.
#[derive(Debug, Default)]
pub struct DecodeStream {
    buf: Bytes,
}

impl DecodeStream {
    /// Create a stream over `data`.
    pub fn new(data: Bytes) -> Self {
        Self { buf: data }
    }

    /// Point this stream at a new underlying buffer, discarding any bytes
    /// left unread from the previous one.
    pub fn retarget(&mut self, data: Bytes) {
        self.buf = data;
    }

    /// Decode a `T` from the current position.
    pub fn read<T: WireDecode>(&mut self) -> Result<T, CodecError> {
        T::decode(&mut self.buf)
    }

    /// Bytes left unread in the current buffer.
    pub fn remaining(&self) -> usize {
        self.buf.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::primitives::{read_i32, write_i32};

    struct Point {
        x: i32,
        y: i32,
    }

    impl WireEncode for Point {
        fn encode(&self, out: &mut BytesMut) -> Result<(), CodecError> {
            write_i32(out, self.x);
            write_i32(out, self.y);
            Ok(())
        }
    }

    impl WireDecode for Point {
        fn decode(buf: &mut Bytes) -> Result<Self, CodecError> {
            Ok(Point {
                x: read_i32(buf)?,
                y: read_i32(buf)?,
            })
        }
    }

    #[test]
    fn test_encode_stream_reused_across_messages() {
        let mut enc = EncodeStream::with_capacity(16);
        enc.write(&Point { x: 1, y: 2 }).unwrap();
        let first = enc.finish();
        assert!(enc.is_empty());

        enc.write(&Point { x: 3, y: 4 }).unwrap();
        let second = enc.finish();

        let mut dec = DecodeStream::new(first);
        let p1: Point = dec.read().unwrap();
        assert_eq!((p1.x, p1.y), (1, 2));

        dec.retarget(second);
        let p2: Point = dec.read().unwrap();
        assert_eq!((p2.x, p2.y), (3, 4));
    }

    #[test]
    fn test_retarget_clears_buffer() {
        let mut enc = EncodeStream::with_capacity(4);
        enc.write(&Point { x: 9, y: 9 }).unwrap();
        enc.retarget();
        assert!(enc.is_empty());
    }
}
