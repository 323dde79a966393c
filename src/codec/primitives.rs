//! Big-endian wire primitives shared by every serializer.
//!
//! All multi-byte numeric fields are big-endian (network byte order).
//! Strings are length-prefixed with a `u16` count (cross-universe channel
//! and path names are short); byte buffers and homogeneous collections
//! use an `i32` count. Every declared length is checked against
//! [`MAX_COLLECTION_SIZE`] before any allocation happens.

// Layer 1: Standard library imports
// (none)

// Layer 2: Third-party crate imports
use bytes::{Buf, BufMut, Bytes, BytesMut};

// Layer 3: Internal module imports
use super::error::CodecError;

/// Ceiling enforced on any length-prefixed collection, string, or byte
/// buffer before the corresponding allocation is performed.
pub const MAX_COLLECTION_SIZE: usize = 10_000;

fn require(buf: &Bytes, needed: usize) -> Result<(), CodecError> {
    if buf.remaining() < needed {
        Err(CodecError::UnexpectedEof {
            needed,
            available: buf.remaining(),
        })
    } else {
        Ok(())
    }
}

/// Write a `bool` as a single `0`/`1` byte.
pub fn write_bool(out: &mut BytesMut, value: bool) {
    out.put_u8(if value { 1 } else { 0 });
}

/// Read a `bool` from a single byte, rejecting anything but `0`/`1`.
pub fn read_bool(buf: &mut Bytes) -> Result<bool, CodecError> {
    require(buf, 1)?;
    match buf.get_u8() {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(CodecError::InvalidBool(other)),
    }
}

/// Write an `i8`.
pub fn write_i8(out: &mut BytesMut, value: i8) {
    out.put_i8(value);
}

/// Read an `i8`.
pub fn read_i8(buf: &mut Bytes) -> Result<i8, CodecError> {
    require(buf, 1)?;
    Ok(buf.get_i8())
}

/// Write an `i16`, big-endian.
pub fn write_i16(out: &mut BytesMut, value: i16) {
    out.put_i16(value);
}

/// Read an `i16`, big-endian.
pub fn read_i16(buf: &mut Bytes) -> Result<i16, CodecError> {
    require(buf, 2)?;
    Ok(buf.get_i16())
}

/// Write an `i32`, big-endian.
pub fn write_i32(out: &mut BytesMut, value: i32) {
    out.put_i32(value);
}

/// Read an `i32`, big-endian.
pub fn read_i32(buf: &mut Bytes) -> Result<i32, CodecError> {
    require(buf, 4)?;
    Ok(buf.get_i32())
}

/// Write an `i64`, big-endian.
pub fn write_i64(out: &mut BytesMut, value: i64) {
    out.put_i64(value);
}

/// Read an `i64`, big-endian.
pub fn read_i64(buf: &mut Bytes) -> Result<i64, CodecError> {
    require(buf, 8)?;
    Ok(buf.get_i64())
}

/// Write an `f32`, big-endian.
pub fn write_f32(out: &mut BytesMut, value: f32) {
    out.put_f32(value);
}

/// Read an `f32`, big-endian.
pub fn read_f32(buf: &mut Bytes) -> Result<f32, CodecError> {
    require(buf, 4)?;
    Ok(buf.get_f32())
}

/// Write an `f64`, big-endian.
pub fn write_f64(out: &mut BytesMut, value: f64) {
    out.put_f64(value);
}

/// Read an `f64`, big-endian.
pub fn read_f64(buf: &mut Bytes) -> Result<f64, CodecError> {
    require(buf, 8)?;
    Ok(buf.get_f64())
}

/// Write a length-prefixed byte buffer. `data.len()` must not exceed
/// [`MAX_COLLECTION_SIZE`].
pub fn write_bytes(out: &mut BytesMut, data: &[u8]) -> Result<(), CodecError> {
    check_size(data.len())?;
    out.put_u32(data.len() as u32);
    out.put_slice(data);
    Ok(())
}

/// Read a length-prefixed byte buffer, rejecting declared sizes above
/// [`MAX_COLLECTION_SIZE`] before allocating.
pub fn read_bytes(buf: &mut Bytes) -> Result<Bytes, CodecError> {
    require(buf, 4)?;
    let len = buf.get_u32() as usize;
    check_size(len)?;
    require(buf, len)?;
    Ok(buf.copy_to_bytes(len))
}

/// Maximum byte length of a `u16`-length-prefixed string.
const MAX_STRING_LEN: usize = u16::MAX as usize;

/// Write a `u16`-length-prefixed UTF-8 string, distinct from the `i32`
/// length used for raw byte buffers: channel names, actor paths, and
/// serializer names never approach the 64 KiB ceiling this leaves.
pub fn write_string(out: &mut BytesMut, value: &str) -> Result<(), CodecError> {
    let len = value.len();
    if len > MAX_STRING_LEN {
        return Err(CodecError::CollectionTooLarge {
            size: len,
            max: MAX_STRING_LEN,
        });
    }
    out.put_u16(len as u16);
    out.put_slice(value.as_bytes());
    Ok(())
}

/// Read a `u16`-length-prefixed UTF-8 string.
pub fn read_string(buf: &mut Bytes) -> Result<String, CodecError> {
    require(buf, 2)?;
    let len = buf.get_u16() as usize;
    require(buf, len)?;
    let raw = buf.copy_to_bytes(len);
    String::from_utf8(raw.to_vec()).map_err(CodecError::from)
}

/// Reject a declared collection/string/byte-buffer size before any
/// allocation is performed on it (spec: size ceiling enforced up front).
pub fn check_size(size: usize) -> Result<(), CodecError> {
    if size > MAX_COLLECTION_SIZE {
        Err(CodecError::CollectionTooLarge {
            size,
            max: MAX_COLLECTION_SIZE,
        })
    } else {
        Ok(())
    }
}

/// Write a length-prefixed homogeneous collection using `write_elem` for
/// each item.
pub fn write_collection<T>(
    out: &mut BytesMut,
    items: &[T],
    mut write_elem: impl FnMut(&mut BytesMut, &T),
) -> Result<(), CodecError> {
    check_size(items.len())?;
    out.put_u32(items.len() as u32);
    for item in items {
        write_elem(out, item);
    }
    Ok(())
}

/// Read a length-prefixed homogeneous collection, iterating exactly
/// `size` times (never `0..=size`, which would over-read by one element).
pub fn read_collection<T>(
    buf: &mut Bytes,
    mut read_elem: impl FnMut(&mut Bytes) -> Result<T, CodecError>,
) -> Result<Vec<T>, CodecError> {
    require(buf, 4)?;
    let size = buf.get_u32() as usize;
    check_size(size)?;
    let mut items = Vec::with_capacity(size.min(MAX_COLLECTION_SIZE));
    for _ in 0..size {
        items.push(read_elem(buf)?);
    }
    Ok(items)
}
