//! Fixed-width little-endian encoding
//!
//! On-disk headers are packed byte-by-byte through these helpers rather than
//! through native struct layout, so the format is identical on every target.

use byteorder::{ByteOrder, LittleEndian};

/// Write `value` into the first 4 bytes of `dst`
///
/// # Panics
///
/// Panics if `dst` is shorter than 4 bytes.
#[inline]
pub fn encode_fixed32(dst: &mut [u8], value: u32) {
    LittleEndian::write_u32(dst, value);
}

/// Read a `u32` from the first 4 bytes of `src`
///
/// # Panics
///
/// Panics if `src` is shorter than 4 bytes.
#[inline]
pub fn decode_fixed32(src: &[u8]) -> u32 {
    LittleEndian::read_u32(src)
}

/// Write `value` into the first 2 bytes of `dst`
///
/// # Panics
///
/// Panics if `dst` is shorter than 2 bytes.
#[inline]
pub fn encode_fixed16(dst: &mut [u8], value: u16) {
    LittleEndian::write_u16(dst, value);
}

/// Read a `u16` from the first 2 bytes of `src`
///
/// # Panics
///
/// Panics if `src` is shorter than 2 bytes.
#[inline]
pub fn decode_fixed16(src: &[u8]) -> u16 {
    LittleEndian::read_u16(src)
}
