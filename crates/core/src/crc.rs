//! CRC32C (Castagnoli) checksums
//!
//! Thin wrappers over the `crc32c` crate plus the masking transform used for
//! every checksum stored on disk.
//!
//! Stored CRCs are always masked. An all-zero region (preallocated or sparse
//! file) must not decode as a valid zero-length chunk. Readers `unmask`
//! before comparing.

/// Constant added to the rotated CRC by [`mask`]
const MASK_DELTA: u32 = 0xa282_ead8;

/// CRC32C of `data`
#[inline]
pub fn value(data: &[u8]) -> u32 {
    crc32c::crc32c(data)
}

/// Extend a CRC32C computed over some prefix with `data`
///
/// `extend(value(a), b) == value(a ++ b)`.
#[inline]
pub fn extend(init_crc: u32, data: &[u8]) -> u32 {
    crc32c::crc32c_append(init_crc, data)
}

/// Masked representation of `crc`, suitable for storage
#[inline]
pub fn mask(crc: u32) -> u32 {
    crc.rotate_right(15).wrapping_add(MASK_DELTA)
}

/// Recover the raw CRC from a value produced by [`mask`]
#[inline]
pub fn unmask(masked: u32) -> u32 {
    masked.wrapping_sub(MASK_DELTA).rotate_left(15)
}
