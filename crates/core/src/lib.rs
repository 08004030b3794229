//! Core primitives shared by the Strata WAL crates
//!
//! This crate provides:
//! - `crc`: CRC32C checksums and the storage mask applied before persisting them
//! - `coding`: Fixed-width little-endian integer encoding

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod coding;
pub mod crc;
