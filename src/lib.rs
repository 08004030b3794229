//! Strata write-ahead log
//!
//! Block-framed, checksummed log of opaque records. Each record appended
//! through [`WalWriter::add_record`] is split into chunks that never cross a
//! 32 KiB block boundary and is flushed before the call returns.
//!
//! ```ignore
//! use stratawal::{WalConfig, WalReader, WalWriter};
//!
//! let config = WalConfig::default();
//! let mut writer = WalWriter::open("000001.log", &config)?;
//! writer.add_record(b"batch")?;
//!
//! let mut reader = WalReader::open("000001.log", &config)?;
//! assert_eq!(reader.read_record()?.as_deref(), Some(&b"batch"[..]));
//! ```

#![warn(missing_docs)]

mod types;

pub use types::*;

/// Checksum and encoding primitives
pub use strata_core::{coding, crc};
