//! Durability layer for Strata
//!
//! The write-ahead log persists each logical record (an opaque serialized
//! batch) as checksummed chunks in 32 KiB blocks before the batch is applied.
//! A record is durable once [`WalWriter::add_record`] returns `Ok`.
//!
//! # Example
//!
//! ```ignore
//! use strata_durability::wal::{WalConfig, WalReader, WalWriter};
//!
//! let mut writer = WalWriter::open("000001.log", &WalConfig::default())?;
//! writer.add_record(b"batch-1")?;
//!
//! let mut reader = WalReader::open("000001.log", &WalConfig::default())?;
//! while let Some(record) = reader.read_record()? {
//!     // apply record
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod wal;

pub use error::{Result, WalError};
pub use wal::{
    DurabilityMode, LogFile, SharedWalWriter, TruncateInfo, TruncateReason, WalConfig,
    WalReader, WalWriter, WritableFile,
};
