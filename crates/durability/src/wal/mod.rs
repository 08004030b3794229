//! WAL (Write-Ahead Log) module
//!
//! - `format`: Block and chunk layout (BLOCK_SIZE, HEADER_SIZE, RecordType, ChunkHeader)
//! - `config`: WAL configuration (WalConfig, DurabilityMode, WalConfigError)
//! - `dest`: Append-only destinations (WritableFile, LogFile)
//! - `writer`: Block-framed WAL writer (WalWriter)
//! - `shared`: Mutex-guarded writer (SharedWalWriter)
//! - `reader`: Recovery reader (WalReader)

pub mod config;
pub mod dest;
pub mod format;
pub mod reader;
pub mod shared;
pub mod writer;

pub use config::{DurabilityMode, WalConfig, WalConfigError};
pub use dest::{LogFile, WritableFile};
pub use format::{ChunkHeader, RecordType, BLOCK_SIZE, HEADER_SIZE};
pub use reader::{Records, TruncateInfo, TruncateReason, WalReader};
pub use shared::SharedWalWriter;
pub use writer::WalWriter;
