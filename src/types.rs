//! Public types for the Strata WAL API.
//!
//! This module re-exports types from internal crates with a clean public interface.

// ============================================================================
// Public API types - these are what users should use
// ============================================================================

// Writer and reader
pub use strata_durability::wal::{SharedWalWriter, WalReader, WalWriter};

// Destinations
pub use strata_durability::wal::{LogFile, WritableFile};

// Configuration
pub use strata_durability::wal::{DurabilityMode, WalConfig, WalConfigError};

// Recovery outcome
pub use strata_durability::wal::{TruncateInfo, TruncateReason};

// On-disk format
pub use strata_durability::wal::{ChunkHeader, RecordType, BLOCK_SIZE, HEADER_SIZE};

// Errors
pub use strata_durability::{Result, WalError};
