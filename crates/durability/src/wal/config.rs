//! WAL configuration

use super::format::BLOCK_SIZE;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How hard `flush` pushes bytes towards stable storage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DurabilityMode {
    /// Every flush also syncs file data to disk (default)
    #[default]
    Strict,
    /// Flush hands bytes to the OS; call `sync` for durability
    Buffered,
}

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WalConfigError {
    /// `buffer_capacity` was zero
    #[error("buffer_capacity must be greater than zero")]
    ZeroBufferCapacity,
}

/// Options for opening a WAL file
///
/// ```ignore
/// use strata_durability::wal::{DurabilityMode, WalConfig};
///
/// let config = WalConfig::new().durability(DurabilityMode::Buffered);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WalConfig {
    /// Sync policy applied by `LogFile::flush`
    pub durability: DurabilityMode,
    /// Capacity of the write buffer in front of the file
    pub buffer_capacity: usize,
    /// Whether the reader verifies chunk checksums
    pub verify_checksums: bool,
}

impl WalConfig {
    /// Default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the durability mode
    pub fn durability(mut self, mode: DurabilityMode) -> Self {
        self.durability = mode;
        self
    }

    /// Set the write buffer capacity
    pub fn buffer_capacity(mut self, capacity: usize) -> Self {
        self.buffer_capacity = capacity;
        self
    }

    /// Enable or disable checksum verification when reading
    pub fn verify_checksums(mut self, verify: bool) -> Self {
        self.verify_checksums = verify;
        self
    }

    /// Check the configuration for values that cannot work
    pub fn validate(&self) -> Result<(), WalConfigError> {
        if self.buffer_capacity == 0 {
            return Err(WalConfigError::ZeroBufferCapacity);
        }
        Ok(())
    }
}

impl Default for WalConfig {
    fn default() -> Self {
        Self {
            durability: DurabilityMode::Strict,
            buffer_capacity: BLOCK_SIZE,
            verify_checksums: true,
        }
    }
}
