//! Mutex-guarded WAL writer for callers that append from several threads

use super::dest::WritableFile;
use super::writer::WalWriter;
use crate::error::Result;
use parking_lot::Mutex;

/// [`WalWriter`] behind a mutex
///
/// Each `add_record` holds the lock for the whole logical record, so the
/// chunks of concurrent records are never interleaved. Records land in the
/// order the lock is acquired.
pub struct SharedWalWriter<D: WritableFile> {
    inner: Mutex<WalWriter<D>>,
}

impl<D: WritableFile> SharedWalWriter<D> {
    /// Wrap an existing writer
    pub fn new(writer: WalWriter<D>) -> Self {
        Self {
            inner: Mutex::new(writer),
        }
    }

    /// Append one logical record
    pub fn add_record(&self, record: &[u8]) -> Result<()> {
        self.inner.lock().add_record(record)
    }

    /// Force everything written so far to stable storage
    pub fn sync(&self) -> Result<()> {
        self.inner.lock().sync()
    }

    /// Bytes already used in the current block
    pub fn block_offset(&self) -> usize {
        self.inner.lock().block_offset()
    }

    /// Unwrap the writer
    pub fn into_inner(self) -> WalWriter<D> {
        self.inner.into_inner()
    }
}

impl<D: WritableFile> From<WalWriter<D>> for SharedWalWriter<D> {
    fn from(writer: WalWriter<D>) -> Self {
        Self::new(writer)
    }
}
