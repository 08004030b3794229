//! Append-only destinations the WAL writer persists into
//!
//! The writer only needs two operations: append bytes at the end of the
//! stream, and flush what has been appended. Appended bytes are not
//! considered durable until `flush` returns `Ok`.

use super::config::{DurabilityMode, WalConfig};
use crate::error::Result;
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Sequential append-only sink
pub trait WritableFile {
    /// Append `data` to the end of the stream
    fn append(&mut self, data: &[u8]) -> io::Result<()>;

    /// Push appended bytes to the storage layer
    fn flush(&mut self) -> io::Result<()>;

    /// Force appended bytes to stable storage
    fn sync(&mut self) -> io::Result<()> {
        self.flush()
    }
}

impl<W: WritableFile + ?Sized> WritableFile for &mut W {
    #[inline]
    fn append(&mut self, data: &[u8]) -> io::Result<()> {
        (**self).append(data)
    }

    #[inline]
    fn flush(&mut self) -> io::Result<()> {
        (**self).flush()
    }

    #[inline]
    fn sync(&mut self) -> io::Result<()> {
        (**self).sync()
    }
}

impl<W: WritableFile + ?Sized> WritableFile for Box<W> {
    #[inline]
    fn append(&mut self, data: &[u8]) -> io::Result<()> {
        (**self).append(data)
    }

    #[inline]
    fn flush(&mut self) -> io::Result<()> {
        (**self).flush()
    }

    #[inline]
    fn sync(&mut self) -> io::Result<()> {
        (**self).sync()
    }
}

/// In-memory destination
impl WritableFile for Vec<u8> {
    #[inline]
    fn append(&mut self, data: &[u8]) -> io::Result<()> {
        self.extend_from_slice(data);
        Ok(())
    }

    #[inline]
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// WAL file on the local filesystem
///
/// Writes go through a `BufWriter`; `flush` drains it into the OS and, in
/// [`DurabilityMode::Strict`], syncs the file data as well.
#[derive(Debug)]
pub struct LogFile {
    path: PathBuf,
    writer: BufWriter<File>,
    durability: DurabilityMode,
    /// Bytes in the file plus bytes still buffered
    len: u64,
}

impl LogFile {
    /// Create `path`, truncating any existing content
    pub fn create(path: impl AsRef<Path>, config: &WalConfig) -> Result<Self> {
        config.validate()?;
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)?;
        Ok(Self::from_parts(path, file, 0, config))
    }

    /// Open `path` for appending, creating it if missing
    ///
    /// [`LogFile::len`] reports the existing length, which is what a writer
    /// attaching to this file needs.
    pub fn open(path: impl AsRef<Path>, config: &WalConfig) -> Result<Self> {
        config.validate()?;
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let len = file.metadata()?.len();
        Ok(Self::from_parts(path, file, len, config))
    }

    fn from_parts(path: PathBuf, file: File, len: u64, config: &WalConfig) -> Self {
        Self {
            path,
            writer: BufWriter::with_capacity(config.buffer_capacity, file),
            durability: config.durability,
            len,
        }
    }

    /// Path of the file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Logical length, including bytes not yet flushed
    ///
    /// Counts every byte the buffer accepted, so after a failed append it
    /// still matches what was handed to the file.
    pub fn len(&self) -> u64 {
        self.len
    }

    /// Check if nothing has been written
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Durability mode this file was opened with
    pub fn durability(&self) -> DurabilityMode {
        self.durability
    }
}

impl WritableFile for LogFile {
    fn append(&mut self, data: &[u8]) -> io::Result<()> {
        write_counted(&mut self.writer, data, &mut self.len)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()?;
        if self.durability == DurabilityMode::Strict {
            self.writer.get_ref().sync_data()?;
        }
        Ok(())
    }

    fn sync(&mut self) -> io::Result<()> {
        self.writer.flush()?;
        self.writer.get_ref().sync_data()
    }
}

/// `write_all` that adds each accepted byte to `len`, including the bytes
/// accepted before an error
fn write_counted<W: Write>(writer: &mut W, mut data: &[u8], len: &mut u64) -> io::Result<()> {
    while !data.is_empty() {
        match writer.write(data) {
            Ok(0) => return Err(io::ErrorKind::WriteZero.into()),
            Ok(n) => {
                *len += n as u64;
                data = &data[n..];
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(())
}
