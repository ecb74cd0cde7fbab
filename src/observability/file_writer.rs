//! Rotating file writer with size-based rotation and backup retention.
//!
//! This module provides the log sink behind the tracing subscriber. The file
//! is rotated when the next write would push it past a size threshold, and a
//! fixed number of numbered backups is kept, so the log never grows without
//! bound.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Maximum file size before rotation (10 MB).
pub const MAX_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;

/// Number of backup files to retain after rotation.
pub const MAX_BACKUP_FILES: usize = 3;

/// Size-rotating append-only file.
///
/// # Rotation Strategy
///
/// Before a write that would exceed the size limit:
/// 1. `<name>.2` → `<name>.3`, `<name>.1` → `<name>.2`, ... (the oldest is overwritten)
/// 2. `<name>` → `<name>.1`
/// 3. a fresh `<name>` is opened for the write
///
/// # Thread Safety
///
/// The writer itself is not synchronized; the subscriber wraps it in a
/// `Mutex`, which `tracing-subscriber` accepts as a writer factory.
pub struct RotatingFile {
    /// Path to the primary log file.
    path: PathBuf,
    /// Lazily-opened file handle.
    file: Option<File>,
    /// Bytes in the current file.
    written: u64,
    max_bytes: u64,
    backups: usize,
}

impl RotatingFile {
    /// Creates a writer with the default limits. The file is not opened until
    /// the first write.
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self::with_limits(path, MAX_FILE_SIZE_BYTES, MAX_BACKUP_FILES)
    }

    /// Creates a writer rotating at `max_bytes` and keeping `backups` old files.
    #[must_use]
    pub const fn with_limits(path: PathBuf, max_bytes: u64, backups: usize) -> Self {
        Self {
            path,
            file: None,
            written: 0,
            max_bytes,
            backups,
        }
    }

    /// Path of the live log file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of backup number `index` (1 is the most recent).
    fn backup_path(&self, index: usize) -> PathBuf {
        let mut name = self.path.clone().into_os_string();
        name.push(format!(".{index}"));
        PathBuf::from(name)
    }

    fn open(&mut self) -> io::Result<&mut File> {
        if self.file.is_none() {
            let file = OpenOptions::new().create(true).append(true).open(&self.path)?;
            self.written = file.metadata()?.len();
            self.file = Some(file);
        }

        self.file
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "log file not open"))
    }

    /// Shifts backups up by one and moves the live file to `.1`.
    fn rotate(&mut self) -> io::Result<()> {
        if let Some(mut file) = self.file.take() {
            file.flush()?;
        }

        if self.backups == 0 {
            if self.path.exists() {
                fs::remove_file(&self.path)?;
            }
        } else {
            for index in (1..self.backups).rev() {
                let from = self.backup_path(index);
                if from.exists() {
                    fs::rename(&from, self.backup_path(index + 1))?;
                }
            }
            if self.path.exists() {
                fs::rename(&self.path, self.backup_path(1))?;
            }
        }

        self.written = 0;
        Ok(())
    }
}

impl Write for RotatingFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.open()?;
        if self.written > 0 && self.written + buf.len() as u64 > self.max_bytes {
            self.rotate()?;
        }

        let n = self.open()?.write(buf)?;
        self.written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.as_mut().map_or(Ok(()), Write::flush)
    }
}

impl std::fmt::Debug for RotatingFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RotatingFile")
            .field("path", &self.path)
            .field("written", &self.written)
            .finish_non_exhaustive()
    }
}
