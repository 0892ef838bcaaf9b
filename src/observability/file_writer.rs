//! Rotating log file with size-based rotation and backup retention.
//!
//! The file is used as the writer of the `fmt` tracing layer when a log file
//! is configured. Before each write the current size is checked; once it
//! exceeds the limit the file is renamed with a timestamp suffix and a new one
//! is started. Only the newest backups are kept.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use tracing_subscriber::fmt::MakeWriter;

/// Maximum file size before rotation (10 MB).
const MAX_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;

/// Number of backup files to retain after rotation.
const MAX_BACKUP_FILES: usize = 3;

/// Thread-safe rotating log file.
///
/// Backups are named `<file name>.<unix millis>` and live next to the
/// log file.
pub struct RotatingFile {
    path: PathBuf,
    max_bytes: u64,
    max_backups: usize,
    /// Opened on first write.
    file: Mutex<Option<File>>,
}

impl RotatingFile {
    /// Creates a writer with the default limits. Nothing is opened yet.
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self::with_limits(path, MAX_FILE_SIZE_BYTES, MAX_BACKUP_FILES)
    }

    #[must_use]
    pub const fn with_limits(path: PathBuf, max_bytes: u64, max_backups: usize) -> Self {
        Self {
            path,
            max_bytes,
            max_backups,
            file: Mutex::new(None),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self) -> io::Result<MutexGuard<'_, Option<File>>> {
        self.file
            .lock()
            .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("Mutex poisoned: {e}")))
    }

    /// Appends `buf`, rotating first if the file has grown past the limit.
    ///
    /// # Errors
    ///
    /// Fails if rotating, opening, or writing the file fails.
    pub fn write_bytes(&self, buf: &[u8]) -> io::Result<()> {
        let mut file = self.lock()?;

        if fs::metadata(&self.path).is_ok_and(|m| m.len() > self.max_bytes) {
            *file = None;
            self.rotate()?;
        }

        if file.is_none() {
            *file = Some(OpenOptions::new().create(true).append(true).open(&self.path)?);
        }

        let handle = file
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "No file available"))?;
        handle.write_all(buf)
    }

    /// Flushes the open file, if any.
    ///
    /// # Errors
    ///
    /// Fails if the lock is poisoned or the flush fails.
    pub fn flush(&self) -> io::Result<()> {
        match self.lock()?.as_mut() {
            Some(handle) => handle.flush(),
            None => Ok(()),
        }
    }

    fn rotate(&self) -> io::Result<()> {
        if let Some(backup) = self.next_backup_path() {
            if self.path.exists() {
                fs::rename(&self.path, backup)?;
            }
        }

        self.cleanup_old_backups()
    }

    /// First unused `<file name>.<unix millis>` path, counting up from now.
    fn next_backup_path(&self) -> Option<PathBuf> {
        let prefix = self.backup_prefix()?;
        let mut stamp = chrono::Utc::now().timestamp_millis();
        loop {
            let candidate = self.path.with_file_name(format!("{prefix}{stamp}"));
            if !candidate.exists() {
                return Some(candidate);
            }
            stamp += 1;
        }
    }

    /// `<file name>.`, the prefix every backup name starts with.
    fn backup_prefix(&self) -> Option<String> {
        self.path
            .file_name()
            .and_then(|name| name.to_str())
            .map(|name| format!("{name}."))
    }

    /// Deletes all but the newest `max_backups` backups.
    ///
    /// Individual deletion failures are ignored.
    fn cleanup_old_backups(&self) -> io::Result<()> {
        let Some(prefix) = self.backup_prefix() else {
            return Ok(());
        };
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let mut backups: Vec<PathBuf> = fs::read_dir(dir)?
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| {
                path.file_name()
                    .and_then(|name| name.to_str())
                    .and_then(|name| name.strip_prefix(prefix.as_str()))
                    .is_some_and(|suffix| !suffix.is_empty() && suffix.bytes().all(|b| b.is_ascii_digit()))
            })
            .collect();

        backups.sort_by_key(|path| {
            std::cmp::Reverse(fs::metadata(path).and_then(|m| m.modified()).ok())
        });

        for old in backups.iter().skip(self.max_backups) {
            let _ = fs::remove_file(old);
        }
        Ok(())
    }
}

impl std::fmt::Debug for RotatingFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RotatingFile")
            .field("path", &self.path)
            .field("max_bytes", &self.max_bytes)
            .field("max_backups", &self.max_backups)
            .finish_non_exhaustive()
    }
}

/// Handle given to the `fmt` layer for one log record.
#[derive(Debug)]
pub struct RotatingWriter<'a> {
    file: &'a RotatingFile,
}

impl Write for RotatingWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.file.write_bytes(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

impl<'a> MakeWriter<'a> for RotatingFile {
    type Writer = RotatingWriter<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        RotatingWriter { file: self }
    }
}
