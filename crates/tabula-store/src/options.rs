//! Connection options for the embedded store.

use std::path::PathBuf;

use rusqlite::OpenFlags;

/// Where the database file lives and how it is opened.
///
/// Immutable once a [`StorageHandle`](crate::StorageHandle) has been
/// constructed from it.
#[derive(Debug, Clone)]
pub struct StorageOptions {
    /// Directory containing the database file.
    pub directory: PathBuf,
    /// Database file name.
    pub filename: String,
    /// SQLite open-mode flags.
    pub flags: OpenFlags,
}

impl StorageOptions {
    /// Options for `directory/filename` with the default open mode.
    pub fn new(directory: impl Into<PathBuf>, filename: impl Into<String>) -> Self {
        Self {
            directory: directory.into(),
            filename: filename.into(),
            flags: Self::default_flags(),
        }
    }

    /// Replace the open-mode flags.
    pub fn with_flags(mut self, flags: OpenFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Read-write, create-if-missing, shared cache.
    pub fn default_flags() -> OpenFlags {
        OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_CREATE
            | OpenFlags::SQLITE_OPEN_SHARED_CACHE
    }

    /// Full path to the database file.
    pub fn path(&self) -> PathBuf {
        self.directory.join(&self.filename)
    }
}
