//! SQLite connection configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use rowmap_core::{Error, Result};
use rusqlite::OpenFlags;
use serde::{Deserialize, Serialize};

/// Default busy timeout in milliseconds.
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// SQLite connection configuration.
///
/// Every field has a default, so a JSON document only needs the keys it
/// changes. Without a `path` the database lives in memory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SqliteConfig {
    /// Database file. `None` opens a private in-memory database.
    pub path: Option<PathBuf>,
    /// Create the file if it does not exist.
    pub create_if_missing: bool,
    /// Open without write access.
    pub read_only: bool,
    /// Enforce foreign key constraints.
    pub foreign_keys: bool,
    /// How long a statement waits on a locked database, in milliseconds.
    pub busy_timeout_ms: u64,
}

impl Default for SqliteConfig {
    fn default() -> Self {
        Self {
            path: None,
            create_if_missing: true,
            read_only: false,
            foreign_keys: true,
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
        }
    }
}

impl SqliteConfig {
    /// In-memory database with default settings.
    pub fn memory() -> Self {
        Self::default()
    }

    /// File-backed database at `path`.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            ..Self::default()
        }
    }

    /// Parse a configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| Error::Config(format!("invalid JSON: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Set whether a missing file is created.
    pub fn create_if_missing(mut self, create: bool) -> Self {
        self.create_if_missing = create;
        self
    }

    /// Set read-only mode.
    pub fn read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    /// Set foreign key enforcement.
    pub fn foreign_keys(mut self, enabled: bool) -> Self {
        self.foreign_keys = enabled;
        self
    }

    /// Set the busy timeout.
    pub fn busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// True when no file is configured.
    pub fn is_memory(&self) -> bool {
        self.path.is_none()
    }

    /// The configured file, if any.
    pub fn file_path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Busy timeout as a `Duration`.
    pub fn busy_timeout_duration(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }

    /// Reject combinations SQLite cannot honor.
    pub fn validate(&self) -> Result<()> {
        if self.read_only && self.is_memory() {
            return Err(Error::Config(
                "a read-only database needs a file path".to_string(),
            ));
        }
        if self.read_only && self.create_if_missing && self.path.is_some() {
            tracing::debug!("create_if_missing has no effect on a read-only database");
        }
        if let Some(path) = &self.path {
            if path.as_os_str().is_empty() {
                return Err(Error::Config("database path is empty".to_string()));
            }
        }
        Ok(())
    }

    /// Open flags matching this configuration.
    pub(crate) fn open_flags(&self) -> OpenFlags {
        let mut flags = OpenFlags::SQLITE_OPEN_URI | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        if self.read_only {
            flags |= OpenFlags::SQLITE_OPEN_READ_ONLY;
        } else {
            flags |= OpenFlags::SQLITE_OPEN_READ_WRITE;
            if self.create_if_missing {
                flags |= OpenFlags::SQLITE_OPEN_CREATE;
            }
        }
        flags
    }
}
