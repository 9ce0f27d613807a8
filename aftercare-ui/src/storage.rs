//! Local durable key-value storage
//!
//! The write-through mirror for tracker state: one file per key under
//! the data directory, written atomically (temp file + rename) so a
//! crash mid-write never leaves a torn blob. The in-memory store backs
//! tests and supports write-failure injection.

use crate::error::{Error, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

/// Storage key for the full tracker blob
pub const TRACKER_KEY: &str = "aftercare-tracker";

/// Storage key for the lightweight progress summary
pub const PROGRESS_KEY: &str = "aftercare-progress";

/// Storage key for the sticky onboarding flag (`"true"`/unset)
pub const ONBOARDING_KEY: &str = "aftercare-onboarding-complete";

/// Simple durable string store
///
/// Single-writer: only the tracker manager writes, and a failed write
/// must never take down the caller.
pub trait LocalStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// File-per-key store under a data directory
#[derive(Debug)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Create the store, ensuring the directory exists
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }
}

impl LocalStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key);
        let tmp = self.dir.join(format!(".{key}.tmp"));
        std::fs::write(&tmp, value)?;
        std::fs::rename(&tmp, &path)?;
        Ok(())
    }
}

/// In-memory store for tests and ephemeral sessions
///
/// Counts writes (bulk operations must produce exactly one) and can be
/// switched to fail every write to exercise the degraded path.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
    writes: AtomicUsize,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total successful or attempted `set` calls
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Make every subsequent write fail (quota-exceeded simulation)
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

impl LocalStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.lock().expect("store lock").get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Error::Storage("write rejected".to_string()));
        }
        self.entries
            .lock()
            .expect("store lock")
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Convenience for pointing a FileStore at a subdirectory of a base path
pub fn data_dir_store(base: &Path) -> Result<FileStore> {
    FileStore::new(base.join("tracker"))
}
