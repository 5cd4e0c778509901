//! Per-path mutual exclusion for read-compare-write sequences.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

/// Hands out one mutex per target path so the collision check and the write
/// that follows it run as a single critical section per path. An entry lives
/// only while some caller holds or waits for it.
#[derive(Debug, Default)]
pub struct PathLocks {
    locks: Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>,
}

impl PathLocks {
    pub fn new() -> Self {
        Self::default()
    }

    fn table(&self) -> MutexGuard<'_, HashMap<PathBuf, Arc<Mutex<()>>>> {
        match self.locks.lock() {
            Ok(m) => m,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn lock_for(&self, path: &Path) -> Arc<Mutex<()>> {
        Arc::clone(self.table().entry(path.to_path_buf()).or_default())
    }

    /// Drops the entry for `path` unless another caller still holds a clone.
    fn release(&self, path: &Path, lock: Arc<Mutex<()>>) {
        let mut table = self.table();
        // One count is ours, one is the table's.
        if Arc::strong_count(&lock) == 2 {
            table.remove(path);
        }
    }

    /// Runs `f` while holding the lock for `path`.
    pub fn with_lock<R>(&self, path: &Path, f: impl FnOnce() -> R) -> R {
        let lock = self.lock_for(path);
        let result = {
            let _guard = match lock.lock() {
                Ok(g) => g,
                Err(poisoned) => poisoned.into_inner(),
            };
            f()
        };
        self.release(path, lock);
        result
    }

    /// Number of paths currently tracked.
    pub fn len(&self) -> usize {
        self.table().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
