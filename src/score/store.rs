use std::cell::{Cell, RefCell};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::error::StoreError;
use crate::score::counts::WinCounts;

/// Persistence boundary for win counts. The engine loads once at
/// construction and saves synchronously after every win.
pub trait WinCountStore: fmt::Debug {
    fn load(&self) -> Result<WinCounts, StoreError>;

    fn save(&mut self, counts: &WinCounts) -> Result<(), StoreError>;
}

/// Stores win counts as a small JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".tmp");
        PathBuf::from(name)
    }
}

impl WinCountStore for JsonFileStore {
    /// A missing file means nobody has won yet.
    fn load(&self) -> Result<WinCounts, StoreError> {
        if !self.path.exists() {
            return Ok(WinCounts::default());
        }

        let json = fs::read_to_string(&self.path).map_err(|e| StoreError::Read {
            path: self.path.clone(),
            source: e,
        })?;
        serde_json::from_str(&json).map_err(|e| StoreError::Parse {
            path: self.path.clone(),
            source: e,
        })
    }

    fn save(&mut self, counts: &WinCounts) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        // Write aside, then rename over the old file
        let tmp = self.tmp_path();
        fs::write(&tmp, serde_json::to_string_pretty(counts)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

/// In-process store. Clones share the same slot, so a test can keep one
/// handle while the engine owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    counts: Rc<RefCell<WinCounts>>,
    saves: Rc<Cell<usize>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from previously recorded counts
    pub fn with_counts(counts: WinCounts) -> Self {
        MemoryStore {
            counts: Rc::new(RefCell::new(counts)),
            saves: Rc::default(),
        }
    }

    /// Last saved (or seeded) counts
    pub fn snapshot(&self) -> WinCounts {
        *self.counts.borrow()
    }

    pub fn save_count(&self) -> usize {
        self.saves.get()
    }
}

impl WinCountStore for MemoryStore {
    fn load(&self) -> Result<WinCounts, StoreError> {
        Ok(self.snapshot())
    }

    fn save(&mut self, counts: &WinCounts) -> Result<(), StoreError> {
        *self.counts.borrow_mut() = *counts;
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }
}
