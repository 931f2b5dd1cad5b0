use super::error::CacheError;
use super::format::{decode, encode};
use super::{ParameterCache, ParameterStore};

use std::fs::{self, rename, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::debug;

/// Cache file on disk, replaced atomically on every save.
#[derive(Debug, Clone)]
pub struct FileParameterStore {
    path: PathBuf,
}

impl FileParameterStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }
}

impl ParameterStore for FileParameterStore {
    fn load(&self) -> Result<Option<ParameterCache>, CacheError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let bytes = fs::read(&self.path)?;
        let cache = decode(&bytes)?;
        debug!(bytes = bytes.len(), path = %self.path.display(), "loaded parameter cache");
        Ok(Some(cache))
    }

    fn save(&self, cache: &ParameterCache) -> Result<(), CacheError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let data = encode(cache)?;

        // write to a sibling temp file, then rename over the target
        let temp_path = self.path.with_extension("tmp");
        {
            let mut file = File::create(&temp_path)?;
            file.write_all(&data)?;
            file.flush()?;
            file.sync_all()?;
        }
        rename(&temp_path, &self.path)?;

        debug!(bytes = data.len(), path = %self.path.display(), "saved parameter cache");
        Ok(())
    }
}

/// Process-local store for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryParameterStore {
    slot: Mutex<Option<ParameterCache>>,
    saves: Mutex<usize>,
}

impl MemoryParameterStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cache(cache: ParameterCache) -> Self {
        Self { slot: Mutex::new(Some(cache)), saves: Mutex::new(0) }
    }

    /// Number of successful saves so far.
    pub fn save_count(&self) -> usize {
        *self.saves.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn snapshot(&self) -> Option<ParameterCache> {
        self.slot.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl ParameterStore for MemoryParameterStore {
    fn load(&self) -> Result<Option<ParameterCache>, CacheError> {
        Ok(self.snapshot())
    }

    fn save(&self, cache: &ParameterCache) -> Result<(), CacheError> {
        *self.slot.lock().unwrap_or_else(|e| e.into_inner()) = Some(cache.clone());
        *self.saves.lock().unwrap_or_else(|e| e.into_inner()) += 1;
        Ok(())
    }
}
