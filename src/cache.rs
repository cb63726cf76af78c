//! Memoization of the two expensive steps: loading a source and building a
//! vector space. Both are plain maps owned by a session; a miss recomputes.

use log::debug;
use std::collections::{HashMap, VecDeque};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use crate::error::{RecommendError, Result};
use crate::loader::load;
use crate::restaurant::{Dataset, SubsetKey};
use crate::vectorizer::{build_vectors, VectorSpace};

/// Path plus modification signal of a data source.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceKey {
    pub path: PathBuf,
    pub modified: Option<SystemTime>,
    pub len: u64,
}

impl SourceKey {
    pub fn probe(path: &Path) -> Result<Self> {
        let label = path.display().to_string();
        let canonical = fs::canonicalize(path).map_err(|e| RecommendError::data_load(&label, e))?;
        let metadata = fs::metadata(&canonical).map_err(|e| RecommendError::data_load(&label, e))?;
        Ok(Self {
            path: canonical,
            modified: metadata.modified().ok(),
            len: metadata.len(),
        })
    }
}

#[derive(Default)]
pub struct DatasetCache {
    entries: HashMap<PathBuf, (SourceKey, Arc<Dataset>)>,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached dataset for `path` unless the file changed since it
    /// was loaded, in which case the entry is replaced.
    pub fn get_or_load(&mut self, path: &Path) -> Result<Arc<Dataset>> {
        let key = SourceKey::probe(path)?;
        if let Some((cached_key, dataset)) = self.entries.get(&key.path) {
            if *cached_key == key {
                debug!("Dataset cache hit for {}", key.path.display());
                return Ok(Arc::clone(dataset));
            }
            debug!("Source {} changed, reloading", key.path.display());
        }
        let dataset = Arc::new(load(&key.path)?);
        self.entries
            .insert(key.path.clone(), (key, Arc::clone(&dataset)));
        Ok(dataset)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Vector spaces keyed by the exact subset they were built from, evicted
/// oldest first past `capacity`.
pub struct VectorCache {
    capacity: usize,
    entries: HashMap<SubsetKey, Arc<VectorSpace>>,
    order: VecDeque<SubsetKey>,
}

impl VectorCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: HashMap::new(),
            order: VecDeque::new(),
        }
    }

    pub fn get_or_build(&mut self, subset: &Dataset) -> Result<Arc<VectorSpace>> {
        let key = subset.key();
        if let Some(space) = self.entries.get(&key) {
            debug!("Vector cache hit for subset {}", key);
            return Ok(Arc::clone(space));
        }
        debug!("Vector cache miss for subset {}", key);
        let space = Arc::new(build_vectors(subset)?);
        while self.order.len() >= self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.entries.remove(&oldest);
            }
        }
        self.entries.insert(key, Arc::clone(&space));
        self.order.push_back(key);
        Ok(space)
    }

    pub fn contains(&self, subset: &Dataset) -> bool {
        self.entries.contains_key(&subset.key())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }
}
