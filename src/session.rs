use log::debug;
use std::path::Path;
use std::sync::Arc;

use crate::cache::{DatasetCache, VectorCache};
use crate::config::State;
use crate::error::Result;
use crate::filter::FilterParams;
use crate::ranker::{recommend, top_n_by_rating, RecommendedRestaurant};
use crate::restaurant::{Dataset, Restaurant};
use crate::vectorizer::VectorSpace;

/// One user's working context: the caches, nothing else. Filter values and
/// counts come in as arguments on every call.
pub struct Session {
    datasets: DatasetCache,
    vectors: VectorCache,
}

impl Session {
    pub fn new(vector_cache_capacity: usize) -> Self {
        Self {
            datasets: DatasetCache::new(),
            vectors: VectorCache::new(vector_cache_capacity),
        }
    }

    pub fn from_state(state: &State) -> Self {
        Self::new(state.vector_cache_capacity)
    }

    pub fn dataset(&mut self, path: &Path) -> Result<Arc<Dataset>> {
        self.datasets.get_or_load(path)
    }

    pub fn subset(&mut self, path: &Path, params: &FilterParams) -> Result<Dataset> {
        let dataset = self.dataset(path)?;
        Ok(params.apply(&dataset))
    }

    pub fn vectors(&mut self, subset: &Dataset) -> Result<Arc<VectorSpace>> {
        self.vectors.get_or_build(subset)
    }

    pub fn recommend(
        &mut self,
        path: &Path,
        params: &FilterParams,
        anchor_name: &str,
        top_n: usize,
    ) -> Result<Vec<RecommendedRestaurant>> {
        let subset = self.subset(path, params)?;
        let space = self.vectors(&subset)?;
        let ranked = recommend(&subset, &space, anchor_name, top_n)?;
        debug!("Resolving {} recommendations for '{}'", ranked.len(), anchor_name);
        Ok(ranked
            .iter()
            .filter_map(|recommendation| recommendation.resolve(&subset))
            .collect())
    }

    pub fn leaderboard(
        &mut self,
        path: &Path,
        params: &FilterParams,
        n: usize,
    ) -> Result<Vec<Restaurant>> {
        let subset = self.subset(path, params)?;
        Ok(top_n_by_rating(&subset, n))
    }

    pub fn cached_vector_spaces(&self) -> usize {
        self.vectors.len()
    }
}
