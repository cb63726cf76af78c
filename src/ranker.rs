use log::{debug, warn};
use serde::Serialize;

use crate::config::Number;
use crate::error::{RecommendError, Result};
use crate::restaurant::{Dataset, Restaurant};
use crate::vector_ops::compute_cosine_similarity;
use crate::vectorizer::VectorSpace;

/// A neighbour of the anchor, by position in the subset the ranking ran on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Recommendation {
    pub index: usize,
    pub similarity: Number,
}

/// What the rendering layer shows for one recommendation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendedRestaurant {
    pub name: String,
    pub cuisines: String,
    pub average_cost_for_two: Option<f64>,
    pub aggregate_rating: f64,
    pub thumbnail_url: String,
    pub similarity: Number,
}

impl Recommendation {
    pub fn resolve(&self, subset: &Dataset) -> Option<RecommendedRestaurant> {
        subset.get(self.index).map(|r| RecommendedRestaurant {
            name: r.name.clone(),
            cuisines: r.cuisines.clone(),
            average_cost_for_two: r.average_cost_for_two,
            aggregate_rating: r.aggregate_rating,
            thumbnail_url: r.thumbnail_url.clone(),
            similarity: self.similarity,
        })
    }
}

/// First row of `subset` named `name`.
pub fn find_anchor(subset: &Dataset, name: &str) -> Option<usize> {
    subset.iter().position(|r| r.name == name)
}

/// Ranks every other row of `subset` by cosine similarity to `anchor_name`.
pub fn recommend(
    subset: &Dataset,
    space: &VectorSpace,
    anchor_name: &str,
    top_n: usize,
) -> Result<Vec<Recommendation>> {
    if subset.len() < 2 {
        return Err(RecommendError::InsufficientData { rows: subset.len() });
    }
    if !space.is_built_for(subset) {
        return Err(RecommendError::SubsetMismatch);
    }
    let anchor = find_anchor(subset, anchor_name).ok_or_else(|| {
        warn!("Anchor '{}' is not in the current subset", anchor_name);
        RecommendError::NotFound {
            name: anchor_name.to_string(),
        }
    })?;
    let anchor_vector = space.vector(anchor).ok_or(RecommendError::SubsetMismatch)?;

    let scored = space
        .vectors()
        .iter()
        .enumerate()
        .map(|(index, vector)| Recommendation {
            index,
            similarity: compute_cosine_similarity(anchor_vector, vector),
        })
        .collect();

    let results = sort_and_limit_results(scored, anchor, top_n);
    debug!(
        "Anchor '{}' at row {}: {} recommendations (requested {})",
        anchor_name,
        anchor,
        results.len(),
        top_n
    );
    Ok(results)
}

fn sort_and_limit_results(
    mut results: Vec<Recommendation>,
    anchor: usize,
    limit: usize,
) -> Vec<Recommendation> {
    // stable: equal scores keep subset row order
    results.sort_by(|a, b| {
        b.similarity
            .partial_cmp(&a.similarity)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    results.retain(|r| r.index != anchor);
    results.truncate(limit);
    results
}

/// Highest rated rows first; equal ratings keep their original order.
pub fn top_n_by_rating(dataset: &Dataset, n: usize) -> Vec<Restaurant> {
    let mut rows: Vec<&Restaurant> = dataset.iter().collect();
    rows.sort_by(|a, b| b.aggregate_rating.total_cmp(&a.aggregate_rating));
    rows.into_iter().take(n).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::restaurant::SourceDigest;
    use crate::vectorizer::build_vectors;

    fn restaurant(name: &str, cuisines: &str, cost: f64, rating: f64) -> Restaurant {
        Restaurant {
            name: name.to_string(),
            cuisines: cuisines.to_string(),
            average_cost_for_two: Some(cost),
            aggregate_rating: rating,
            ..Restaurant::default()
        }
    }

    fn dataset(records: Vec<Restaurant>) -> Dataset {
        Dataset::new(SourceDigest::from_bytes(b"ranker"), records)
    }

    #[test]
    fn test_shared_cuisine_ranks_first() {
        let subset = dataset(vec![
            restaurant("A", "Chinese", 500.0, 4.2),
            restaurant("B", "Chinese", 520.0, 4.0),
            restaurant("C", "Italian", 600.0, 3.5),
        ]);
        let space = build_vectors(&subset).expect("vectors");
        let results = recommend(&subset, &space, "A", 2).expect("recommend");
        let indices: Vec<usize> = results.iter().map(|r| r.index).collect();
        assert_eq!(indices, vec![1, 2]);
        assert!(results[0].similarity > results[1].similarity);
    }

    #[test]
    fn test_ties_keep_row_order() {
        let subset = dataset(vec![
            restaurant("A", "Thai", 100.0, 4.0),
            restaurant("B", "Italian", 200.0, 4.0),
            restaurant("C", "Mexican", 300.0, 4.0),
            restaurant("D", "Greek", 400.0, 4.0),
        ]);
        let space = build_vectors(&subset).expect("vectors");
        let results = recommend(&subset, &space, "C", 10).expect("recommend");
        let indices: Vec<usize> = results.iter().map(|r| r.index).collect();
        assert_eq!(indices, vec![0, 1, 3]);
    }

    #[test]
    fn test_not_found() {
        let subset = dataset(vec![
            restaurant("A", "Chinese", 500.0, 4.2),
            restaurant("B", "Chinese", 520.0, 4.0),
        ]);
        let space = build_vectors(&subset).expect("vectors");
        assert_eq!(
            recommend(&subset, &space, "Z", 3).unwrap_err(),
            RecommendError::NotFound {
                name: "Z".to_string()
            }
        );
    }

    #[test]
    fn test_space_from_other_subset_is_rejected() {
        let full = dataset(vec![
            restaurant("A", "Chinese", 500.0, 4.2),
            restaurant("B", "Chinese", 520.0, 4.0),
            restaurant("C", "Italian", 600.0, 3.5),
        ]);
        let ab = full.select(vec![0, 1]);
        let ac = full.select(vec![0, 2]);
        let space = build_vectors(&ab).expect("vectors");
        assert_eq!(
            recommend(&ac, &space, "A", 3).unwrap_err(),
            RecommendError::SubsetMismatch
        );
    }

    #[test]
    fn test_resolve_maps_back_to_records() {
        let subset = dataset(vec![
            restaurant("A", "Chinese", 500.0, 4.2),
            restaurant("B", "Chinese", 520.0, 4.0),
        ]);
        let space = build_vectors(&subset).expect("vectors");
        let results = recommend(&subset, &space, "A", 1).expect("recommend");
        let card = results[0].resolve(&subset).expect("resolve");
        assert_eq!(card.name, "B");
        assert_eq!(card.average_cost_for_two, Some(520.0));
    }

    #[test]
    fn test_top_n_by_rating() {
        let full = dataset(vec![
            restaurant("P", "Thai", 1.0, 4.9),
            restaurant("Q", "Thai", 1.0, 4.9),
            restaurant("R", "Thai", 1.0, 3.1),
            restaurant("S", "Thai", 1.0, 5.0),
        ]);
        let names: Vec<String> = top_n_by_rating(&full, 3).into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["S", "P", "Q"]);
        assert!(top_n_by_rating(&dataset(vec![]), 3).is_empty());
        assert_eq!(top_n_by_rating(&full, 10).len(), 4);
    }
}
