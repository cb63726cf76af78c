//! TF-IDF vector spaces over one dataset snapshot.
//!
//! The vocabulary is learned from the snapshot's own composite documents, so
//! a [`VectorSpace`] means nothing outside the exact subset it was built from.
//! It carries that subset's [`SubsetKey`] and refuses to pair with any other.

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};

use crate::config::Number;
use crate::error::{RecommendError, Result};
use crate::features::composite_documents;
use crate::restaurant::{Dataset, SubsetKey};
use crate::stopwords::is_stopword;
use crate::vector_ops::{normalize_vector, SparseVector};

static TOKEN_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\w\w+\b").expect("valid token pattern"));

/// Lower-cases `document` and splits it into terms of two or more word
/// characters, dropping English stop words.
pub fn tokenize(document: &str) -> Vec<String> {
    let lowered = document.to_lowercase();
    TOKEN_PATTERN
        .find_iter(&lowered)
        .map(|m| m.as_str())
        .filter(|token| !is_stopword(token))
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Clone)]
pub struct VectorSpace {
    key: SubsetKey,
    vocabulary: Vec<String>,
    idf: Vec<Number>,
    vectors: Vec<SparseVector>,
}

impl VectorSpace {
    pub fn key(&self) -> SubsetKey {
        self.key
    }

    pub fn is_built_for(&self, subset: &Dataset) -> bool {
        self.vectors.len() == subset.len() && self.key == subset.key()
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    pub fn vector(&self, index: usize) -> Option<&SparseVector> {
        self.vectors.get(index)
    }

    pub fn vectors(&self) -> &[SparseVector] {
        &self.vectors
    }

    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }

    pub fn idf(&self, term: &str) -> Option<Number> {
        self.vocabulary
            .binary_search_by(|t| t.as_str().cmp(term))
            .ok()
            .map(|i| self.idf[i])
    }
}

/// Builds the TF-IDF space of `subset`, one vector per row in row order.
pub fn build_vectors(subset: &Dataset) -> Result<VectorSpace> {
    if subset.len() < 2 {
        return Err(RecommendError::InsufficientData { rows: subset.len() });
    }

    let tokenized: Vec<Vec<String>> = composite_documents(subset)
        .iter()
        .map(|document| tokenize(document))
        .collect();

    let vocabulary: Vec<String> = tokenized
        .iter()
        .flatten()
        .cloned()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let index_of: BTreeMap<&str, usize> = vocabulary
        .iter()
        .enumerate()
        .map(|(i, term)| (term.as_str(), i))
        .collect();

    let counts: Vec<BTreeMap<usize, usize>> = tokenized
        .iter()
        .map(|tokens| {
            let mut counts = BTreeMap::new();
            for token in tokens {
                *counts.entry(index_of[token.as_str()]).or_insert(0) += 1;
            }
            counts
        })
        .collect();

    let mut document_frequency = vec![0usize; vocabulary.len()];
    for row in &counts {
        for &term in row.keys() {
            document_frequency[term] += 1;
        }
    }

    let n = subset.len() as Number;
    let idf: Vec<Number> = document_frequency
        .iter()
        .map(|&df| ((1.0 + n) / (1.0 + df as Number)).ln() + 1.0)
        .collect();

    let vectors = counts
        .into_iter()
        .map(|row| {
            let mut vector: SparseVector = row
                .into_iter()
                .map(|(term, count)| (term, count as Number * idf[term]))
                .collect();
            normalize_vector(&mut vector);
            vector
        })
        .collect();

    let key = subset.key();
    debug!(
        "Built vector space {} with {} rows and {} terms",
        key,
        subset.len(),
        vocabulary.len()
    );

    Ok(VectorSpace {
        key,
        vocabulary,
        idf,
        vectors,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::restaurant::{Restaurant, SourceDigest};
    use crate::vector_ops::magnitude;

    fn restaurant(name: &str, cuisines: &str, cost: Option<f64>, rating: f64) -> Restaurant {
        Restaurant {
            name: name.to_string(),
            cuisines: cuisines.to_string(),
            average_cost_for_two: cost,
            aggregate_rating: rating,
            ..Restaurant::default()
        }
    }

    fn dataset(records: Vec<Restaurant>) -> Dataset {
        Dataset::new(SourceDigest::from_bytes(b"vectorizer"), records)
    }

    #[test]
    fn test_tokenize() {
        assert_eq!(
            tokenize("North Indian, Chinese 500.0 4.2"),
            vec!["north", "indian", "chinese", "500"]
        );
        assert_eq!(tokenize("The Cafe and a Bar"), vec!["cafe", "bar"]);
    }

    #[test]
    fn test_insufficient_data() {
        let empty = dataset(vec![]);
        assert_eq!(
            build_vectors(&empty).unwrap_err(),
            RecommendError::InsufficientData { rows: 0 }
        );
        let single = dataset(vec![restaurant("A", "Chinese", None, 4.0)]);
        assert_eq!(
            build_vectors(&single).unwrap_err(),
            RecommendError::InsufficientData { rows: 1 }
        );
    }

    #[test]
    fn test_vocabulary_is_sorted_and_subset_local() {
        let full = dataset(vec![
            restaurant("A", "Chinese", Some(500.0), 4.2),
            restaurant("B", "Italian", Some(600.0), 3.5),
            restaurant("C", "Mexican", None, 3.0),
        ]);
        let space = build_vectors(&full).expect("vectors");
        assert_eq!(
            space.vocabulary(),
            &["500", "600", "chinese", "italian", "mexican"]
        );

        let subset = full.select(vec![0, 1]);
        let space = build_vectors(&subset).expect("vectors");
        assert_eq!(space.vocabulary(), &["500", "600", "chinese", "italian"]);
        assert!(space.is_built_for(&subset));
        assert!(!space.is_built_for(&full));
    }

    #[test]
    fn test_smoothed_idf_and_normalized_rows() {
        let full = dataset(vec![
            restaurant("A", "Chinese", None, 4.0),
            restaurant("B", "Chinese", None, 4.0),
            restaurant("C", "Italian", None, 4.0),
        ]);
        let space = build_vectors(&full).expect("vectors");
        let chinese = space.idf("chinese").expect("term");
        let italian = space.idf("italian").expect("term");
        assert!((chinese - ((4.0f64 / 3.0).ln() + 1.0)).abs() < 1e-12);
        assert!((italian - ((4.0f64 / 2.0).ln() + 1.0)).abs() < 1e-12);
        for vector in space.vectors() {
            assert!((magnitude(vector) - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_stopword_only_document_yields_zero_vector() {
        let full = dataset(vec![
            restaurant("A", "the", None, 4.0),
            restaurant("B", "Chinese", None, 4.0),
        ]);
        let space = build_vectors(&full).expect("vectors");
        assert!(space.vector(0).map(|v| v.is_empty()).unwrap_or(false));
        assert_eq!(space.vector(1).map(|v| v.len()), Some(1));
    }
}
