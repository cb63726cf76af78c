use crate::config::{Number, EPSILON};
use std::cmp::Ordering;

/// Sparse vector as `(term index, weight)` pairs sorted by term index.
pub type SparseVector = Vec<(usize, Number)>;

pub fn dot(a: &[(usize, Number)], b: &[(usize, Number)]) -> Number {
    let (mut i, mut j) = (0, 0);
    let mut sum = 0.0;
    while i < a.len() && j < b.len() {
        match a[i].0.cmp(&b[j].0) {
            Ordering::Less => i += 1,
            Ordering::Greater => j += 1,
            Ordering::Equal => {
                sum += a[i].1 * b[j].1;
                i += 1;
                j += 1;
            }
        }
    }
    sum
}

pub fn magnitude(vector: &[(usize, Number)]) -> Number {
    vector.iter().map(|&(_, x)| x * x).sum::<Number>().sqrt()
}

/// Cosine similarity of two sparse vectors. Zero vectors score 0.
pub fn compute_cosine_similarity(a: &[(usize, Number)], b: &[(usize, Number)]) -> Number {
    let denominator = magnitude(a) * magnitude(b);
    if denominator < EPSILON {
        return 0.0;
    }
    (dot(a, b) / denominator).clamp(-1.0, 1.0)
}

pub fn normalize_vector(vector: &mut [(usize, Number)]) {
    let magnitude = magnitude(vector);
    if magnitude > EPSILON {
        for (_, x) in vector.iter_mut() {
            *x /= magnitude;
        }
    }
}
