//! Cosine similarity over sparse term-frequency vectors, used to rank
//! destinations against a visitor's preferences.

use std::collections::HashMap;
use std::hash::{BuildHasher, Hash};

use rayon::prelude::*;
use serde::Serialize;

/// Sparse bag-of-words vector
pub type TermVector = HashMap<String, f64>;

/// Cosine of the angle between two sparse vectors.
///
/// Missing keys count as zero. Returns `0.0` when either vector has zero
/// norm, otherwise a value in `[-1, 1]` (`[0, 1]` for frequency vectors).
pub fn cosine_similarity<K, S>(a: &HashMap<K, f64, S>, b: &HashMap<K, f64, S>) -> f64
where
    K: Eq + Hash,
    S: BuildHasher,
{
    // Only shared keys contribute to the dot product
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    let dot: f64 = small
        .iter()
        .filter_map(|(term, weight)| large.get(term).map(|other| weight * other))
        .sum();

    let norm_a = norm(a);
    let norm_b = norm(b);
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    (dot / (norm_a * norm_b)).clamp(-1.0, 1.0)
}

fn norm<K, S>(vector: &HashMap<K, f64, S>) -> f64 {
    vector.values().map(|weight| weight * weight).sum::<f64>().sqrt()
}

/// Term frequencies of lowercase alphanumeric tokens in `text`
pub fn term_frequencies(text: &str) -> TermVector {
    let mut frequencies = TermVector::new();
    for token in text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
    {
        *frequencies.entry(token.to_lowercase()).or_insert(0.0) += 1.0;
    }
    frequencies
}

/// Similarity score of one candidate
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ranked<Id> {
    pub id: Id,
    pub score: f64,
}

/// Score every candidate against `preference`, best first.
///
/// Candidates with equal scores keep their input order.
pub fn rank_by_similarity<Id>(preference: &TermVector, candidates: &[(Id, TermVector)]) -> Vec<Ranked<Id>>
where
    Id: Clone + Send + Sync,
{
    let mut ranked: Vec<Ranked<Id>> = candidates
        .par_iter()
        .map(|(id, vector)| Ranked {
            id: id.clone(),
            score: cosine_similarity(preference, vector),
        })
        .collect();
    // Stable sort, ties stay in input order
    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
    ranked
}
