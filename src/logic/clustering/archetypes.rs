//! Damage Archetypes & Similarity Matching
//!
//! Four fixed reference signatures over the clustering feature layout.
//! The reference matrix is standardized once at startup and shared
//! read-only; cluster centroids are matched to it by cosine similarity.

use ndarray::{Array2, ArrayView1};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use super::scaler::StandardScaler;
use crate::logic::features::FEATURE_COUNT;

// ============================================================================
// LABELS
// ============================================================================

/// Environmental damage classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DamageLabel {
    Normal,
    Moisture,
    Dust,
    Temperature,
}

impl DamageLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            DamageLabel::Normal => "Normal",
            DamageLabel::Moisture => "Moisture",
            DamageLabel::Dust => "Dust",
            DamageLabel::Temperature => "Temperature",
        }
    }
}

impl std::fmt::Display for DamageLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// REFERENCE SIGNATURES
// ============================================================================

/// Archetype order; similarity rows index into this
pub const DAMAGE_LABELS: [DamageLabel; 4] = [
    DamageLabel::Normal,
    DamageLabel::Moisture,
    DamageLabel::Dust,
    DamageLabel::Temperature,
];

/// Raw reference signatures over {IR, PI, DD, TD_TipUp, Cap_TipUp}
pub const REFERENCE_PATTERNS: [[f64; FEATURE_COUNT]; 4] = [
    [0.9, 0.9, 0.1, 0.1, 0.1], // Normal
    [0.2, 0.2, 0.9, 0.8, 0.9], // Moisture
    [0.5, 0.5, 0.8, 0.5, 0.8], // Dust
    [0.6, 0.5, 0.5, 0.8, 0.6], // Temperature
];

/// Reference matrix standardized across the four signatures, built once
static REFERENCE_MATRIX: Lazy<Array2<f64>> = Lazy::new(|| {
    let flat: Vec<f64> = REFERENCE_PATTERNS.iter().flatten().copied().collect();
    let raw = Array2::from_shape_vec((4, FEATURE_COUNT), flat).expect("static shape");
    StandardScaler::fit_transform(&raw)
});

// ============================================================================
// MATCHING
// ============================================================================

/// Cosine similarity; zero when either vector has zero norm
pub fn cosine_similarity(a: ArrayView1<f64>, b: ArrayView1<f64>) -> f64 {
    let dot = a.dot(&b);
    let norm = a.dot(&a).sqrt() * b.dot(&b).sqrt();
    if norm > 0.0 {
        dot / norm
    } else {
        0.0
    }
}

/// Match one standardized centroid against all four archetypes
///
/// Returns the best label and its similarity; ties resolve to the
/// earliest archetype in [`DAMAGE_LABELS`] order.
pub fn match_centroid(centroid: ArrayView1<f64>) -> (DamageLabel, f64) {
    let mut best = (DAMAGE_LABELS[0], f64::NEG_INFINITY);
    for (i, label) in DAMAGE_LABELS.iter().enumerate() {
        let similarity = cosine_similarity(centroid, REFERENCE_MATRIX.row(i));
        if similarity > best.1 {
            best = (*label, similarity);
        }
    }
    best
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_cosine_similarity_basics() {
        let a = array![1.0, 0.0];
        let b = array![1.0, 0.0];
        let c = array![-1.0, 0.0];
        let zero = array![0.0, 0.0];
        assert!((cosine_similarity(a.view(), b.view()) - 1.0).abs() < 1e-12);
        assert!((cosine_similarity(a.view(), c.view()) + 1.0).abs() < 1e-12);
        assert_eq!(cosine_similarity(a.view(), zero.view()), 0.0);
    }

    #[test]
    fn test_each_archetype_matches_itself() {
        for (i, label) in DAMAGE_LABELS.iter().enumerate() {
            let (matched, similarity) = match_centroid(REFERENCE_MATRIX.row(i));
            assert_eq!(matched, *label);
            assert!((similarity - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_similarity_within_bounds() {
        let centroid = array![2.0, -1.0, 0.5, 0.0, -3.0];
        let (_, similarity) = match_centroid(centroid.view());
        assert!((-1.0..=1.0).contains(&similarity));
    }

    #[test]
    fn test_reference_matrix_is_standardized() {
        for j in 0..FEATURE_COUNT {
            let col = REFERENCE_MATRIX.column(j);
            let mean: f64 = col.iter().sum::<f64>() / 4.0;
            assert!(mean.abs() < 1e-12);
        }
    }
}
