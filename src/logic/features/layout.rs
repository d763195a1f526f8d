//! Clustering Feature Layout
//!
//! Centralized definition of the feature subset the damage-mapping engine
//! clusters on. Order matters: archetype vectors, scalers, and centroids
//! all index features by this layout, and the layout hash travels with
//! exported results so downstream consumers can detect a mismatch.

use crc32fast::Hasher;

/// Current feature layout version
/// MUST be incremented when the layout changes
pub const FEATURE_VERSION: u8 = 1;

/// Feature names in the exact order they appear in a feature vector
pub const FEATURE_LAYOUT: &[&str] = &[
    "IR",        // 0: Insulation resistance (GΩ)
    "PI",        // 1: Polarization index
    "DD",        // 2: Dielectric discharge
    "TD_TipUp",  // 3: Tan-delta tip-up (TD100 - TD20, recomputed)
    "Cap_TipUp", // 4: Capacitance tip-up
];

/// Total number of clustering features
/// IMPORTANT: Must match FEATURE_LAYOUT.len()!
pub const FEATURE_COUNT: usize = 5;

// ============================================================================
// LAYOUT HASH
// ============================================================================

/// Compute CRC32 hash of the feature layout
pub fn compute_layout_hash() -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(&[FEATURE_VERSION]);
    for name in FEATURE_LAYOUT {
        hasher.update(name.as_bytes());
        hasher.update(&[0]); // Separator
    }
    hasher.finalize()
}

/// Get layout hash (inputs are const, so this is stable per build)
pub fn layout_hash() -> u32 {
    compute_layout_hash()
}

// ============================================================================
// FEATURE INDEX LOOKUP
// ============================================================================

/// Get feature index by name (O(n) but features are few)
pub fn feature_index(name: &str) -> Option<usize> {
    FEATURE_LAYOUT.iter().position(|&n| n == name)
}

/// Get feature name by index
pub fn feature_name(index: usize) -> Option<&'static str> {
    FEATURE_LAYOUT.get(index).copied()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_count() {
        assert_eq!(FEATURE_COUNT, 5);
        assert_eq!(FEATURE_LAYOUT.len(), FEATURE_COUNT);
    }

    #[test]
    fn test_layout_hash_consistency() {
        assert_eq!(compute_layout_hash(), compute_layout_hash());
        assert_ne!(layout_hash(), 0);
    }

    #[test]
    fn test_feature_index() {
        assert_eq!(feature_index("IR"), Some(0));
        assert_eq!(feature_index("TD_TipUp"), Some(3));
        assert_eq!(feature_index("nonexistent"), None);
    }

    #[test]
    fn test_feature_name() {
        assert_eq!(feature_name(0), Some("IR"));
        assert_eq!(feature_name(4), Some("Cap_TipUp"));
        assert_eq!(feature_name(5), None);
    }
}
