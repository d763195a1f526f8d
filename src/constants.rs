//! Central Configuration Constants
//!
//! Single source of truth for engine defaults.
//! Runtime overrides come from environment variables via the helpers below.

/// Engine name
pub const ENGINE_NAME: &str = "motor-diag-core";

/// Engine version
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default average motor service life (years)
///
/// Used by the RUL projection when the caller does not supply a
/// fleet-specific figure.
pub const DEFAULT_AVERAGE_LIFE_YEARS: f64 = 100.0;

/// Default seed for mixture-model initialization
///
/// Fixed so repeated runs over the same upload produce identical clusters.
pub const DEFAULT_MIXTURE_SEED: u64 = 42;

// ============================================
// Helper functions to read from env with fallback
// ============================================

/// Get average motor life from environment or use default
pub fn get_average_life() -> f64 {
    std::env::var("MOTOR_AVG_LIFE_YEARS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_AVERAGE_LIFE_YEARS)
}

/// Get mixture seed from environment or use default
pub fn get_mixture_seed() -> u64 {
    std::env::var("MOTOR_MIXTURE_SEED")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_MIXTURE_SEED)
}
