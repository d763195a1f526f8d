//! Clustering Module - Environmental Damage Mapping
//!
//! Partitions test records by department, fits a Gaussian mixture per
//! partition with BIC model-order selection, and labels each cluster by
//! cosine similarity to fixed damage archetypes.
//!
//! ## Structure
//! - `scaler`: column-wise standardization
//! - `gmm`: diagonal-covariance mixture fit by EM
//! - `archetypes`: reference damage signatures and similarity matching
//! - `types`: per-department artifacts
//! - `engine`: the per-department pipeline
//!
//! ## Usage
//! ```ignore
//! use crate::logic::clustering::{classify_damage, DepartmentOutcome};
//!
//! for outcome in classify_damage(&records, seed) {
//!     match outcome {
//!         DepartmentOutcome::Clustered(c) => println!("{}: k={}", c.department, c.n_components),
//!         DepartmentOutcome::Skipped { department, .. } => println!("{}: too few rows", department),
//!         DepartmentOutcome::Failed { department, reason } => println!("{}: {}", department, reason),
//!     }
//! }
//! ```

// Allow unused - some exports for embedding callers
#![allow(unused)]

pub mod archetypes;
pub mod engine;
pub mod gmm;
pub mod scaler;
pub mod types;

#[cfg(test)]
mod tests;

pub use archetypes::{cosine_similarity, match_centroid, DamageLabel, REFERENCE_PATTERNS};
pub use engine::{classify_damage, MAX_COMPONENTS, MIN_DEPARTMENT_ROWS};
pub use gmm::{FitError, GaussianMixture, MixtureFit};
pub use scaler::StandardScaler;
pub use types::{ClusterSummary, DepartmentClusters, DepartmentOutcome, RowAssignment};
