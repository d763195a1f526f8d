//! Clustering Types
//!
//! Per-department artifacts of the damage-mapping pipeline.
//! No logic here - partitioning and fitting live in `engine`.

use serde::{Deserialize, Serialize};

use super::archetypes::DamageLabel;

// ============================================================================
// CLUSTER ARTIFACTS
// ============================================================================

/// One fitted cluster within a department partition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterSummary {
    /// Component index within the department's mixture
    pub id: usize,
    pub label: DamageLabel,
    /// Cosine similarity to the winning archetype, in [-1, 1]
    pub confidence: f64,
    /// Number of rows assigned to this cluster
    pub size: usize,
    /// Mean standardized feature vector of the member rows
    pub centroid: Vec<f64>,
}

/// One input row's cluster assignment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowAssignment {
    /// Row index in the caller's record sequence
    pub row: usize,
    pub cluster: usize,
    pub label: DamageLabel,
    pub confidence: f64,
}

/// A department's fitted clustering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepartmentClusters {
    pub department: String,
    /// Component count selected by the BIC search
    pub n_components: usize,
    /// BIC of the selected model order
    pub bic: f64,
    pub clusters: Vec<ClusterSummary>,
    pub assignments: Vec<RowAssignment>,
    /// Feature schema the centroids are expressed in
    pub feature_version: u8,
    pub layout_hash: u32,
}

// ============================================================================
// OUTCOMES
// ============================================================================

/// Per-department result: fitted, skipped for lack of data, or failed
///
/// A failure is isolated to its department; the batch continues.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DepartmentOutcome {
    Clustered(DepartmentClusters),
    Skipped {
        department: String,
        usable_rows: usize,
    },
    Failed {
        department: String,
        reason: String,
    },
}

impl DepartmentOutcome {
    pub fn department(&self) -> &str {
        match self {
            DepartmentOutcome::Clustered(c) => &c.department,
            DepartmentOutcome::Skipped { department, .. } => department,
            DepartmentOutcome::Failed { department, .. } => department,
        }
    }
}
