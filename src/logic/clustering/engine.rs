//! Environmental Damage Clustering Engine
//!
//! Per-department pipeline: standardize the feature subset, pick the
//! mixture order by BIC, hard-assign rows, and label each cluster by its
//! closest damage archetype. Departments are fully independent; each one
//! owns its scaler and mixture, and a failed fit never aborts the batch.

use ndarray::Array2;

use super::archetypes::match_centroid;
use super::gmm::{FitError, GaussianMixture};
use super::scaler::StandardScaler;
use super::types::{ClusterSummary, DepartmentClusters, DepartmentOutcome, RowAssignment};
use crate::logic::features::{layout, MotorTestRecord, FEATURE_COUNT};

/// Departments need at least this many feature-complete rows
pub const MIN_DEPARTMENT_ROWS: usize = 3;

/// Exclusive upper bound of the component search
pub const MAX_COMPONENTS: usize = 5;

// ============================================================================
// ENGINE
// ============================================================================

/// Cluster every department partition of `records`
///
/// Records without a department or with an incomplete feature vector are
/// dropped from their partition (they still count toward nothing - the
/// usable-row threshold sees only complete rows). Partitions are visited
/// in first-seen order, so output order is stable for a fixed input.
pub fn classify_damage(records: &[MotorTestRecord], seed: u64) -> Vec<DepartmentOutcome> {
    let mut partitions: Vec<(String, Vec<(usize, [f64; FEATURE_COUNT])>)> = Vec::new();

    for (row, record) in records.iter().enumerate() {
        let Some(department) = record.department.as_deref() else {
            continue;
        };
        let index = match partitions.iter().position(|(name, _)| name == department) {
            Some(i) => i,
            None => {
                partitions.push((department.to_string(), Vec::new()));
                partitions.len() - 1
            }
        };
        if let Some(features) = record.cluster_features() {
            partitions[index].1.push((row, features));
        }
    }

    partitions
        .into_iter()
        .map(|(department, rows)| {
            if rows.len() < MIN_DEPARTMENT_ROWS {
                log::info!(
                    "Department {}: {} usable rows, need {} - skipped",
                    department,
                    rows.len(),
                    MIN_DEPARTMENT_ROWS
                );
                return DepartmentOutcome::Skipped {
                    usable_rows: rows.len(),
                    department,
                };
            }
            match cluster_department(&department, &rows, seed) {
                Ok(clusters) => DepartmentOutcome::Clustered(clusters),
                Err(e) => {
                    log::warn!("Department {}: clustering failed: {}", department, e);
                    DepartmentOutcome::Failed {
                        department,
                        reason: e.to_string(),
                    }
                }
            }
        })
        .collect()
}

/// Fit one department partition
fn cluster_department(
    department: &str,
    rows: &[(usize, [f64; FEATURE_COUNT])],
    seed: u64,
) -> Result<DepartmentClusters, FitError> {
    let n = rows.len();
    let flat: Vec<f64> = rows.iter().flat_map(|(_, f)| f.iter().copied()).collect();
    let raw = Array2::from_shape_vec((n, FEATURE_COUNT), flat).expect("row-major features");
    let scaled = StandardScaler::fit_transform(&raw);

    // Model-order search: scan k upward, keep the first strict BIC minimum
    let mut best_k = 2;
    let mut lowest_bic = f64::INFINITY;
    for k in 2..MAX_COMPONENTS.min(n) {
        let candidate = GaussianMixture::new(k, seed).fit(&scaled)?;
        let bic = candidate.bic(&scaled);
        log::debug!("Department {}: k={} BIC={:.3}", department, k, bic);
        if bic < lowest_bic {
            lowest_bic = bic;
            best_k = k;
        }
    }

    let fit = GaussianMixture::new(best_k, seed).fit(&scaled)?;
    let labels = fit.predict(&scaled);

    // Centroids of the non-empty clusters, in standardized feature space
    let mut members: Vec<Vec<usize>> = vec![Vec::new(); best_k];
    for (i, &cluster) in labels.iter().enumerate() {
        members[cluster].push(i);
    }
    let occupied: Vec<usize> = (0..best_k).filter(|c| !members[*c].is_empty()).collect();

    let mut centroids = Array2::zeros((occupied.len(), FEATURE_COUNT));
    for (slot, &cluster) in occupied.iter().enumerate() {
        for &i in &members[cluster] {
            for j in 0..FEATURE_COUNT {
                centroids[[slot, j]] += scaled[[i, j]];
            }
        }
        let size = members[cluster].len() as f64;
        for j in 0..FEATURE_COUNT {
            centroids[[slot, j]] /= size;
        }
    }

    // Re-standardize the centroid set before archetype comparison
    let centroids_scaled = StandardScaler::fit_transform(&centroids);

    let clusters: Vec<ClusterSummary> = occupied
        .iter()
        .enumerate()
        .map(|(slot, &cluster)| {
            let (label, confidence) = match_centroid(centroids_scaled.row(slot));
            ClusterSummary {
                id: cluster,
                label,
                confidence,
                size: members[cluster].len(),
                centroid: centroids.row(slot).to_vec(),
            }
        })
        .collect();

    let assignments: Vec<RowAssignment> = labels
        .iter()
        .enumerate()
        .map(|(i, &cluster)| {
            let summary = clusters
                .iter()
                .find(|c| c.id == cluster)
                .expect("assigned cluster is occupied");
            RowAssignment {
                row: rows[i].0,
                cluster,
                label: summary.label,
                confidence: summary.confidence,
            }
        })
        .collect();

    log::info!(
        "Department {}: {} rows, k={} (BIC {:.3}), {} occupied clusters",
        department,
        n,
        best_k,
        lowest_bic,
        clusters.len()
    );

    Ok(DepartmentClusters {
        department: department.to_string(),
        n_components: best_k,
        bic: lowest_bic,
        clusters,
        assignments,
        feature_version: layout::FEATURE_VERSION,
        layout_hash: layout::layout_hash(),
    })
}
