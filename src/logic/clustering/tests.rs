//! Integration Tests for the Damage-Mapping Pipeline
//!
//! Exercises partitioning, the BIC search bounds, assignment accounting,
//! and reproducibility across the whole engine.

use super::engine::{classify_damage, MAX_COMPONENTS, MIN_DEPARTMENT_ROWS};
use super::types::DepartmentOutcome;
use crate::logic::features::MotorTestRecord;

fn record(department: &str, ir: f64, pi: f64, dd: f64, td100: f64, cap: f64) -> MotorTestRecord {
    MotorTestRecord {
        department: Some(department.to_string()),
        ir: Some(ir),
        pi: Some(pi),
        dd: Some(dd),
        td20: Some(0.0),
        td100: Some(td100),
        cap_tipup: Some(cap),
        ..Default::default()
    }
}

/// A department with two clearly distinct motor populations
fn bimodal_department(name: &str, rows_per_mode: usize) -> Vec<MotorTestRecord> {
    let mut records = Vec::new();
    for i in 0..rows_per_mode {
        let jitter = i as f64 * 0.013;
        // Healthy-looking motors
        records.push(record(name, 0.9 + jitter, 0.9, 0.1, 0.1 + jitter, 0.1));
        // Moisture-pattern motors
        records.push(record(name, 0.2 - jitter * 0.1, 0.2, 0.9, 0.8, 0.9 - jitter));
    }
    records
}

#[test]
fn test_small_department_is_skipped() {
    let mut records = bimodal_department("Press", 4);
    records.push(record("Annex", 1.0, 2.0, 1.0, 0.1, 0.1));
    records.push(record("Annex", 0.9, 1.9, 1.1, 0.2, 0.1));

    let outcomes = classify_damage(&records, 42);
    assert_eq!(outcomes.len(), 2);
    assert!(matches!(outcomes[0], DepartmentOutcome::Clustered(_)));
    assert!(matches!(
        outcomes[1],
        DepartmentOutcome::Skipped {
            ref department,
            usable_rows: 2
        } if department.as_str() == "Annex"
    ));
}

#[test]
fn test_three_rows_forces_two_components() {
    // range [2, min(3, 5)) = {2}
    let records = vec![
        record("Mill", 0.9, 0.9, 0.1, 0.1, 0.1),
        record("Mill", 0.85, 0.92, 0.12, 0.15, 0.1),
        record("Mill", 0.2, 0.2, 0.9, 0.8, 0.9),
    ];
    let outcomes = classify_damage(&records, 42);
    let DepartmentOutcome::Clustered(ref clusters) = outcomes[0] else {
        panic!("expected a clustered outcome");
    };
    assert_eq!(clusters.n_components, 2);
    assert_eq!(clusters.assignments.len(), 3);
}

#[test]
fn test_selected_order_within_search_bounds() {
    let records = bimodal_department("Foundry", 10);
    let outcomes = classify_damage(&records, 42);
    let DepartmentOutcome::Clustered(ref clusters) = outcomes[0] else {
        panic!("expected a clustered outcome");
    };
    assert!(clusters.n_components >= 2);
    assert!(clusters.n_components < MAX_COMPONENTS.min(records.len()));
}

#[test]
fn test_cluster_sizes_sum_to_usable_rows() {
    let mut records = bimodal_department("Foundry", 8);
    // An incomplete row is dropped, not counted
    records.push(MotorTestRecord {
        department: Some("Foundry".to_string()),
        ir: Some(0.5),
        ..Default::default()
    });

    let outcomes = classify_damage(&records, 42);
    let DepartmentOutcome::Clustered(ref clusters) = outcomes[0] else {
        panic!("expected a clustered outcome");
    };
    let total: usize = clusters.clusters.iter().map(|c| c.size).sum();
    assert_eq!(total, 16);
    assert_eq!(clusters.assignments.len(), 16);
}

#[test]
fn test_every_row_inherits_its_cluster_label() {
    let records = bimodal_department("Press", 6);
    let outcomes = classify_damage(&records, 42);
    let DepartmentOutcome::Clustered(ref clusters) = outcomes[0] else {
        panic!("expected a clustered outcome");
    };
    for assignment in &clusters.assignments {
        let cluster = clusters
            .clusters
            .iter()
            .find(|c| c.id == assignment.cluster)
            .expect("assignment points at an occupied cluster");
        assert_eq!(assignment.label, cluster.label);
        assert_eq!(assignment.confidence, cluster.confidence);
        assert!((-1.0..=1.0).contains(&assignment.confidence));
    }
}

#[test]
fn test_departments_do_not_share_clusters() {
    let mut records = bimodal_department("A", 4);
    records.extend(bimodal_department("B", 4));

    let outcomes = classify_damage(&records, 42);
    assert_eq!(outcomes.len(), 2);
    for outcome in &outcomes {
        let DepartmentOutcome::Clustered(clusters) = outcome else {
            panic!("expected clustered outcomes");
        };
        assert_eq!(clusters.assignments.len(), 8);
    }
    // Row indices must not overlap across partitions
    let DepartmentOutcome::Clustered(ref a) = outcomes[0] else { unreachable!() };
    let DepartmentOutcome::Clustered(ref b) = outcomes[1] else { unreachable!() };
    for assignment in &a.assignments {
        assert!(b.assignments.iter().all(|other| other.row != assignment.row));
    }
}

#[test]
fn test_deterministic_for_fixed_seed() {
    let records = bimodal_department("Foundry", 7);
    let first = classify_damage(&records, 42);
    let second = classify_damage(&records, 42);
    assert_eq!(first, second);
}

#[test]
fn test_min_rows_constant() {
    assert_eq!(MIN_DEPARTMENT_ROWS, 3);
}
