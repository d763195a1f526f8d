//! Batch Transforms
//!
//! Table-level entry points for the three analyses. Each validates the
//! upload's column contract, runs the pure engine row by row, and returns
//! the augmented table plus a summary of everything that was rejected,
//! dropped, or skipped along the way. Contract violations stop the batch
//! before any row is processed; row and department anomalies are isolated
//! and reported.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::logic::clustering::{classify_damage, DepartmentOutcome};
use crate::logic::diagnosis;
use crate::logic::features::{sanitize_department, MotorTestRecord};
use crate::logic::health;
use crate::logic::table::Table;

// ============================================================================
// COLUMN CONTRACTS
// ============================================================================

/// Columns the diagnosis analysis requires (after normalization)
pub const DIAGNOSIS_COLUMNS: &[&str] = &[
    "IR",
    "PI",
    "DD",
    "TanDelta_20",
    "TanDelta_100",
    "Cap_TipUp",
];

/// Columns the health analysis requires (after normalization)
pub const HEALTH_COLUMNS: &[&str] = &[
    "IR",
    "PI",
    "DD",
    "TanDelta_20",
    "TanDelta_100",
    "Cap_TipUp",
    "Test_Year",
    "Manufacturing_Year",
];

/// Columns the damage-mapping analysis requires (exact names)
pub const DAMAGE_COLUMNS: &[&str] = &[
    "Department",
    "IR",
    "PI",
    "DD",
    "TD_0.2",
    "TD_1.0",
    "TD_TipUp",
    "Cap_TipUp",
];

// ============================================================================
// ERRORS & SUMMARY TYPES
// ============================================================================

/// Contract violation by the caller; the batch is not processed
#[derive(Debug, Error)]
pub enum InputError {
    #[error("empty upload: table has no data rows")]
    EmptyTable,

    #[error("missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
}

/// One row excluded from the output, with the reason
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowIssue {
    pub row: usize,
    pub reason: String,
}

/// A department-level anomaly (skip or isolated failure)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepartmentNote {
    pub department: String,
    pub detail: String,
}

/// What happened to a batch
#[derive(Debug, Clone, Serialize)]
pub struct BatchSummary {
    pub batch_id: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Data rows in the upload
    pub rows_in: usize,
    /// Rows present in the augmented output
    pub rows_processed: usize,
    /// Rows rejected for violating row-level validity
    pub rejected_rows: Vec<RowIssue>,
    /// Rows tolerated but dropped (incomplete clustering features)
    pub dropped_rows: Vec<RowIssue>,
    /// Original names of columns renamed during deduplication
    pub renamed_columns: Vec<String>,
    /// Result-label distribution (diagnosis / condition / damage)
    pub outcome_counts: BTreeMap<String, usize>,
    pub skipped_departments: Vec<DepartmentNote>,
    pub failed_departments: Vec<DepartmentNote>,
}

impl BatchSummary {
    fn new(rows_in: usize, started_at: DateTime<Utc>) -> Self {
        Self {
            batch_id: Uuid::new_v4().to_string(),
            started_at,
            finished_at: started_at,
            rows_in,
            rows_processed: 0,
            rejected_rows: Vec::new(),
            dropped_rows: Vec::new(),
            renamed_columns: Vec::new(),
            outcome_counts: BTreeMap::new(),
            skipped_departments: Vec::new(),
            failed_departments: Vec::new(),
        }
    }

    fn count(&mut self, label: &str) {
        *self.outcome_counts.entry(label.to_string()).or_insert(0) += 1;
    }
}

/// Augmented table plus the batch summary
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    #[serde(skip)]
    pub table: Table,
    pub summary: BatchSummary,
}

// ============================================================================
// HELPERS
// ============================================================================

/// Pick a result-column name that does not collide with the input
fn result_column_name(existing: &[String], base: &str) -> String {
    if existing.iter().any(|c| c == base) {
        format!("{base}_classified")
    } else {
        base.to_string()
    }
}

/// Normalize and dedup an upload's columns, then check the contract
fn prepare_normalized(
    table: &Table,
    required: &[&str],
) -> Result<(Table, Vec<String>), InputError> {
    let mut prepared = table.clone();
    prepared.normalize_columns();
    let renamed = prepared.dedup_columns();
    if !renamed.is_empty() {
        log::warn!("Duplicate columns found and renamed: {:?}", renamed);
    }
    if prepared.n_rows() == 0 {
        return Err(InputError::EmptyTable);
    }
    let missing = prepared.missing_columns(required);
    if !missing.is_empty() {
        return Err(InputError::MissingColumns(missing));
    }
    Ok((prepared, renamed))
}

/// Required numeric cell, or the rejection reason naming the column
fn required_number(table: &Table, row: usize, col: usize) -> Result<f64, String> {
    table
        .number(row, col)
        .ok_or_else(|| format!("missing or non-numeric {}", table.columns()[col]))
}

fn required_integer(table: &Table, row: usize, col: usize) -> Result<i32, String> {
    table
        .integer(row, col)
        .ok_or_else(|| format!("missing or non-numeric {}", table.columns()[col]))
}

// ============================================================================
// DIAGNOSIS BATCH
// ============================================================================

/// Run the insulation-health decision table over an upload
pub fn diagnose_batch(table: &Table) -> Result<BatchReport, InputError> {
    let started_at = Utc::now();
    let (input, renamed) = prepare_normalized(table, DIAGNOSIS_COLUMNS)?;
    let mut summary = BatchSummary::new(input.n_rows(), started_at);
    summary.renamed_columns = renamed;

    let cols: Vec<usize> = DIAGNOSIS_COLUMNS
        .iter()
        .map(|name| input.column_index(name).expect("contract checked"))
        .collect();

    let mut output = Table::new(input.columns().to_vec());
    let mut results = Vec::new();

    for row in 0..input.n_rows() {
        let values: Result<Vec<f64>, String> = cols
            .iter()
            .map(|&c| required_number(&input, row, c))
            .collect();
        match values {
            Ok(v) => {
                let result = diagnosis::classify(v[0], v[1], v[2], v[3], v[4], v[5]);
                summary.count(result.diagnosis.label());
                output.push_row(input.row(row)).expect("same column count");
                results.push(result);
            }
            Err(reason) => {
                log::debug!("Row {} rejected: {}", row, reason);
                summary.rejected_rows.push(RowIssue { row, reason });
            }
        }
    }
    summary.rows_processed = results.len();

    let input_columns = input.columns().to_vec();
    let column = |base: &str| result_column_name(&input_columns, base);
    output
        .add_column(
            &column("Diagnosis"),
            results.iter().map(|r| r.diagnosis.label().to_string()).collect(),
        )
        .expect("one value per kept row");
    output
        .add_column(&column("Action"), results.iter().map(|r| r.action.clone()).collect())
        .expect("one value per kept row");
    output
        .add_column(
            &column("Location"),
            results.iter().map(|r| r.location.clone()).collect(),
        )
        .expect("one value per kept row");
    output
        .add_column(
            &column("Confidence_pct"),
            results.iter().map(|r| r.confidence.to_string()).collect(),
        )
        .expect("one value per kept row");
    let status_columns: [(&str, fn(&diagnosis::StatusVector) -> diagnosis::Band); 5] = [
        ("IR", |s| s.ir),
        ("PI", |s| s.pi),
        ("DD", |s| s.dd),
        ("TDt", |s| s.td_tipup),
        ("CT", |s| s.cap_tipup),
    ];
    for (base, pick) in status_columns {
        output
            .add_column(
                &column(base),
                results
                    .iter()
                    .map(|r| pick(&r.statuses).as_str().to_string())
                    .collect(),
            )
            .expect("one value per kept row");
    }

    summary.finished_at = Utc::now();
    log::info!(
        "Diagnosis batch {}: {}/{} rows processed, {} rejected",
        summary.batch_id,
        summary.rows_processed,
        summary.rows_in,
        summary.rejected_rows.len()
    );
    Ok(BatchReport { table: output, summary })
}

// ============================================================================
// HEALTH BATCH
// ============================================================================

/// Run the health-index/RUL estimator over an upload
pub fn health_batch(table: &Table, average_life: f64) -> Result<BatchReport, InputError> {
    let started_at = Utc::now();
    let (input, renamed) = prepare_normalized(table, HEALTH_COLUMNS)?;
    let mut summary = BatchSummary::new(input.n_rows(), started_at);
    summary.renamed_columns = renamed;

    let cols: Vec<usize> = HEALTH_COLUMNS
        .iter()
        .map(|name| input.column_index(name).expect("contract checked"))
        .collect();

    let mut output = Table::new(input.columns().to_vec());
    let mut estimates = Vec::new();

    for row in 0..input.n_rows() {
        let parsed = (|| -> Result<(f64, i32, health::HealthEstimate), String> {
            let ir = required_number(&input, row, cols[0])?;
            let pi = required_number(&input, row, cols[1])?;
            let dd = required_number(&input, row, cols[2])?;
            let td20 = required_number(&input, row, cols[3])?;
            let td100 = required_number(&input, row, cols[4])?;
            let cap = required_number(&input, row, cols[5])?;
            let test_year = required_integer(&input, row, cols[6])?;
            let mfg_year = required_integer(&input, row, cols[7])?;
            let estimate = health::estimate_from_years(
                ir,
                pi,
                dd,
                td100 - td20,
                cap,
                test_year,
                mfg_year,
                average_life,
            )
            .map_err(|e| e.to_string())?;
            Ok((td100 - td20, test_year - mfg_year, estimate))
        })();

        match parsed {
            Ok(entry) => {
                summary.count(entry.2.condition.as_str());
                output.push_row(input.row(row)).expect("same column count");
                estimates.push(entry);
            }
            Err(reason) => {
                log::debug!("Row {} rejected: {}", row, reason);
                summary.rejected_rows.push(RowIssue { row, reason });
            }
        }
    }
    summary.rows_processed = estimates.len();

    let input_columns = input.columns().to_vec();
    let column = |base: &str| result_column_name(&input_columns, base);
    let add = |output: &mut Table, name: String, values: Vec<String>| {
        output.add_column(&name, values).expect("one value per kept row");
    };

    add(
        &mut output,
        column("TanDelta_TipUp"),
        estimates.iter().map(|(td, _, _)| td.to_string()).collect(),
    );
    add(
        &mut output,
        column("Age"),
        estimates.iter().map(|(_, age, _)| age.to_string()).collect(),
    );
    add(
        &mut output,
        column("Score_IR"),
        estimates.iter().map(|(_, _, e)| e.scores.ir.to_string()).collect(),
    );
    add(
        &mut output,
        column("Score_PI"),
        estimates.iter().map(|(_, _, e)| e.scores.pi.to_string()).collect(),
    );
    add(
        &mut output,
        column("Score_DD"),
        estimates.iter().map(|(_, _, e)| e.scores.dd.to_string()).collect(),
    );
    add(
        &mut output,
        column("Score_TD_TU"),
        estimates.iter().map(|(_, _, e)| e.scores.td_tipup.to_string()).collect(),
    );
    add(
        &mut output,
        column("Score_Cap_TU"),
        estimates.iter().map(|(_, _, e)| e.scores.cap_tipup.to_string()).collect(),
    );
    add(
        &mut output,
        column("Health_Index"),
        estimates.iter().map(|(_, _, e)| e.health_index.to_string()).collect(),
    );
    add(
        &mut output,
        column("Estimated_RUL"),
        estimates.iter().map(|(_, _, e)| e.estimated_rul.to_string()).collect(),
    );
    add(
        &mut output,
        column("Condition"),
        estimates.iter().map(|(_, _, e)| e.condition.as_str().to_string()).collect(),
    );

    summary.finished_at = Utc::now();
    log::info!(
        "Health batch {}: {}/{} rows processed, {} rejected",
        summary.batch_id,
        summary.rows_processed,
        summary.rows_in,
        summary.rejected_rows.len()
    );
    Ok(BatchReport { table: output, summary })
}

// ============================================================================
// DAMAGE-MAPPING BATCH
// ============================================================================

/// Run the environmental damage clustering over an upload
///
/// Output keeps only clustered rows, grouped by department in first-seen
/// order; skipped and failed departments appear in the summary instead.
pub fn damage_batch(table: &Table, seed: u64) -> Result<BatchReport, InputError> {
    let started_at = Utc::now();
    if table.n_rows() == 0 {
        return Err(InputError::EmptyTable);
    }
    // The damage contract uses exact column names (TD_0.2, TD_1.0), so
    // the upload is taken as-is, without normalization.
    let missing = table.missing_columns(DAMAGE_COLUMNS);
    if !missing.is_empty() {
        return Err(InputError::MissingColumns(missing));
    }
    let mut summary = BatchSummary::new(table.n_rows(), started_at);

    let col = |name: &str| table.column_index(name).expect("contract checked");
    let dept_col = col("Department");
    let ir_col = col("IR");
    let pi_col = col("PI");
    let dd_col = col("DD");
    let td20_col = col("TD_0.2");
    let td100_col = col("TD_1.0");
    let cap_col = col("Cap_TipUp");

    let records: Vec<MotorTestRecord> = (0..table.n_rows())
        .map(|row| MotorTestRecord {
            department: Some(sanitize_department(table.cell(row, dept_col))),
            ir: table.number(row, ir_col),
            pi: table.number(row, pi_col),
            dd: table.number(row, dd_col),
            td20: table.number(row, td20_col),
            td100: table.number(row, td100_col),
            cap_tipup: table.number(row, cap_col),
            ..Default::default()
        })
        .collect();

    for (row, record) in records.iter().enumerate() {
        if record.cluster_features().is_none() {
            summary.dropped_rows.push(RowIssue {
                row,
                reason: "incomplete clustering features".to_string(),
            });
        }
    }

    let outcomes = classify_damage(&records, seed);

    let input_columns = table.columns().to_vec();
    let cluster_col = result_column_name(&input_columns, "Cluster");
    let damage_col = result_column_name(&input_columns, "Predicted_Damage");
    let confidence_col = result_column_name(&input_columns, "Confidence");
    let mut columns = input_columns;
    columns.extend([cluster_col, damage_col, confidence_col]);
    let mut output = Table::new(columns);

    for outcome in &outcomes {
        match outcome {
            DepartmentOutcome::Clustered(clusters) => {
                for assignment in &clusters.assignments {
                    let mut row = table.row(assignment.row);
                    // The output carries the sanitized department name
                    row[dept_col] = clusters.department.clone();
                    row.push(assignment.cluster.to_string());
                    row.push(assignment.label.to_string());
                    row.push(assignment.confidence.to_string());
                    output.push_row(row).expect("input plus three results");
                    summary.count(assignment.label.as_str());
                    summary.rows_processed += 1;
                }
            }
            DepartmentOutcome::Skipped {
                department,
                usable_rows,
            } => summary.skipped_departments.push(DepartmentNote {
                department: department.clone(),
                detail: format!("{usable_rows} usable rows, need 3"),
            }),
            DepartmentOutcome::Failed { department, reason } => {
                summary.failed_departments.push(DepartmentNote {
                    department: department.clone(),
                    detail: reason.clone(),
                })
            }
        }
    }

    summary.finished_at = Utc::now();
    log::info!(
        "Damage batch {}: {}/{} rows clustered, {} departments skipped, {} failed",
        summary.batch_id,
        summary.rows_processed,
        summary.rows_in,
        summary.skipped_departments.len(),
        summary.failed_departments.len()
    );
    Ok(BatchReport { table: output, summary })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn diagnosis_csv() -> Table {
        Table::from_csv_str(
            "IR,PI,DD,TanDelta_20,TanDelta_100,Cap_TipUp\n\
             1.0,2.0,1.0,0.004,0.004,0.005\n\
             0.03,0.8,12,0.004,0.004,0.002\n",
        )
        .unwrap()
    }

    #[test]
    fn test_diagnose_batch_examples() {
        let report = diagnose_batch(&diagnosis_csv()).unwrap();
        let t = &report.table;
        assert_eq!(report.summary.rows_processed, 2);

        let diag = t.column_index("Diagnosis").unwrap();
        assert_eq!(t.cell(0, diag), "Healthy insulation");
        assert_eq!(t.cell(1, diag), "Surface moisture and trapped aging");

        let conf = t.column_index("Confidence_pct").unwrap();
        assert_eq!(t.cell(0, conf), "100");

        // Status columns collide with inputs and get suffixed
        assert!(t.column_index("IR_classified").is_some());
        assert!(t.column_index("TDt").is_some());
        assert_eq!(report.summary.outcome_counts["Healthy insulation"], 1);
    }

    #[test]
    fn test_diagnose_batch_missing_column() {
        let t = Table::from_csv_str("IR,PI\n1,2\n").unwrap();
        let err = diagnose_batch(&t).unwrap_err();
        assert!(matches!(err, InputError::MissingColumns(_)));
    }

    #[test]
    fn test_diagnose_batch_empty() {
        let t = Table::from_csv_str("IR,PI,DD,TanDelta_20,TanDelta_100,Cap_TipUp\n").unwrap();
        assert!(matches!(diagnose_batch(&t), Err(InputError::EmptyTable)));
    }

    #[test]
    fn test_diagnose_batch_rejects_bad_rows() {
        let t = Table::from_csv_str(
            "IR,PI,DD,TanDelta_20,TanDelta_100,Cap_TipUp\n\
             1.0,2.0,1.0,0.004,0.004,0.005\n\
             ,2.0,1.0,0.004,0.004,0.005\n",
        )
        .unwrap();
        let report = diagnose_batch(&t).unwrap();
        assert_eq!(report.summary.rows_processed, 1);
        assert_eq!(report.summary.rejected_rows.len(), 1);
        assert_eq!(report.summary.rejected_rows[0].row, 1);
        assert!(report.summary.rejected_rows[0].reason.contains("IR"));
        assert_eq!(report.table.n_rows(), 1);
    }

    #[test]
    fn test_diagnose_batch_normalizes_and_dedups() {
        let t = Table::from_csv_str(
            " IR ,IR,PI,DD,TanDelta 20,TanDelta_100,Cap_TipUp\n\
             1.0,9.9,2.0,1.0,0.004,0.004,0.005\n",
        )
        .unwrap();
        let report = diagnose_batch(&t).unwrap();
        assert_eq!(report.summary.renamed_columns, vec!["IR".to_string()]);
        assert_eq!(report.summary.rows_processed, 1);
        // First IR column wins; the duplicate became IR.1
        let diag = report.table.column_index("Diagnosis").unwrap();
        assert_eq!(report.table.cell(0, diag), "Healthy insulation");
    }

    #[test]
    fn test_health_batch_example() {
        let t = Table::from_csv_str(
            "IR,PI,DD,TanDelta_20,TanDelta_100,Cap_TipUp,Test_Year,Manufacturing_Year\n\
             1.0,2.0,1.0,0.0,0.5,2,2020,2010\n",
        )
        .unwrap();
        let report = health_batch(&t, 30.0).unwrap();
        let out = &report.table;
        assert_eq!(out.cell(0, out.column_index("Health_Index").unwrap()), "10");
        assert_eq!(out.cell(0, out.column_index("Estimated_RUL").unwrap()), "20");
        assert_eq!(out.cell(0, out.column_index("Condition").unwrap()), "Excellent");
        assert_eq!(out.cell(0, out.column_index("Age").unwrap()), "10");
        assert_eq!(report.summary.outcome_counts["Excellent"], 1);
    }

    #[test]
    fn test_health_batch_rejects_inverted_years() {
        let t = Table::from_csv_str(
            "IR,PI,DD,TanDelta_20,TanDelta_100,Cap_TipUp,Test_Year,Manufacturing_Year\n\
             1.0,2.0,1.0,0.0,0.5,2,2009,2010\n\
             1.0,2.0,1.0,0.0,0.5,2,2020,2010\n",
        )
        .unwrap();
        let report = health_batch(&t, 30.0).unwrap();
        assert_eq!(report.summary.rows_processed, 1);
        assert_eq!(report.summary.rejected_rows.len(), 1);
        assert!(report.summary.rejected_rows[0]
            .reason
            .contains("precedes manufacturing year"));
    }

    #[test]
    fn test_health_batch_negative_rul_kept() {
        let t = Table::from_csv_str(
            "IR,PI,DD,TanDelta_20,TanDelta_100,Cap_TipUp,Test_Year,Manufacturing_Year\n\
             1.0,2.0,1.0,0.0,0.5,2,2040,2000\n",
        )
        .unwrap();
        let report = health_batch(&t, 30.0).unwrap();
        let out = &report.table;
        // HI 10, age 40, life 30 -> RUL -10, valid and reported as-is
        assert_eq!(out.cell(0, out.column_index("Estimated_RUL").unwrap()), "-10");
    }

    fn damage_csv() -> Table {
        let mut text = String::from(
            "Department,IR,PI,DD,TD_0.2,TD_1.0,TD_TipUp,Cap_TipUp\n",
        );
        // Mill #1: six rows, two distinct populations
        for i in 0..3 {
            let j = i as f64 * 0.01;
            text.push_str(&format!("Mill #1,{},0.9,0.1,0.0,{},0,0.1\n", 0.9 + j, 0.1 + j));
            text.push_str(&format!("Mill #1,{},0.2,0.9,0.0,0.8,0,0.9\n", 0.2 + j));
        }
        // Annex: only two rows -> skipped
        text.push_str("Annex,1.0,2.0,1.0,0.0,0.1,0,0.1\n");
        text.push_str("Annex,0.9,1.9,1.1,0.0,0.2,0,0.1\n");
        Table::from_csv_str(&text).unwrap()
    }

    #[test]
    fn test_damage_batch_clusters_and_skips() {
        let report = damage_batch(&damage_csv(), 42).unwrap();
        let out = &report.table;

        // Only Mill #1's six rows survive, with sanitized department names
        assert_eq!(report.summary.rows_processed, 6);
        assert_eq!(out.n_rows(), 6);
        let dept = out.column_index("Department").unwrap();
        assert_eq!(out.cell(0, dept), "Mill1");

        assert_eq!(report.summary.skipped_departments.len(), 1);
        assert_eq!(report.summary.skipped_departments[0].department, "Annex");

        assert!(out.column_index("Cluster").is_some());
        assert!(out.column_index("Predicted_Damage").is_some());
        let total: usize = report.summary.outcome_counts.values().sum();
        assert_eq!(total, 6);
    }

    #[test]
    fn test_damage_batch_drops_incomplete_rows() {
        let mut t = damage_csv();
        t.push_row(
            "Mill #1,,0.9,0.1,0.0,0.1,0,0.1"
                .split(',')
                .map(str::to_string)
                .collect(),
        )
        .unwrap();
        let report = damage_batch(&t, 42).unwrap();
        assert_eq!(report.summary.dropped_rows.len(), 1);
        assert_eq!(report.summary.rows_processed, 6);
    }

    #[test]
    fn test_damage_batch_missing_column() {
        let t = Table::from_csv_str("Department,IR\nA,1\n").unwrap();
        let err = damage_batch(&t, 42).unwrap_err();
        let InputError::MissingColumns(missing) = err else {
            panic!("expected missing columns");
        };
        assert!(missing.contains(&"TD_0.2".to_string()));
    }

    #[test]
    fn test_damage_batch_deterministic() {
        let t = damage_csv();
        let a = damage_batch(&t, 42).unwrap();
        let b = damage_batch(&t, 42).unwrap();
        assert_eq!(a.table, b.table);
    }
}
