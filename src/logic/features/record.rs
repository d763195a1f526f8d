//! Motor Test Record
//!
//! One motor's measurement snapshot, as parsed from an upload row.
//! Derived features (tan-delta tip-up, age) are always computed here;
//! an uploaded tip-up or age column is never trusted.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::layout::FEATURE_COUNT;

static DEPARTMENT_SANITIZER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-zA-Z0-9]").expect("static regex"));

/// Test year precedes manufacturing year; the row is invalid, not clamped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("test year {test_year} precedes manufacturing year {manufacturing_year}")]
pub struct InvalidAgeError {
    pub test_year: i32,
    pub manufacturing_year: i32,
}

/// One motor's measurement snapshot
///
/// All measurements are optional: a `None` means the upload cell was
/// missing or not numeric. Which fields must be present is decided by
/// the analysis consuming the record, not here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MotorTestRecord {
    /// Owning department, sanitized to alphanumeric
    pub department: Option<String>,
    pub test_year: Option<i32>,
    pub manufacturing_year: Option<i32>,

    /// Insulation resistance (GΩ)
    pub ir: Option<f64>,
    /// Polarization index
    pub pi: Option<f64>,
    /// Dielectric discharge
    pub dd: Option<f64>,
    /// Tan-delta at 20% rated voltage
    pub td20: Option<f64>,
    /// Tan-delta at 100% rated voltage
    pub td100: Option<f64>,
    /// Capacitance tip-up
    pub cap_tipup: Option<f64>,
}

impl MotorTestRecord {
    /// Tan-delta tip-up, recomputed from the two tan-delta readings
    pub fn td_tipup(&self) -> Option<f64> {
        match (self.td100, self.td20) {
            (Some(hi), Some(lo)) => Some(hi - lo),
            _ => None,
        }
    }

    /// Motor age in years at test time
    ///
    /// `Ok(None)` when either year is missing; `Err` when the years are
    /// inverted (age must never be negative).
    pub fn age(&self) -> Result<Option<i32>, InvalidAgeError> {
        match (self.test_year, self.manufacturing_year) {
            (Some(test), Some(mfg)) => {
                if test < mfg {
                    Err(InvalidAgeError {
                        test_year: test,
                        manufacturing_year: mfg,
                    })
                } else {
                    Ok(Some(test - mfg))
                }
            }
            _ => Ok(None),
        }
    }

    /// Clustering feature vector in layout order, or `None` if any
    /// feature is missing
    pub fn cluster_features(&self) -> Option<[f64; FEATURE_COUNT]> {
        Some([
            self.ir?,
            self.pi?,
            self.dd?,
            self.td_tipup()?,
            self.cap_tipup?,
        ])
    }
}

/// Strip everything but letters and digits from a department name
pub fn sanitize_department(raw: &str) -> String {
    DEPARTMENT_SANITIZER.replace_all(raw, "").into_owned()
}

// ============================================================================
// TESTS
// ============================================================================
