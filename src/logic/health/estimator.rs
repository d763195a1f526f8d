//! Health Index & RUL Estimator
//!
//! Independent scoring model over the same raw measurements: component
//! step scores, a tip-up-weighted composite health index, and a
//! remaining-useful-life projection against the motor's age.

use serde::{Deserialize, Serialize};

use super::scoring::{score_cap_tipup, score_dd, score_ir, score_pi, score_td_tipup};
use crate::logic::features::InvalidAgeError;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Tip-up scores count double in the composite index
pub const TIPUP_SCORE_WEIGHT: f64 = 2.0;

/// Total weight behind the composite: 1 + 1 + 1 + 2 + 2
pub const TOTAL_SCORE_WEIGHT: f64 = 7.0;

/// Health index at or above this is Excellent
pub const HI_EXCELLENT_MIN: f64 = 8.0;
/// Health index at or above this is Good
pub const HI_GOOD_MIN: f64 = 6.0;
/// Health index at or above this is Moderate, below is Critical
pub const HI_MODERATE_MIN: f64 = 4.0;

// ============================================================================
// TYPES
// ============================================================================

/// The five component step scores, each in {2, 6, 8, 10}
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentScores {
    pub ir: u8,
    pub pi: u8,
    pub dd: u8,
    pub td_tipup: u8,
    pub cap_tipup: u8,
}

/// Condition label derived from the health index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Condition {
    Excellent,
    Good,
    Moderate,
    Critical,
}

impl Condition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Condition::Excellent => "Excellent",
            Condition::Good => "Good",
            Condition::Moderate => "Moderate",
            Condition::Critical => "Critical",
        }
    }

    /// Threshold the health index into a condition label
    pub fn from_health_index(hi: f64) -> Self {
        if hi >= HI_EXCELLENT_MIN {
            Condition::Excellent
        } else if hi >= HI_GOOD_MIN {
            Condition::Good
        } else if hi >= HI_MODERATE_MIN {
            Condition::Moderate
        } else {
            Condition::Critical
        }
    }
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of health/RUL estimation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthEstimate {
    pub scores: ComponentScores,
    /// Composite health index, 0-10
    pub health_index: f64,
    /// Projected remaining useful life in years
    ///
    /// Negative values are valid: the motor has outlived its nominal
    /// life expectancy scaled by health.
    pub estimated_rul: f64,
    pub condition: Condition,
}

// ============================================================================
// ESTIMATION
// ============================================================================

/// Estimate health index and remaining useful life
///
/// Pure and total over real measurements; year validation happens in
/// [`estimate_from_years`].
pub fn estimate(
    ir: f64,
    pi: f64,
    dd: f64,
    td_tipup: f64,
    cap_tipup: f64,
    age: f64,
    average_life: f64,
) -> HealthEstimate {
    let scores = ComponentScores {
        ir: score_ir(ir),
        pi: score_pi(pi),
        dd: score_dd(dd),
        td_tipup: score_td_tipup(td_tipup),
        cap_tipup: score_cap_tipup(cap_tipup),
    };

    let health_index = (f64::from(scores.ir)
        + f64::from(scores.pi)
        + f64::from(scores.dd)
        + TIPUP_SCORE_WEIGHT * f64::from(scores.td_tipup)
        + TIPUP_SCORE_WEIGHT * f64::from(scores.cap_tipup))
        / TOTAL_SCORE_WEIGHT;

    let estimated_rul = (health_index / 10.0) * (average_life - age);

    HealthEstimate {
        scores,
        health_index,
        estimated_rul,
        condition: Condition::from_health_index(health_index),
    }
}

/// Estimate from test/manufacturing years, rejecting inverted years
pub fn estimate_from_years(
    ir: f64,
    pi: f64,
    dd: f64,
    td_tipup: f64,
    cap_tipup: f64,
    test_year: i32,
    manufacturing_year: i32,
    average_life: f64,
) -> Result<HealthEstimate, InvalidAgeError> {
    if test_year < manufacturing_year {
        return Err(InvalidAgeError {
            test_year,
            manufacturing_year,
        });
    }
    let age = f64::from(test_year - manufacturing_year);
    Ok(estimate(ir, pi, dd, td_tipup, cap_tipup, age, average_life))
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perfect_motor() {
        let est = estimate(1.0, 2.0, 1.0, 0.5, 2.0, 10.0, 30.0);
        assert_eq!(
            est.scores,
            ComponentScores {
                ir: 10,
                pi: 10,
                dd: 10,
                td_tipup: 10,
                cap_tipup: 10
            }
        );
        assert!((est.health_index - 10.0).abs() < 1e-12);
        assert!((est.estimated_rul - 20.0).abs() < 1e-12);
        assert_eq!(est.condition, Condition::Excellent);
    }

    #[test]
    fn test_worst_motor() {
        let est = estimate(0.01, 0.5, 20.0, 3.0, 20.0, 40.0, 30.0);
        assert!((est.health_index - 2.0).abs() < 1e-12);
        assert_eq!(est.condition, Condition::Critical);
        // Past nominal life: RUL goes negative, by design
        assert!((est.estimated_rul - (0.2 * -10.0)).abs() < 1e-12);
    }

    #[test]
    fn test_rul_linear_in_remaining_years() {
        let a = estimate(1.0, 2.0, 1.0, 0.5, 2.0, 10.0, 30.0);
        let b = estimate(1.0, 2.0, 1.0, 0.5, 2.0, 10.0, 40.0);
        let c = estimate(1.0, 2.0, 1.0, 0.5, 2.0, 20.0, 40.0);
        // Same HI, so RUL scales with (average_life - age)
        assert!((b.estimated_rul - a.estimated_rul - 10.0).abs() < 1e-12);
        assert!((b.estimated_rul - c.estimated_rul - 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_tipup_weight_symmetry() {
        // Swap which tip-up score is degraded; the composite is unchanged
        // because both carry the same double weight.
        let td_degraded = estimate(1.0, 2.0, 1.0, 1.5, 2.0, 0.0, 30.0);
        let cap_degraded = estimate(1.0, 2.0, 1.0, 0.5, 12.0, 0.0, 30.0);
        assert_eq!(td_degraded.scores.td_tipup, 6);
        assert_eq!(cap_degraded.scores.cap_tipup, 6);
        assert!((td_degraded.health_index - cap_degraded.health_index).abs() < 1e-12);
    }

    #[test]
    fn test_condition_thresholds() {
        assert_eq!(Condition::from_health_index(8.0), Condition::Excellent);
        assert_eq!(Condition::from_health_index(7.99), Condition::Good);
        assert_eq!(Condition::from_health_index(6.0), Condition::Good);
        assert_eq!(Condition::from_health_index(4.0), Condition::Moderate);
        assert_eq!(Condition::from_health_index(3.99), Condition::Critical);
    }

    #[test]
    fn test_estimate_from_years_valid() {
        let est = estimate_from_years(1.0, 2.0, 1.0, 0.5, 2.0, 2020, 2010, 30.0).unwrap();
        assert!((est.estimated_rul - 20.0).abs() < 1e-12);
    }

    #[test]
    fn test_estimate_from_years_inverted() {
        let err = estimate_from_years(1.0, 2.0, 1.0, 0.5, 2.0, 2009, 2010, 30.0).unwrap_err();
        assert_eq!(err.test_year, 2009);
        assert_eq!(err.manufacturing_year, 2010);
    }

    #[test]
    fn test_health_index_mixed_scores() {
        // scores: ir 8, pi 6, dd 8, td 6, cap 10 -> (8+6+8+12+20)/7
        let est = estimate(0.5, 1.2, 3.0, 1.5, 2.0, 5.0, 30.0);
        assert!((est.health_index - 54.0 / 7.0).abs() < 1e-12);
        assert_eq!(est.condition, Condition::Good);
    }
}
