//! Insulation Health Classifier
//!
//! Pure, total decision-table classifier: bands the six raw measurements,
//! walks an ordered rule list (first match wins), and attaches a
//! severity-weighted confidence score. Defined for all real inputs; the
//! bands saturate at the extremes, so this never fails.

use super::rules::*;
use super::types::{Band, Diagnosis, DiagnosisResult, IndicatorBands, LossLevel, StatusVector};

// ============================================================================
// BANDING
// ============================================================================

fn band_ir(ir: f64) -> Band {
    if ir >= IR_GOOD_MIN {
        Band::Good
    } else if ir >= IR_MODERATE_MIN {
        Band::Moderate
    } else {
        Band::Poor
    }
}

fn band_pi(pi: f64) -> Band {
    if pi >= PI_GOOD_MIN {
        Band::Good
    } else if pi >= PI_MODERATE_MIN {
        Band::Moderate
    } else {
        Band::Poor
    }
}

fn band_dd(dd: f64) -> Band {
    if dd < DD_GOOD_MAX {
        Band::Good
    } else if dd < DD_MODERATE_MAX {
        Band::Moderate
    } else {
        Band::Poor
    }
}

// Tip-up banding uses the magnitude: a negative tip-up is as suspicious
// as a positive one of the same size.
fn band_td_tipup(td_tipup: f64) -> Band {
    let magnitude = td_tipup.abs();
    if magnitude < TD_TIPUP_GOOD_MAX {
        Band::Good
    } else if magnitude < TD_TIPUP_MODERATE_MAX {
        Band::Moderate
    } else {
        Band::Poor
    }
}

fn band_cap_tipup(cap_tipup: f64) -> Band {
    if cap_tipup < CAP_TIPUP_GOOD_MAX {
        Band::Good
    } else if cap_tipup < CAP_TIPUP_MODERATE_MAX {
        Band::Moderate
    } else {
        Band::Poor
    }
}

fn loss_level(td: f64, high_min: f64) -> LossLevel {
    if td < high_min {
        LossLevel::Low
    } else {
        LossLevel::High
    }
}

/// Band all six measurements of one record
pub fn band_indicators(
    ir: f64,
    pi: f64,
    dd: f64,
    td20: f64,
    td100: f64,
    cap_tipup: f64,
) -> IndicatorBands {
    IndicatorBands {
        status: StatusVector {
            ir: band_ir(ir),
            pi: band_pi(pi),
            dd: band_dd(dd),
            td_tipup: band_td_tipup(td100 - td20),
            cap_tipup: band_cap_tipup(cap_tipup),
        },
        td20: loss_level(td20, TD20_HIGH_MIN),
        td100: loss_level(td100, TD100_HIGH_MIN),
    }
}

// ============================================================================
// DIAGNOSIS SELECTION
// ============================================================================

/// Walk the decision table top to bottom; the first matching rule wins.
///
/// Several predicates overlap (e.g. TDt=Poor appears in four of them), so
/// declaration order is the tie-break. Do not reorder.
pub fn select_diagnosis(bands: &IndicatorBands) -> Diagnosis {
    let s = &bands.status;
    let (td20, td100) = (bands.td20, bands.td100);

    if s.all_good() {
        Diagnosis::Healthy
    } else if s.ir == Band::Poor && s.pi == Band::Poor && s.dd == Band::Poor {
        Diagnosis::SurfaceMoistureAging
    } else if s.td_tipup == Band::Poor && s.cap_tipup == Band::Poor {
        Diagnosis::VoidsAndStressZones
    } else if s.td_tipup == Band::Poor && s.cap_tipup == Band::Moderate {
        Diagnosis::EarlyPartialDischarge
    } else if td20 == LossLevel::High && td100 == LossLevel::High && s.cap_tipup == Band::Good {
        Diagnosis::UniformDielectricLoss
    } else if s.td_tipup == Band::Poor && s.cap_tipup == Band::Good {
        Diagnosis::VoltageSensitiveAging
    } else if s.cap_tipup == Band::Poor && s.td_tipup == Band::Good {
        Diagnosis::GeometryDeformation
    } else if s.dd == Band::Poor && s.td_tipup != Band::Poor {
        Diagnosis::EmbeddedMoisture
    } else if s.ir == Band::Poor && s.dd == Band::Good {
        Diagnosis::SurfaceLeakage
    } else if s.ir == Band::Moderate && s.pi == Band::Moderate && s.dd == Band::Moderate {
        Diagnosis::AgingTrend
    } else if s.pi == Band::Moderate && td100 == LossLevel::High {
        Diagnosis::MinorDielectricStress
    } else if s.td_tipup == Band::Moderate && s.cap_tipup == Band::Good {
        Diagnosis::EarlyVoltageTracking
    } else if td20 == LossLevel::High && s.cap_tipup == Band::Poor {
        Diagnosis::CapacitanceShift
    } else if s.ir == Band::Moderate && s.td_tipup == Band::Poor && s.cap_tipup == Band::Poor {
        Diagnosis::DevelopingDelamination
    } else if s.pi == Band::Poor && td100 == LossLevel::High {
        Diagnosis::InsulationWear
    } else {
        Diagnosis::Unclassified
    }
}

// ============================================================================
// CONFIDENCE
// ============================================================================

/// Severity-weighted confidence over the five-dimension status vector
///
/// Each indicator contributes weight x band level; the result is the
/// weighted score as a rounded percentage of the all-Good maximum.
pub fn confidence(status: &StatusVector) -> u8 {
    let score = WEIGHT_IR * status.ir.level()
        + WEIGHT_PI * status.pi.level()
        + WEIGHT_DD * status.dd.level()
        + WEIGHT_TD_TIPUP * status.td_tipup.level()
        + WEIGHT_CAP_TIPUP * status.cap_tipup.level();
    (100.0 * score as f64 / MAX_WEIGHTED_SCORE as f64).round() as u8
}

// ============================================================================
// MAIN CLASSIFICATION FUNCTION
// ============================================================================

/// Classify one motor's insulation health
pub fn classify(
    ir: f64,
    pi: f64,
    dd: f64,
    td20: f64,
    td100: f64,
    cap_tipup: f64,
) -> DiagnosisResult {
    let bands = band_indicators(ir, pi, dd, td20, td100, cap_tipup);
    let diagnosis = select_diagnosis(&bands);

    DiagnosisResult {
        diagnosis,
        action: diagnosis.action().to_string(),
        location: diagnosis.location().to_string(),
        confidence: confidence(&bands.status),
        statuses: bands.status,
    }
}

// ============================================================================
// TESTS
// ============================================================================
