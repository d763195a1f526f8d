//! Diagnosis Types
//!
//! Data structures for the insulation-health decision table.
//! No logic here - banding and rule evaluation live in `classifier`.

use serde::{Deserialize, Serialize};

// ============================================================================
// INDICATOR BANDS
// ============================================================================

/// Three-level ordinal band for a scored indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Band {
    Poor,
    Moderate,
    Good,
}

impl Band {
    pub fn as_str(&self) -> &'static str {
        match self {
            Band::Poor => "Poor",
            Band::Moderate => "Moderate",
            Band::Good => "Good",
        }
    }

    /// Numeric level used by the confidence weighting
    pub fn level(&self) -> u32 {
        match self {
            Band::Poor => 0,
            Band::Moderate => 1,
            Band::Good => 2,
        }
    }
}

impl std::fmt::Display for Band {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Binary level for the single-voltage tan-delta readings
///
/// TD20/TD100 feed the diagnosis rules but are not part of the
/// five-dimension status vector the confidence score is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LossLevel {
    Low,
    High,
}

impl LossLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LossLevel::Low => "Low",
            LossLevel::High => "High",
        }
    }
}

impl std::fmt::Display for LossLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The five-dimension status vector {IR, PI, DD, TDt, CT}
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusVector {
    pub ir: Band,
    pub pi: Band,
    pub dd: Band,
    pub td_tipup: Band,
    pub cap_tipup: Band,
}

impl StatusVector {
    pub fn all_good(&self) -> bool {
        self.ir == Band::Good
            && self.pi == Band::Good
            && self.dd == Band::Good
            && self.td_tipup == Band::Good
            && self.cap_tipup == Band::Good
    }
}

/// Full banding of one record: the scored vector plus the binary
/// tan-delta levels the rules also look at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicatorBands {
    pub status: StatusVector,
    pub td20: LossLevel,
    pub td100: LossLevel,
}

// ============================================================================
// DIAGNOSIS
// ============================================================================

/// Closed set of insulation diagnoses
///
/// Variants are declared in rule-priority order; `Unclassified` is the
/// fallback when no rule matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Diagnosis {
    Healthy,
    SurfaceMoistureAging,
    VoidsAndStressZones,
    EarlyPartialDischarge,
    UniformDielectricLoss,
    VoltageSensitiveAging,
    GeometryDeformation,
    EmbeddedMoisture,
    SurfaceLeakage,
    AgingTrend,
    MinorDielectricStress,
    EarlyVoltageTracking,
    CapacitanceShift,
    DevelopingDelamination,
    InsulationWear,
    Unclassified,
}

impl Diagnosis {
    /// Human-readable diagnosis label
    pub fn label(&self) -> &'static str {
        match self {
            Diagnosis::Healthy => "Healthy insulation",
            Diagnosis::SurfaceMoistureAging => "Surface moisture and trapped aging",
            Diagnosis::VoidsAndStressZones => "Voids + stress zones emerging",
            Diagnosis::EarlyPartialDischarge => "Early partial discharge risk",
            Diagnosis::UniformDielectricLoss => "Uniform dielectric loss (contamination)",
            Diagnosis::VoltageSensitiveAging => "Voltage-sensitive dielectric aging",
            Diagnosis::GeometryDeformation => "Delamination or geometry deformation",
            Diagnosis::EmbeddedMoisture => "Embedded moisture",
            Diagnosis::SurfaceLeakage => "Surface leakage",
            Diagnosis::AgingTrend => "Aging trend beginning",
            Diagnosis::MinorDielectricStress => "Minor dielectric stress",
            Diagnosis::EarlyVoltageTracking => "Early voltage tracking",
            Diagnosis::CapacitanceShift => "Capacitance shift with aging",
            Diagnosis::DevelopingDelamination => "Developing delamination under stress",
            Diagnosis::InsulationWear => "Insulation wear with increased loss",
            Diagnosis::Unclassified => "Unclassified",
        }
    }

    /// Recommended maintenance action
    pub fn action(&self) -> &'static str {
        match self {
            Diagnosis::Healthy => "No action",
            Diagnosis::SurfaceMoistureAging => "Clean & dry, retest",
            Diagnosis::VoidsAndStressZones => "Schedule partial reinsulation",
            Diagnosis::EarlyPartialDischarge => "Monitor monthly",
            Diagnosis::UniformDielectricLoss => "Clean & dry",
            Diagnosis::VoltageSensitiveAging => "Monitor trending",
            Diagnosis::GeometryDeformation => "Inspect physical winding structure",
            Diagnosis::EmbeddedMoisture => "Dry motor internally and retest",
            Diagnosis::SurfaceLeakage => "Drying & visual inspection",
            Diagnosis::AgingTrend => "Retest in 3 months",
            Diagnosis::MinorDielectricStress => "Trend analysis & monitoring",
            Diagnosis::EarlyVoltageTracking => "Flag for monitoring",
            Diagnosis::CapacitanceShift => "Plan full inspection",
            Diagnosis::DevelopingDelamination => "Offline LEAP+ recommended",
            Diagnosis::InsulationWear => "Drying + trending",
            Diagnosis::Unclassified => "Full diagnostics required",
        }
    }

    /// Probable fault location
    pub fn location(&self) -> &'static str {
        match self {
            Diagnosis::Healthy => "-",
            Diagnosis::SurfaceMoistureAging => "Stator surface / terminal box",
            Diagnosis::VoidsAndStressZones => "Interlayer insulation",
            Diagnosis::EarlyPartialDischarge => "End winding, stress zones",
            Diagnosis::UniformDielectricLoss => "Surface insulation",
            Diagnosis::VoltageSensitiveAging => "Bulk insulation",
            Diagnosis::GeometryDeformation => "Slot insulation",
            Diagnosis::EmbeddedMoisture => "Bulk winding insulation",
            Diagnosis::SurfaceLeakage => "Motor body / cable box",
            Diagnosis::AgingTrend => "General insulation",
            Diagnosis::MinorDielectricStress => "End winding",
            Diagnosis::EarlyVoltageTracking => "Corona-prone zones",
            Diagnosis::CapacitanceShift => "Winding insulation",
            Diagnosis::DevelopingDelamination => "Slot region / taping",
            Diagnosis::InsulationWear => "Mid-slot insulation",
            Diagnosis::Unclassified => "To be inspected",
        }
    }
}

impl std::fmt::Display for Diagnosis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

// ============================================================================
// RESULT
// ============================================================================

/// Result of insulation-health classification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosisResult {
    pub diagnosis: Diagnosis,
    pub action: String,
    pub location: String,
    /// Severity-weighted confidence, 0-100
    pub confidence: u8,
    pub statuses: StatusVector,
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_level_ordering() {
        assert_eq!(Band::Poor.level(), 0);
        assert_eq!(Band::Moderate.level(), 1);
        assert_eq!(Band::Good.level(), 2);
        assert!(Band::Poor < Band::Moderate);
        assert!(Band::Moderate < Band::Good);
    }

    #[test]
    fn test_diagnosis_triple() {
        assert_eq!(Diagnosis::Healthy.label(), "Healthy insulation");
        assert_eq!(Diagnosis::Healthy.action(), "No action");
        assert_eq!(Diagnosis::Healthy.location(), "-");
        assert_eq!(Diagnosis::Unclassified.action(), "Full diagnostics required");
    }

    #[test]
    fn test_all_good() {
        let all_good = StatusVector {
            ir: Band::Good,
            pi: Band::Good,
            dd: Band::Good,
            td_tipup: Band::Good,
            cap_tipup: Band::Good,
        };
        assert!(all_good.all_good());
        let one_off = StatusVector {
            dd: Band::Moderate,
            ..all_good
        };
        assert!(!one_off.all_good());
    }
}
