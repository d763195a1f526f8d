//! Diagnosis Module - Insulation Health Decision Table
//!
//! Bands six raw measurements into severity levels and maps them through
//! an ordered, closed rule table to a (diagnosis, action, location)
//! triple with a weighted confidence score.
//!
//! ## Structure
//! - `types`: bands, status vector, diagnosis enumeration, result
//! - `rules`: banding thresholds and confidence weights
//! - `classifier`: banding + ordered rule evaluation
//!
//! ## Usage
//! ```ignore
//! use crate::logic::diagnosis::{classify, Diagnosis};
//!
//! let result = classify(1.0, 2.0, 1.0, 0.004, 0.004, 0.005);
//! assert_eq!(result.diagnosis, Diagnosis::Healthy);
//! ```

pub mod classifier;
pub mod rules;
pub mod types;

pub use classifier::{band_indicators, classify, confidence, select_diagnosis};
pub use types::{Band, Diagnosis, DiagnosisResult, IndicatorBands, LossLevel, StatusVector};
