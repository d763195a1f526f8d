//! Health Module - Index & Remaining Useful Life
//!
//! Scoring model independent of the diagnosis decision table: coarse
//! four-level component grades, a tip-up-weighted composite health index,
//! and an RUL projection that may legitimately go negative.
//!
//! ## Structure
//! - `scoring`: per-measurement step functions
//! - `estimator`: composite index, RUL, condition label

pub mod estimator;
pub mod scoring;

pub use estimator::{
    estimate, estimate_from_years, ComponentScores, Condition, HealthEstimate,
};
pub use scoring::{score_cap_tipup, score_dd, score_ir, score_pi, score_td_tipup};
