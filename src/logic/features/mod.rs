//! Features Module - Normalized Measurement Records
//!
//! Turns validated upload rows into `MotorTestRecord`s, computes derived
//! features, and owns the fixed clustering feature layout.
//!
//! ## Structure
//! - `layout`: versioned feature layout for the clustering engine
//! - `record`: the per-motor measurement snapshot and derived features

// Allow unused - some exports for embedding callers
#![allow(unused)]

pub mod layout;
pub mod record;

pub use layout::{FEATURE_COUNT, FEATURE_LAYOUT, FEATURE_VERSION};
pub use record::{sanitize_department, InvalidAgeError, MotorTestRecord};
