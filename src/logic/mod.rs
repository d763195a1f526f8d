//! Logic Module - Diagnostic Engines
//!
//! Three independent analyses over normalized motor test records, plus
//! the table layer and batch transforms that feed them.
//!
//! ## Structure
//! - `table` - delimited-text table with column normalization
//! - `features` - measurement records and the clustering feature layout
//! - `diagnosis` - ordered decision table over banded indicators
//! - `health` - health index and remaining-useful-life estimation
//! - `clustering` - per-department environmental damage mapping
//! - `batch` - table-level transforms and summaries

pub mod batch;
pub mod clustering;
pub mod diagnosis;
pub mod features;
pub mod health;
pub mod table;
