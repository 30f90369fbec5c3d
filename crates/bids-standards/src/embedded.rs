//! Embedded schema data.
//!
//! The BIDS fNIRS field tables are compiled into the binary with
//! `include_str!()`, so loading never touches the filesystem.
//!
//! # Structure
//!
//! - `Fields.csv`: one row per field: file kind, name, type, requirement
//!   level and column description. Row order is field order.
//! - `MeasurementTypes.csv`: SNIRF data type (or data type label) to BIDS
//!   channel type.

// =============================================================================
// BIDS fNIRS
// =============================================================================

/// BIDS fNIRS Fields.csv
pub const FNIRS_FIELDS: &str = include_str!("../data/bids/fnirs/Fields.csv");

/// BIDS fNIRS MeasurementTypes.csv
pub const FNIRS_MEASUREMENT_TYPES: &str = include_str!("../data/bids/fnirs/MeasurementTypes.csv");
