//! BIDS fNIRS schema tables and loaders.
//!
//! This crate provides:
//!
//! - **Field schemas** per output file kind: ordered default fields, their
//!   kinds, requirement levels and column descriptions
//! - **Channel types** mapping SNIRF measurement data types to BIDS channel
//!   types
//! - The [`SchemaDirectory`] trait records are built against, so tests can
//!   substitute an in-memory catalog
//!
//! # Data Directory Structure
//!
//! ```text
//! data/bids/fnirs/
//! ├── Fields.csv
//! └── MeasurementTypes.csv
//! ```

pub mod catalog;
pub mod embedded;
pub mod error;
pub mod fnirs;
pub mod schema;

pub use catalog::{FALLBACK_CHANNEL_TYPE, SchemaCatalog};
pub use error::{Result, StandardsError};
pub use schema::{FieldSpec, FileSchema, SchemaDirectory};

/// Schema key of the dataset-level participants table.
pub const PARTICIPANTS_KEY: &str = "participants.tsv";

/// Schema key of the dataset-level scans table.
pub const SCANS_KEY: &str = "scans.tsv";
