pub mod discovery;
pub mod error;
pub mod snirf;
pub mod source;

pub use discovery::{is_snirf_json, list_snirf_files};
pub use error::{IngestError, Result};
pub use snirf::{SNIRF_JSON_EXTENSION, SnirfFile};
pub use source::{
    Measurement, OptodePositions, Probe, SourceContainer, Stimulus, lookup_one_based,
};
