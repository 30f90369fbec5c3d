pub mod acquisition;
pub mod compliance;
pub mod document;
pub mod error;
pub mod file;
pub mod populate;
pub mod projection;
pub mod record;
pub mod tabular;

pub use acquisition::{
    AcquisitionRecord, AcquisitionStage, AcquisitionText, ExportSummary, FileLayout,
    PopulationFailure, PopulationReport,
};
pub use compliance::{check_record, check_row};
pub use document::DocumentRecord;
pub use error::{RecordError, Result};
pub use file::MetadataFile;
pub use populate::{
    Extraction, aux_channel_type, extract_channels, extract_coordsystem, extract_events,
    extract_nirs, extract_optodes,
};
pub use projection::{
    DEFAULT_SPECIES, acquisition_time, participant_row, recode_sex, scan_row,
};
pub use record::{MetadataRecord, ORIGIN_FIELD};
pub use tabular::{ColumnDescription, ColumnSidecar, TabularRecord};
