use std::path::PathBuf;

use bids_core::PopulationFailure;
use bids_model::ComplianceReport;

#[derive(Debug)]
pub struct ConvertResult {
    pub output_dir: PathBuf,
    pub acquisitions: Vec<AcquisitionSummary>,
    /// Dataset tables or text summaries written besides the per-acquisition files.
    pub dataset_files: Vec<PathBuf>,
    pub errors: Vec<String>,
    pub has_errors: bool,
}

#[derive(Debug)]
pub struct AcquisitionSummary {
    pub source: PathBuf,
    pub subject: String,
    pub session: Option<String>,
    pub task: Option<String>,
    pub files: Vec<PathBuf>,
    pub failures: Vec<PopulationFailure>,
    pub compliance: ComplianceReport,
}
