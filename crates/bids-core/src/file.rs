use std::path::{Path, PathBuf};

use bids_model::Labels;

use crate::error::Result;
use crate::record::MetadataRecord;

/// A record with an on-disk representation.
pub trait MetadataFile {
    fn record(&self) -> &MetadataRecord;

    /// Write the record to its BIDS file name under `directory`.
    ///
    /// Returns the written path and records it as the origin.
    fn save_to(&mut self, labels: &Labels, directory: &Path) -> Result<PathBuf>;

    fn load_from(&mut self, path: &Path) -> Result<()>;
}
