//! SNIRF containers stored as JSON.
//!
//! The JSON mirrors the SNIRF HDF5 hierarchy with the same group and
//! dataset names (`nirs`, `metaDataTags`, `data`, `measurementList`,
//! `stim`, `probe`, `aux`). Datasets the converter does not read, such as
//! `dataTimeSeries`, are accepted and ignored.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::error::{IngestError, Result};
use crate::source::{Measurement, Probe, SourceContainer, Stimulus};

/// Extension of JSON-rendered SNIRF files.
pub const SNIRF_JSON_EXTENSION: &str = ".snirf.json";

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SnirfRoot {
    #[serde(default)]
    format_version: Option<String>,
    #[serde(default)]
    nirs: Vec<NirsGroup>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NirsGroup {
    #[serde(default)]
    meta_data_tags: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    data: Vec<DataBlock>,
    #[serde(default)]
    stim: Vec<Stimulus>,
    #[serde(default)]
    probe: Option<Probe>,
    #[serde(default)]
    aux: Vec<AuxChannel>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DataBlock {
    #[serde(default)]
    time: Vec<f64>,
    #[serde(default)]
    measurement_list: Vec<Measurement>,
}

#[derive(Debug, Clone, Deserialize)]
struct AuxChannel {
    name: String,
}

/// A SNIRF acquisition loaded from its JSON rendering.
#[derive(Debug, Clone)]
pub struct SnirfFile {
    name: String,
    format_version: Option<String>,
    groups: Vec<NirsGroup>,
}

impl SnirfFile {
    /// Read a container from disk; the file name becomes its identifying name.
    pub fn open(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| IngestError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self::from_json(name, &content)
    }

    /// Parse a container from JSON text.
    pub fn from_json(name: impl Into<String>, content: &str) -> Result<Self> {
        let name = name.into();
        let root: SnirfRoot =
            serde_json::from_str(content).map_err(|e| IngestError::ContainerParse {
                name: name.clone(),
                source: e,
            })?;
        if root.nirs.is_empty() {
            return Err(IngestError::EmptyContainer { name });
        }
        debug!(
            container = %name,
            groups = root.nirs.len(),
            version = root.format_version.as_deref().unwrap_or("unknown"),
            "loaded SNIRF container"
        );
        Ok(Self {
            name,
            format_version: root.format_version,
            groups: root.nirs,
        })
    }

    pub fn format_version(&self) -> Option<&str> {
        self.format_version.as_deref()
    }

    fn primary(&self) -> Option<&NirsGroup> {
        self.groups.first()
    }

    fn primary_block(&self) -> Option<&DataBlock> {
        self.primary().and_then(|group| group.data.first())
    }
}

impl SourceContainer for SnirfFile {
    fn name(&self) -> &str {
        &self.name
    }

    fn length_unit(&self) -> Option<&str> {
        self.primary()
            .and_then(|group| group.meta_data_tags.get("LengthUnit"))
            .and_then(serde_json::Value::as_str)
    }

    fn time_unit(&self) -> Option<&str> {
        self.primary()
            .and_then(|group| group.meta_data_tags.get("TimeUnit"))
            .and_then(serde_json::Value::as_str)
    }

    fn probe(&self) -> Option<&Probe> {
        self.primary().and_then(|group| group.probe.as_ref())
    }

    fn measurements(&self) -> &[Measurement] {
        self.primary_block()
            .map(|block| block.measurement_list.as_slice())
            .unwrap_or_default()
    }

    fn aux_names(&self) -> Vec<&str> {
        self.primary()
            .map(|group| group.aux.iter().map(|aux| aux.name.as_str()).collect())
            .unwrap_or_default()
    }

    fn time(&self) -> &[f64] {
        self.primary_block()
            .map(|block| block.time.as_slice())
            .unwrap_or_default()
    }

    fn stimuli(&self) -> Vec<&Stimulus> {
        self.groups.iter().flat_map(|group| group.stim.iter()).collect()
    }

    fn metadata_tag(&self, tag: &str) -> Option<String> {
        let value = self.primary()?.meta_data_tags.get(tag)?;
        match value {
            serde_json::Value::Null => None,
            serde_json::Value::String(text) => Some(text.clone()),
            other => Some(other.to_string()),
        }
    }
}
