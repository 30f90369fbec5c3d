//! Read-only view of a SNIRF acquisition.
//!
//! [`SourceContainer`] is what population code reads from. It exposes only
//! the pieces of the SNIRF hierarchy the BIDS files are derived from.

use serde::Deserialize;

use crate::error::{IngestError, Result};

/// Access to one acquisition's SNIRF content.
pub trait SourceContainer {
    /// Identifying name of the container, usually its file name.
    fn name(&self) -> &str;

    /// `LengthUnit` of probe positions, e.g. `mm`.
    fn length_unit(&self) -> Option<&str>;

    /// `TimeUnit` of the time axis, `s` when absent.
    fn time_unit(&self) -> Option<&str>;

    fn probe(&self) -> Option<&Probe>;

    /// Measurement descriptors of the first data block.
    fn measurements(&self) -> &[Measurement];

    /// Auxiliary sensor names in container order.
    fn aux_names(&self) -> Vec<&str>;

    /// Time axis of the first data block.
    fn time(&self) -> &[f64];

    /// Stimulus groups of every measurement group, in container order.
    fn stimuli(&self) -> Vec<&Stimulus>;

    /// Metadata tag rendered as text.
    fn metadata_tag(&self, tag: &str) -> Option<String>;
}

/// Probe geometry.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Probe {
    #[serde(default)]
    pub wavelengths: Vec<f64>,
    #[serde(default, rename = "sourcePos2D")]
    pub source_pos_2d: Option<Vec<[f64; 2]>>,
    #[serde(default, rename = "detectorPos2D")]
    pub detector_pos_2d: Option<Vec<[f64; 2]>>,
    #[serde(default, rename = "sourcePos3D")]
    pub source_pos_3d: Option<Vec<[f64; 3]>>,
    #[serde(default, rename = "detectorPos3D")]
    pub detector_pos_3d: Option<Vec<[f64; 3]>>,
    #[serde(default)]
    pub source_labels: Option<Vec<String>>,
    #[serde(default)]
    pub detector_labels: Option<Vec<String>>,
}

/// Optode positions, sources first.
#[derive(Debug, Clone, PartialEq)]
pub enum OptodePositions {
    Planar {
        sources: Vec<[f64; 2]>,
        detectors: Vec<[f64; 2]>,
    },
    Spatial {
        sources: Vec<[f64; 3]>,
        detectors: Vec<[f64; 3]>,
    },
}

impl OptodePositions {
    pub fn source_count(&self) -> usize {
        match self {
            OptodePositions::Planar { sources, .. } => sources.len(),
            OptodePositions::Spatial { sources, .. } => sources.len(),
        }
    }

    pub fn detector_count(&self) -> usize {
        match self {
            OptodePositions::Planar { detectors, .. } => detectors.len(),
            OptodePositions::Spatial { detectors, .. } => detectors.len(),
        }
    }

    /// Coordinate columns over sources then detectors; `z` only for 3-D.
    pub fn columns(&self) -> (Vec<f64>, Vec<f64>, Option<Vec<f64>>) {
        match self {
            OptodePositions::Planar { sources, detectors } => {
                let rows = || sources.iter().chain(detectors);
                (
                    rows().map(|p| p[0]).collect(),
                    rows().map(|p| p[1]).collect(),
                    None,
                )
            }
            OptodePositions::Spatial { sources, detectors } => {
                let rows = || sources.iter().chain(detectors);
                (
                    rows().map(|p| p[0]).collect(),
                    rows().map(|p| p[1]).collect(),
                    Some(rows().map(|p| p[2]).collect()),
                )
            }
        }
    }
}

impl Probe {
    /// The one complete set of source and detector positions, 3-D or 2-D.
    pub fn positions(&self) -> Result<OptodePositions> {
        let spatial = match (&self.source_pos_3d, &self.detector_pos_3d) {
            (Some(sources), Some(detectors)) => Some(OptodePositions::Spatial {
                sources: sources.clone(),
                detectors: detectors.clone(),
            }),
            _ => None,
        };
        let planar = match (&self.source_pos_2d, &self.detector_pos_2d) {
            (Some(sources), Some(detectors)) => Some(OptodePositions::Planar {
                sources: sources.clone(),
                detectors: detectors.clone(),
            }),
            _ => None,
        };
        match (spatial, planar) {
            (Some(_), Some(_)) => Err(IngestError::AmbiguousPositions),
            (Some(positions), None) | (None, Some(positions)) => Ok(positions),
            (None, None) => Err(IngestError::MissingPositions),
        }
    }

    /// Source labels, numbered `S1..` when the container has none.
    pub fn source_labels(&self) -> Result<Vec<String>> {
        let count = self.positions()?.source_count();
        resolve_labels(self.source_labels.as_deref(), count, "S", "source")
    }

    /// Detector labels, numbered `D1..` when the container has none.
    pub fn detector_labels(&self) -> Result<Vec<String>> {
        let count = self.positions()?.detector_count();
        resolve_labels(self.detector_labels.as_deref(), count, "D", "detector")
    }

    /// Wavelength at a 1-based index.
    pub fn wavelength(&self, index: usize) -> Result<f64> {
        lookup_one_based(&self.wavelengths, index, "wavelength").copied()
    }
}

fn resolve_labels(
    labels: Option<&[String]>,
    count: usize,
    prefix: &str,
    what: &'static str,
) -> Result<Vec<String>> {
    match labels {
        Some(labels) if labels.len() == count => Ok(labels.to_vec()),
        Some(labels) => Err(IngestError::LabelCountMismatch {
            what,
            labels: labels.len(),
            positions: count,
        }),
        None => Ok((1..=count).map(|i| format!("{prefix}{i}")).collect()),
    }
}

/// Element at a 1-based SNIRF index.
pub fn lookup_one_based<'a, T>(items: &'a [T], index: usize, what: &'static str) -> Result<&'a T> {
    index
        .checked_sub(1)
        .and_then(|i| items.get(i))
        .ok_or(IngestError::IndexOutOfRange {
            what,
            index,
            len: items.len(),
        })
}

/// One entry of a SNIRF `measurementList`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Measurement {
    pub source_index: usize,
    pub detector_index: usize,
    #[serde(default)]
    pub wavelength_index: Option<usize>,
    pub data_type: i64,
    #[serde(default)]
    pub data_type_label: Option<String>,
}

impl Measurement {
    /// Key into the channel type table: the label when set, else the data type.
    pub fn data_type_key(&self) -> String {
        match self.data_type_label.as_deref().map(str::trim) {
            Some(label) if !label.is_empty() => label.to_string(),
            _ => self.data_type.to_string(),
        }
    }
}

/// A named stimulus condition with rows of `[onset, duration, value, ...]`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Stimulus {
    pub name: String,
    #[serde(default)]
    pub data: Vec<Vec<f64>>,
}
