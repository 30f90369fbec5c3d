//! Output file kinds produced for one fNIRS acquisition.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Serialization format of a file kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordFormat {
    /// A flat JSON object.
    Document,
    /// A tab-separated table with a JSON column-description companion.
    Tabular,
}

/// Selects the column-description companion of a table instead of the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Sidecar,
}

/// The five per-acquisition BIDS fNIRS files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    /// `_coordsystem.json`
    Coordsystem,
    /// `_optodes.tsv`
    Optodes,
    /// `_channels.tsv`
    Channels,
    /// `_events.tsv`
    Events,
    /// `_nirs.json`, the acquisition sidecar.
    Nirs,
}

impl FileKind {
    /// Export order.
    pub const ALL: [FileKind; 5] = [
        FileKind::Coordsystem,
        FileKind::Optodes,
        FileKind::Channels,
        FileKind::Nirs,
        FileKind::Events,
    ];

    /// BIDS suffix entity without separators.
    pub fn as_str(&self) -> &'static str {
        match self {
            FileKind::Coordsystem => "coordsystem",
            FileKind::Optodes => "optodes",
            FileKind::Channels => "channels",
            FileKind::Events => "events",
            FileKind::Nirs => "nirs",
        }
    }

    /// Key under which the schema registers this kind, e.g. `_optodes.tsv`.
    pub fn schema_key(&self) -> &'static str {
        match self {
            FileKind::Coordsystem => "_coordsystem.json",
            FileKind::Optodes => "_optodes.tsv",
            FileKind::Channels => "_channels.tsv",
            FileKind::Events => "_events.tsv",
            FileKind::Nirs => "_nirs.json",
        }
    }

    pub fn format(&self) -> RecordFormat {
        match self {
            FileKind::Coordsystem | FileKind::Nirs => RecordFormat::Document,
            FileKind::Optodes | FileKind::Channels | FileKind::Events => RecordFormat::Tabular,
        }
    }

    /// Whether file names carry the task and run entities.
    pub fn is_acquisition_scoped(&self) -> bool {
        matches!(self, FileKind::Channels | FileKind::Events | FileKind::Nirs)
    }

    /// File name suffix including the extension.
    ///
    /// Document kinds ignore the marker; they have no companion.
    pub fn suffix(&self, marker: Option<Marker>) -> &'static str {
        match (self, marker) {
            (FileKind::Coordsystem, _) => "_coordsystem.json",
            (FileKind::Nirs, _) => "_nirs.json",
            (FileKind::Optodes, None) => "_optodes.tsv",
            (FileKind::Optodes, Some(Marker::Sidecar)) => "_optodes.json",
            (FileKind::Channels, None) => "_channels.tsv",
            (FileKind::Channels, Some(Marker::Sidecar)) => "_channels.json",
            (FileKind::Events, None) => "_events.tsv",
            (FileKind::Events, Some(Marker::Sidecar)) => "_events.json",
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FileKind {
    type Err = String;

    /// Accepts the bare name (`optodes`) or the schema key (`_optodes.tsv`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        let stem = normalized
            .trim_start_matches('_')
            .split('.')
            .next()
            .unwrap_or_default();
        match stem {
            "coordsystem" => Ok(FileKind::Coordsystem),
            "optodes" => Ok(FileKind::Optodes),
            "channels" => Ok(FileKind::Channels),
            "events" => Ok(FileKind::Events),
            "nirs" | "sidecar" => Ok(FileKind::Nirs),
            _ => Err(format!("Unknown file kind: {s}")),
        }
    }
}
