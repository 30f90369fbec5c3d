//! One fNIRS acquisition and its five BIDS metadata files.
//!
//! An [`AcquisitionRecord`] resolves its BIDS labels from the source name,
//! populates every record from the source container, and exports the files
//! in a fixed order followed by a compliance pass.
//!
//! ```text
//! Uninitialized --labels--> LabelsResolved --populate--> Populated --export--> Exported
//! ```

use std::path::{Path, PathBuf};

use bids_ingest::SourceContainer;
use bids_model::{
    ComplianceReport, DatasetRow, FileKind, IdentityLabels, Labels, Marker, ParsedEntities,
    RecordFormat, Value, build_filename,
};
use bids_standards::{PARTICIPANTS_KEY, SCANS_KEY, SchemaDirectory};
use serde::Serialize;
use tracing::{debug, info, info_span, warn};

use crate::compliance::{check_record, check_row};
use crate::document::DocumentRecord;
use crate::error::{RecordError, Result, io_error};
use crate::file::MetadataFile;
use crate::populate::{
    Extraction, extract_channels, extract_coordsystem, extract_events, extract_nirs,
    extract_optodes,
};
use crate::projection::{participant_row, scan_row};
use crate::record::MetadataRecord;
use crate::tabular::TabularRecord;

/// Lifecycle stage of an acquisition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum AcquisitionStage {
    #[default]
    Uninitialized,
    LabelsResolved,
    Populated,
    Exported,
}

/// A record whose extraction failed; its fields were left absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PopulationFailure {
    pub kind: FileKind,
    pub reason: String,
}

/// Outcome of populating an acquisition from its source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PopulationReport {
    pub failures: Vec<PopulationFailure>,
}

impl PopulationReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Files written by an export and the compliance findings that followed.
#[derive(Debug, Clone, Default)]
pub struct ExportSummary {
    pub files: Vec<PathBuf>,
    pub compliance: ComplianceReport,
}

/// File names split by the BIDS folder level they belong to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileLayout {
    pub subject: Vec<String>,
    pub session: Vec<String>,
}

/// Text rendering of an acquisition: its subject, file names and session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AcquisitionText {
    pub name: String,
    pub filenames: FileLayout,
    pub sessions: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AcquisitionRecord {
    pub coordsystem: DocumentRecord,
    pub optodes: TabularRecord,
    pub channels: TabularRecord,
    /// The acquisition sidecar, `_nirs.json`.
    pub nirs: DocumentRecord,
    pub events: TabularRecord,
    source_name: String,
    identity: IdentityLabels,
    participant: DatasetRow,
    scan: DatasetRow,
    stage: AcquisitionStage,
    population: PopulationReport,
}

impl AcquisitionRecord {
    /// Resolve labels from `source_name` and build empty records.
    ///
    /// A name without a `sub-` entity is rejected. A missing `task-` entity
    /// is tolerated here and resolved later from the acquisition sidecar.
    pub fn new(source_name: &str, schema: &dyn SchemaDirectory) -> Result<Self> {
        let entities = ParsedEntities::parse(source_name);
        let subject = entities
            .subject
            .ok_or_else(|| RecordError::MissingIdentity {
                label: "subject",
                source_name: source_name.to_string(),
            })?;
        let identity = IdentityLabels {
            subject,
            session: entities.session,
            task: entities.task,
            run: entities.run,
        };
        debug!(
            source = source_name,
            subject = %identity.subject,
            task = identity.task.as_deref().unwrap_or("unresolved"),
            "resolved labels"
        );

        let participant = participant_row(&identity.subject, None);
        let scan = scan_row(identity.resolve().as_ref(), None);
        Ok(Self {
            coordsystem: DocumentRecord::new(FileKind::Coordsystem, schema)?,
            optodes: TabularRecord::new(FileKind::Optodes, schema)?,
            channels: TabularRecord::new(FileKind::Channels, schema)?,
            nirs: DocumentRecord::new(FileKind::Nirs, schema)?,
            events: TabularRecord::new(FileKind::Events, schema)?,
            source_name: source_name.to_string(),
            identity,
            participant,
            scan,
            stage: AcquisitionStage::LabelsResolved,
            population: PopulationReport::default(),
        })
    }

    /// Build and populate an acquisition from a source container.
    pub fn from_source(source: &dyn SourceContainer, schema: &dyn SchemaDirectory) -> Result<Self> {
        let mut acquisition = Self::new(source.name(), schema)?;
        acquisition.populate(source, schema);
        Ok(acquisition)
    }

    /// Extract every record from `source`.
    ///
    /// Extractions are independent: one failing leaves that record's
    /// fields untouched and is reported, the others still apply.
    pub fn populate(
        &mut self,
        source: &dyn SourceContainer,
        schema: &dyn SchemaDirectory,
    ) -> &PopulationReport {
        let span = info_span!("populate", source = %self.source_name);
        let _guard = span.enter();

        let mut failures = Vec::new();
        let mut note = |kind: FileKind, outcome: Result<()>| {
            if let Err(error) = outcome {
                warn!(kind = %kind, %error, "extraction failed; fields left absent");
                failures.push(PopulationFailure {
                    kind,
                    reason: error.to_string(),
                });
            }
        };

        note(
            FileKind::Coordsystem,
            extract_coordsystem(source)
                .and_then(|fields| apply_document(&mut self.coordsystem, fields)),
        );
        note(
            FileKind::Optodes,
            extract_optodes(source).and_then(|fields| apply_table(&mut self.optodes, fields)),
        );
        note(
            FileKind::Channels,
            extract_channels(source, schema)
                .and_then(|fields| apply_table(&mut self.channels, fields)),
        );
        note(
            FileKind::Nirs,
            extract_nirs(source).and_then(|fields| apply_document(&mut self.nirs, fields)),
        );
        note(
            FileKind::Events,
            extract_events(source).and_then(|fields| apply_table(&mut self.events, fields)),
        );

        self.population = PopulationReport { failures };
        self.resolve_task();
        self.participant = participant_row(&self.identity.subject, Some(source));
        self.scan = scan_row(self.identity.resolve().as_ref(), Some(source));

        if self.population.is_complete() {
            self.stage = self.stage.max(AcquisitionStage::Populated);
        }
        info!(
            failures = self.population.failures.len(),
            stage = ?self.stage,
            "populated acquisition"
        );
        &self.population
    }

    /// Take the task from the file name, else from the sidecar's `TaskName`.
    ///
    /// Once known, the task also fills an empty `TaskName`.
    fn resolve_task(&mut self) {
        let record = self.nirs.record_mut();
        if let Some(task) = self.identity.task.clone() {
            if record.value("TaskName").is_none()
                && let Err(error) = record.assign("TaskName", task)
            {
                warn!(%error, "could not record TaskName");
            }
        } else {
            self.identity.task = record
                .value("TaskName")
                .and_then(Value::as_text)
                .map(str::to_string);
        }
    }

    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    pub fn identity(&self) -> &IdentityLabels {
        &self.identity
    }

    /// Fully resolved labels, or `MissingIdentity` while the task is unknown.
    pub fn labels(&self) -> Result<Labels> {
        self.identity
            .resolve()
            .ok_or_else(|| RecordError::MissingIdentity {
                label: "task",
                source_name: self.source_name.clone(),
            })
    }

    pub fn stage(&self) -> AcquisitionStage {
        self.stage
    }

    pub fn population(&self) -> &PopulationReport {
        &self.population
    }

    pub fn participant(&self) -> &DatasetRow {
        &self.participant
    }

    /// Override a participants.tsv column, e.g. with user-supplied values.
    pub fn set_participant(&mut self, column: &str, value: Option<String>) {
        self.participant.set(column, value);
    }

    pub fn scan(&self) -> &DatasetRow {
        &self.scan
    }

    /// The five records in export order.
    pub fn records(&self) -> [&MetadataRecord; 5] {
        [
            self.coordsystem.record(),
            self.optodes.record(),
            self.channels.record(),
            self.nirs.record(),
            self.events.record(),
        ]
    }

    /// Write every file into `directory`, then run the compliance pass.
    ///
    /// Fails before writing anything when the task is unresolved. Files
    /// written before a later failure are left in place.
    pub fn export(&mut self, directory: &Path, schema: &dyn SchemaDirectory) -> Result<ExportSummary> {
        let labels = self.labels()?;
        let span = info_span!("export", source = %self.source_name, dir = %directory.display());
        let _guard = span.enter();

        std::fs::create_dir_all(directory).map_err(io_error(directory))?;
        let mut files = vec![self.coordsystem.save_to(&labels, directory)?];
        files.push(self.optodes.save_to(&labels, directory)?);
        files.push(self.optodes.export_sidecar(&labels, directory)?);
        files.push(self.channels.save_to(&labels, directory)?);
        files.push(self.channels.export_sidecar(&labels, directory)?);
        files.push(self.nirs.save_to(&labels, directory)?);
        files.push(self.events.save_to(&labels, directory)?);
        files.push(self.events.export_sidecar(&labels, directory)?);

        let compliance = self.check_compliance(schema)?;
        self.stage = AcquisitionStage::Exported;
        info!(
            files = files.len(),
            warnings = compliance.warning_count(),
            "exported acquisition"
        );
        Ok(ExportSummary { files, compliance })
    }

    /// Missing REQUIRED fields across the five records and both dataset rows.
    pub fn check_compliance(&self, schema: &dyn SchemaDirectory) -> Result<ComplianceReport> {
        let mut report = ComplianceReport::default();
        for record in self.records() {
            report.extend(check_record(record, schema)?);
        }
        report.extend(check_row(PARTICIPANTS_KEY, &self.participant, schema)?);
        report.extend(check_row(SCANS_KEY, &self.scan, schema)?);
        Ok(report)
    }

    /// File names grouped by folder level.
    ///
    /// Without a session every file sits at subject level. With one, the
    /// probe description (optodes and coordsystem) stays at subject level
    /// and the per-acquisition files move to session level.
    pub fn file_layout(&self) -> Result<FileLayout> {
        let labels = self.labels()?;
        let mut layout = FileLayout {
            subject: Vec::new(),
            session: Vec::new(),
        };
        for kind in FileKind::ALL {
            let mut names = vec![build_filename(kind, &labels, None)];
            if kind.format() == RecordFormat::Tabular {
                names.push(build_filename(kind, &labels, Some(Marker::Sidecar)));
            }
            if labels.session.is_some() && kind.is_acquisition_scoped() {
                layout.session.extend(names);
            } else {
                layout.subject.extend(names);
            }
        }
        Ok(layout)
    }

    /// Text form of the acquisition.
    pub fn to_text(&self) -> Result<AcquisitionText> {
        Ok(AcquisitionText {
            name: format!("sub-{}", self.identity.subject),
            filenames: self.file_layout()?,
            sessions: self.identity.session.clone(),
        })
    }
}

fn apply_document(document: &mut DocumentRecord, fields: Extraction) -> Result<()> {
    let mut updated = document.clone();
    for (name, value) in fields {
        updated.record_mut().set(name, Some(value))?;
    }
    *document = updated;
    Ok(())
}

fn apply_table(table: &mut TabularRecord, fields: Extraction) -> Result<()> {
    let mut updated = table.clone();
    for (name, value) in fields {
        updated.set(name, Some(value))?;
    }
    *table = updated;
    Ok(())
}
