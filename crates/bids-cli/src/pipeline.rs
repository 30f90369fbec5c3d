//! Conversion pipeline: discover inputs, convert each acquisition, then
//! update the dataset tables.
//!
//! A failing input is recorded and the remaining inputs still convert.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result, bail};
use bids_core::AcquisitionRecord;
use bids_ingest::{SnirfFile, list_snirf_files};
use bids_model::acquisition_stem;
use bids_output::{write_dataset_tables, write_text};
use bids_standards::SchemaDirectory;
use tracing::{error, info, info_span};

use crate::types::{AcquisitionSummary, ConvertResult};

/// Where converted acquisitions go.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// BIDS metadata files plus dataset tables.
    #[default]
    Folder,
    /// A `snirf.json` file layout summary per acquisition.
    Text,
}

#[derive(Debug, Clone)]
pub struct ConvertOptions {
    pub output_dir: PathBuf,
    pub format: OutputFormat,
    /// `participants.tsv` columns set on every converted acquisition.
    pub participant_fields: Vec<(String, String)>,
    pub dataset_tables: bool,
}

impl ConvertOptions {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            format: OutputFormat::Folder,
            participant_fields: Vec::new(),
            dataset_tables: true,
        }
    }
}

/// A single `.snirf.json` file, or every such file in a directory.
pub fn discover_inputs(input: &Path) -> Result<Vec<PathBuf>> {
    if input.is_file() {
        return Ok(vec![input.to_path_buf()]);
    }
    let files = list_snirf_files(input)
        .with_context(|| format!("scan {} for SNIRF files", input.display()))?;
    if files.is_empty() {
        bail!("no .snirf.json files found in {}", input.display());
    }
    Ok(files)
}

/// Parse a `KEY=VALUE` participant column.
pub fn parse_participant_field(raw: &str) -> std::result::Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{raw}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty column name in '{raw}'"));
    }
    Ok((key.to_string(), value.trim().to_string()))
}

/// Convert one acquisition into `options.output_dir`.
pub fn convert_file(
    path: &Path,
    options: &ConvertOptions,
    schema: &dyn SchemaDirectory,
) -> Result<(AcquisitionRecord, AcquisitionSummary)> {
    let source = SnirfFile::open(path).with_context(|| format!("read {}", path.display()))?;
    let mut acquisition = AcquisitionRecord::from_source(&source, schema)
        .with_context(|| format!("build acquisition for {}", path.display()))?;
    for (column, value) in &options.participant_fields {
        acquisition.set_participant(column, Some(value.clone()));
    }

    let (files, compliance) = match options.format {
        OutputFormat::Folder => {
            let summary = acquisition
                .export(&options.output_dir, schema)
                .with_context(|| format!("export {}", path.display()))?;
            (summary.files, summary.compliance)
        }
        OutputFormat::Text => {
            let labels = acquisition.labels()?;
            let directory = options.output_dir.join(acquisition_stem(&labels));
            let written = write_text(&directory, &acquisition)
                .with_context(|| format!("write text summary for {}", path.display()))?;
            (vec![written], acquisition.check_compliance(schema)?)
        }
    };

    let identity = acquisition.identity();
    let summary = AcquisitionSummary {
        source: path.to_path_buf(),
        subject: identity.subject.clone(),
        session: identity.session.clone(),
        task: identity.task.clone(),
        files,
        failures: acquisition.population().failures.clone(),
        compliance,
    };
    Ok((acquisition, summary))
}

/// Convert every input, collecting per-file errors.
pub fn convert(inputs: &[PathBuf], options: &ConvertOptions, schema: &dyn SchemaDirectory) -> ConvertResult {
    let mut result = ConvertResult {
        output_dir: options.output_dir.clone(),
        acquisitions: Vec::new(),
        dataset_files: Vec::new(),
        errors: Vec::new(),
        has_errors: false,
    };

    for path in inputs {
        let span = info_span!("convert", input = %path.display());
        let _guard = span.enter();
        let start = Instant::now();

        match convert_one(path, options, schema, &mut result.dataset_files) {
            Ok(summary) => {
                info!(
                    files = summary.files.len(),
                    warnings = summary.compliance.warning_count(),
                    duration_ms = start.elapsed().as_millis(),
                    "conversion complete"
                );
                result.acquisitions.push(summary);
            }
            Err(err) => {
                error!(error = format!("{err:#}"), "conversion failed");
                result.errors.push(format!("{}: {err:#}", path.display()));
            }
        }
    }

    result.has_errors = !result.errors.is_empty();
    result
}

fn convert_one(
    path: &Path,
    options: &ConvertOptions,
    schema: &dyn SchemaDirectory,
    dataset_files: &mut Vec<PathBuf>,
) -> Result<AcquisitionSummary> {
    let (acquisition, summary) = convert_file(path, options, schema)?;
    if options.format == OutputFormat::Folder && options.dataset_tables {
        let written = write_dataset_tables(&options.output_dir, &acquisition)
            .context("update dataset tables")?;
        for file in written {
            if !dataset_files.contains(&file) {
                dataset_files.push(file);
            }
        }
    }
    Ok(summary)
}
