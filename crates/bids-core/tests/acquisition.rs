//! End-to-end tests for acquisitions: population, export and layout.

use bids_core::{AcquisitionRecord, AcquisitionStage, MetadataFile, RecordError};
use bids_ingest::{Measurement, Probe, SnirfFile, SourceContainer, Stimulus};
use bids_model::{FileKind, Scalar, Value};
use bids_standards::SchemaCatalog;
use tempfile::TempDir;

const FIXTURE_NAME: &str = "sub-01_ses-02_task-tapping_run-1_nirs.snirf.json";
const FIXTURE: &str = include_str!(
    "../../bids-ingest/tests/fixtures/sub-01_ses-02_task-tapping_run-1_nirs.snirf.json"
);

fn catalog() -> SchemaCatalog {
    SchemaCatalog::load_embedded().expect("load embedded catalog")
}

fn fixture() -> SnirfFile {
    SnirfFile::from_json(FIXTURE_NAME, FIXTURE).expect("parse fixture")
}

/// A hand-built container for cases the fixture does not cover.
#[derive(Default)]
struct FakeSource {
    name: String,
    probe: Option<Probe>,
    measurements: Vec<Measurement>,
    time: Vec<f64>,
    stimuli: Vec<Stimulus>,
    tags: Vec<(&'static str, &'static str)>,
}

impl FakeSource {
    fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            time: vec![0.0, 0.5, 1.0],
            ..Self::default()
        }
    }
}

impl SourceContainer for FakeSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn length_unit(&self) -> Option<&str> {
        Some("cm")
    }

    fn time_unit(&self) -> Option<&str> {
        None
    }

    fn probe(&self) -> Option<&Probe> {
        self.probe.as_ref()
    }

    fn measurements(&self) -> &[Measurement] {
        &self.measurements
    }

    fn aux_names(&self) -> Vec<&str> {
        Vec::new()
    }

    fn time(&self) -> &[f64] {
        &self.time
    }

    fn stimuli(&self) -> Vec<&Stimulus> {
        self.stimuli.iter().collect()
    }

    fn metadata_tag(&self, tag: &str) -> Option<String> {
        self.tags
            .iter()
            .find(|(name, _)| *name == tag)
            .map(|(_, value)| value.to_string())
    }
}

fn texts(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_sequence)
        .expect("sequence")
        .iter()
        .map(ToString::to_string)
        .collect()
}

#[test]
fn populates_every_record_from_the_fixture() {
    let catalog = catalog();
    let acquisition = AcquisitionRecord::from_source(&fixture(), &catalog).expect("acquisition");
    assert_eq!(acquisition.stage(), AcquisitionStage::Populated);
    assert!(acquisition.population().is_complete());

    let coordsystem = acquisition.coordsystem.record();
    assert_eq!(
        coordsystem.value("NIRSCoordinateUnits").and_then(Value::as_text),
        Some("mm")
    );

    let optodes = acquisition.optodes.record();
    assert_eq!(texts(optodes.value("name")), ["S1", "D1", "D2"]);
    assert_eq!(texts(optodes.value("type")), ["source", "detector", "detector"]);
    assert_eq!(texts(optodes.value("z")), ["5.0", "5.0", "5.0"]);

    let channels = acquisition.channels.record();
    assert_eq!(
        texts(channels.value("name")),
        ["S1-D1-760", "S1-D1-850", "S1-D2-760", "S1-D2-850", "ACCEL_X"]
    );
    assert_eq!(
        texts(channels.value("type")),
        [
            "NIRSCWAMPLITUDE",
            "NIRSCWAMPLITUDE",
            "NIRSCWAMPLITUDE",
            "NIRSCWAMPLITUDE",
            "ACCEL"
        ]
    );
    assert_eq!(texts(channels.value("source"))[4], "n/a");

    let nirs = acquisition.nirs.record();
    let frequency = nirs
        .value("SamplingFrequency")
        .and_then(|value| value.cells().first())
        .and_then(Scalar::as_f64)
        .expect("sampling frequency");
    assert!((frequency - 10.0).abs() < 1e-9);
    assert_eq!(nirs.value("NIRSChannelCount"), Some(&Value::from(4_usize)));
    assert_eq!(nirs.value("NIRSDetectorOptodeCount"), Some(&Value::from(2_usize)));
    assert_eq!(nirs.value("ACCELChannelCount"), Some(&Value::from(1_usize)));
    assert_eq!(
        nirs.value("Manufacturer").and_then(Value::as_text),
        Some("Acme Optics")
    );
    assert_eq!(nirs.value("TaskName").and_then(Value::as_text), Some("tapping"));
}

#[test]
fn events_from_all_groups_are_sorted_by_onset() {
    let acquisition = AcquisitionRecord::from_source(&fixture(), &catalog()).expect("acquisition");
    let events = acquisition.events.record();
    assert_eq!(texts(events.value("onset")), ["5.0", "20.0", "35.0", "50.0"]);
    assert_eq!(
        texts(events.value("trial_type")),
        ["Tapping", "Rest", "Tapping", "Tapping"]
    );
}

#[test]
fn dataset_rows_come_from_metadata_tags() {
    let acquisition = AcquisitionRecord::from_source(&fixture(), &catalog()).expect("acquisition");
    let participant = acquisition.participant();
    assert_eq!(participant.get("participant_id"), Some("sub-01"));
    assert_eq!(participant.get("sex"), Some("F"));
    assert_eq!(participant.get("age"), Some("31"));
    assert_eq!(participant.get("species"), Some("homo sapiens"));

    let scan = acquisition.scan();
    assert_eq!(
        scan.get("filename"),
        Some("nirs/sub-01_ses-02_task-tapping_run-1_nirs.snirf")
    );
    assert_eq!(scan.get("acq_time"), Some("2021-03-04T10:15:30.25Z"));
}

#[test]
fn export_writes_files_in_order_and_reports_missing_required() {
    let dir = TempDir::new().expect("temp dir");
    let catalog = catalog();
    let mut acquisition =
        AcquisitionRecord::from_source(&fixture(), &catalog).expect("acquisition");
    let summary = acquisition.export(dir.path(), &catalog).expect("export");

    let names: Vec<String> = summary
        .files
        .iter()
        .map(|path| path.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(
        names,
        [
            "sub-01_ses-02_coordsystem.json",
            "sub-01_ses-02_optodes.tsv",
            "sub-01_ses-02_optodes.json",
            "sub-01_ses-02_task-tapping_run-1_channels.tsv",
            "sub-01_ses-02_task-tapping_run-1_channels.json",
            "sub-01_ses-02_task-tapping_run-1_nirs.json",
            "sub-01_ses-02_task-tapping_run-1_events.tsv",
            "sub-01_ses-02_task-tapping_run-1_events.json",
        ]
    );
    assert!(summary.files.iter().all(|path| path.is_file()));
    assert_eq!(acquisition.stage(), AcquisitionStage::Exported);
    assert_eq!(
        acquisition.nirs.record().origin(),
        Some(dir.path().join("sub-01_ses-02_task-tapping_run-1_nirs.json"))
    );

    let mut missing: Vec<(String, String)> = summary
        .compliance
        .issues
        .iter()
        .map(|issue| (issue.file.clone(), issue.field.clone()))
        .collect();
    missing.sort();
    let expected = [
        ("_channels.tsv", "units"),
        ("_coordsystem.json", "NIRSCoordinateSystem"),
        ("_nirs.json", "PowerLineFrequency"),
        ("_nirs.json", "SoftwareFilters"),
    ]
    .map(|(file, field)| (file.to_string(), field.to_string()));
    assert_eq!(missing, expected);
}

#[test]
fn subject_label_is_required() {
    let err = AcquisitionRecord::new("ses-01_task-rest_nirs.snirf", &catalog()).unwrap_err();
    assert!(matches!(
        err,
        RecordError::MissingIdentity { label: "subject", .. }
    ));
}

#[test]
fn task_falls_back_to_task_name_tag() {
    let mut source = FakeSource::named("sub-07_nirs.snirf");
    source.tags.push(("TaskName", "rest"));
    let acquisition = AcquisitionRecord::from_source(&source, &catalog()).expect("acquisition");
    assert_eq!(acquisition.labels().expect("labels").task, "rest");
    assert_eq!(
        acquisition.scan().get("filename"),
        Some("nirs/sub-07_task-rest_nirs.snirf")
    );
}

#[test]
fn unresolved_task_fails_export_before_writing() {
    let dir = TempDir::new().expect("temp dir");
    let catalog = catalog();
    let source = FakeSource::named("sub-07_nirs.snirf");
    let mut acquisition = AcquisitionRecord::from_source(&source, &catalog).expect("acquisition");
    assert!(matches!(
        acquisition.export(dir.path(), &catalog),
        Err(RecordError::MissingIdentity { label: "task", .. })
    ));
    assert_eq!(std::fs::read_dir(dir.path()).expect("list").count(), 0);
    assert_eq!(acquisition.scan().get("filename"), None);
}

#[test]
fn failed_extractions_leave_other_records_populated() {
    let mut source = FakeSource::named("sub-02_task-rest_nirs.snirf");
    source.measurements.push(Measurement {
        source_index: 1,
        detector_index: 1,
        wavelength_index: Some(1),
        data_type: 1,
        data_type_label: None,
    });
    source.stimuli.push(Stimulus {
        name: "go".to_string(),
        data: vec![vec![2.0, 1.0]],
    });

    let acquisition = AcquisitionRecord::from_source(&source, &catalog()).expect("acquisition");
    let failed: Vec<FileKind> = acquisition
        .population()
        .failures
        .iter()
        .map(|failure| failure.kind)
        .collect();
    assert_eq!(failed, [FileKind::Optodes, FileKind::Channels]);
    assert_eq!(acquisition.stage(), AcquisitionStage::LabelsResolved);

    assert!(acquisition.optodes.record().populated_field_names().is_empty());
    assert!(acquisition.channels.record().populated_field_names().is_empty());
    assert_eq!(
        acquisition
            .coordsystem
            .record()
            .value("NIRSCoordinateUnits")
            .and_then(Value::as_text),
        Some("cm")
    );
    assert_eq!(texts(acquisition.events.record().value("value")), ["n/a"]);
    assert_eq!(
        acquisition.nirs.record().value("SamplingFrequency"),
        Some(&Value::from(2.0))
    );
}

#[test]
fn both_position_sets_fail_the_optode_extraction() {
    let content = FIXTURE.replacen(
        "\"sourcePos3D\"",
        "\"sourcePos2D\": [[-10.0, 0.0]], \"detectorPos2D\": [[-20.0, 0.0], [0.0, 0.0]], \"sourcePos3D\"",
        1,
    );
    let source = SnirfFile::from_json(FIXTURE_NAME, &content).expect("parse");
    let acquisition = AcquisitionRecord::from_source(&source, &catalog()).expect("acquisition");

    let failure = acquisition
        .population()
        .failures
        .iter()
        .find(|failure| failure.kind == FileKind::Optodes)
        .expect("optodes failed");
    assert!(failure.reason.contains("both 2-D and 3-D"), "{}", failure.reason);
    assert!(acquisition.optodes.record().populated_field_names().is_empty());
    assert_ne!(acquisition.stage(), AcquisitionStage::Populated);
}

#[test]
fn layout_splits_probe_files_from_session_files() {
    let catalog = catalog();
    let with_session = AcquisitionRecord::new(FIXTURE_NAME, &catalog).expect("acquisition");
    let layout = with_session.file_layout().expect("layout");
    assert_eq!(
        layout.subject,
        [
            "sub-01_ses-02_coordsystem.json",
            "sub-01_ses-02_optodes.tsv",
            "sub-01_ses-02_optodes.json",
        ]
    );
    assert_eq!(layout.session.len(), 5);
    assert!(layout.session.contains(&"sub-01_ses-02_task-tapping_run-1_events.json".to_string()));

    let plain = AcquisitionRecord::new("sub-03_task-rest_nirs.snirf", &catalog).expect("plain");
    let layout = plain.file_layout().expect("layout");
    assert_eq!(layout.subject.len(), 8);
    assert!(layout.session.is_empty());
}

#[test]
fn text_form_names_subject_and_session() {
    let acquisition = AcquisitionRecord::new(FIXTURE_NAME, &catalog()).expect("acquisition");
    let text = acquisition.to_text().expect("text");
    let json = serde_json::to_value(&text).expect("encode");
    assert_eq!(json["name"], "sub-01");
    assert_eq!(json["sessions"], "02");
    assert_eq!(json["filenames"]["subject"][0], "sub-01_ses-02_coordsystem.json");
}
