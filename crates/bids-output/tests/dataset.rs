//! Dataset tables and text summaries built from real acquisitions.

use std::fs;

use bids_core::AcquisitionRecord;
use bids_ingest::SnirfFile;
use bids_output::{
    PARTICIPANTS_FILE, SCANS_FILE, UpsertOutcome, render_text, update_participants,
    write_dataset_tables, write_text,
};
use bids_standards::SchemaCatalog;
use tempfile::TempDir;

const FIXTURE_NAME: &str = "sub-01_ses-02_task-tapping_run-1_nirs.snirf.json";
const FIXTURE: &str = include_str!(
    "../../bids-ingest/tests/fixtures/sub-01_ses-02_task-tapping_run-1_nirs.snirf.json"
);

fn acquisition(name: &str) -> AcquisitionRecord {
    let catalog = SchemaCatalog::load_embedded().expect("catalog");
    let source = SnirfFile::from_json(name, FIXTURE).expect("fixture");
    AcquisitionRecord::from_source(&source, &catalog).expect("acquisition")
}

#[test]
fn writes_both_tables_at_the_root() {
    let dir = TempDir::new().expect("temp dir");
    let paths = write_dataset_tables(dir.path(), &acquisition(FIXTURE_NAME)).expect("write");
    assert_eq!(
        paths,
        [dir.path().join(PARTICIPANTS_FILE), dir.path().join(SCANS_FILE)]
    );

    let participants = fs::read_to_string(dir.path().join(PARTICIPANTS_FILE)).expect("read");
    insta::assert_snapshot!(participants.trim_end(), @r"
    participant_id	species	age	sex	handedness	strain	strain_rrid
    sub-01	homo sapiens	31	F	n/a	n/a	n/a
    ");

    let scans = fs::read_to_string(dir.path().join(SCANS_FILE)).expect("read");
    insta::assert_snapshot!(scans.trim_end(), @r"
    filename	acq_time
    nirs/sub-01_ses-02_task-tapping_run-1_nirs.snirf	2021-03-04T10:15:30.25Z
    ");
}

#[test]
fn repeated_conversion_keeps_one_row_per_key() {
    let dir = TempDir::new().expect("temp dir");
    let first = acquisition(FIXTURE_NAME);
    write_dataset_tables(dir.path(), &first).expect("first");
    write_dataset_tables(dir.path(), &first).expect("again");
    let second = acquisition("sub-02_task-tapping_nirs.snirf.json");
    write_dataset_tables(dir.path(), &second).expect("second subject");

    let participants = fs::read_to_string(dir.path().join(PARTICIPANTS_FILE)).expect("read");
    assert_eq!(participants.lines().count(), 3);
    let scans = fs::read_to_string(dir.path().join(SCANS_FILE)).expect("read");
    assert_eq!(scans.lines().count(), 3);
    assert!(scans.contains("nirs/sub-02_task-tapping_nirs.snirf"));
}

#[test]
fn user_columns_override_and_extend_rows() {
    let dir = TempDir::new().expect("temp dir");
    let mut record = acquisition(FIXTURE_NAME);
    update_participants(dir.path(), record.participant()).expect("first");
    record.set_participant("age", Some("32".to_string()));
    record.set_participant("group", Some("patient".to_string()));
    let outcome = update_participants(dir.path(), record.participant()).expect("second");
    assert_eq!(outcome, UpsertOutcome::Replaced);

    let participants = fs::read_to_string(dir.path().join(PARTICIPANTS_FILE)).expect("read");
    let lines: Vec<&str> = participants.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].ends_with("\tgroup"));
    assert!(lines[1].starts_with("sub-01\thomo sapiens\t32\tF"));
    assert!(lines[1].ends_with("\tpatient"));
}

#[test]
fn text_summary_lists_files_by_level() {
    let record = acquisition(FIXTURE_NAME);
    insta::assert_json_snapshot!(record.to_text().expect("text"), @r#"
    {
      "name": "sub-01",
      "filenames": {
        "subject": [
          "sub-01_ses-02_coordsystem.json",
          "sub-01_ses-02_optodes.tsv",
          "sub-01_ses-02_optodes.json"
        ],
        "session": [
          "sub-01_ses-02_task-tapping_run-1_channels.tsv",
          "sub-01_ses-02_task-tapping_run-1_channels.json",
          "sub-01_ses-02_task-tapping_run-1_nirs.json",
          "sub-01_ses-02_task-tapping_run-1_events.tsv",
          "sub-01_ses-02_task-tapping_run-1_events.json"
        ]
      },
      "sessions": "02"
    }
    "#);

    let text = render_text(&record).expect("render");
    assert!(!text.contains('\n'));
    let dir = TempDir::new().expect("temp dir");
    let path = write_text(dir.path(), &record).expect("write");
    assert_eq!(fs::read_to_string(path).expect("read"), text);
}
