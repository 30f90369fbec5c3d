//! Tests for TSV table records and their column sidecars.

use std::fs;

use bids_core::{MetadataFile, RecordError, TabularRecord};
use bids_model::{FileKind, Labels, Scalar, Value};
use bids_standards::SchemaCatalog;
use tempfile::TempDir;

fn catalog() -> SchemaCatalog {
    SchemaCatalog::load_embedded().expect("load embedded catalog")
}

fn optodes() -> TabularRecord {
    let mut table = TabularRecord::new(FileKind::Optodes, &catalog()).expect("table");
    table.assign("name", vec!["S1", "D1"]).expect("names");
    table.assign("type", vec!["source", "detector"]).expect("types");
    table.assign("x", vec![-10.5, 20.0]).expect("x");
    table.assign("y", vec![0.0, 1.25]).expect("y");
    table
}

#[test]
fn renders_header_and_rows() {
    let tsv = optodes().to_tsv_string().expect("render");
    assert_eq!(
        tsv,
        "name\ttype\tx\ty\nS1\tsource\t-10.5\t0.0\nD1\tdetector\t20.0\t1.25\n"
    );
}

#[test]
fn nulls_render_as_not_available() {
    let mut table = TabularRecord::new(FileKind::Channels, &catalog()).expect("table");
    table.assign("name", vec!["S1-D1-760", "ACCEL_X"]).expect("names");
    table
        .set(
            "wavelength_nominal",
            Some(Value::Sequence(vec![Scalar::Float(760.0), Scalar::Null])),
        )
        .expect("wavelengths");
    let tsv = table.to_tsv_string().expect("render");
    assert_eq!(tsv, "name\twavelength_nominal\nS1-D1-760\t760.0\nACCEL_X\tn/a\n");
}

#[test]
fn round_trip_preserves_columns_and_order() {
    let dir = TempDir::new().expect("temp dir");
    let labels = Labels::new("01", "tap");
    let mut original = optodes();
    original
        .set(
            "template_x",
            Some(Value::Sequence(vec![Scalar::Boolean(true), Scalar::Float(1.5)])),
        )
        .expect("boolean cell");
    let path = original.save_to(&labels, dir.path()).expect("save");
    assert_eq!(path, dir.path().join("sub-01_optodes.tsv"));

    let mut loaded = TabularRecord::new(FileKind::Optodes, &catalog()).expect("table");
    loaded.load_from(&path).expect("load");
    for name in original.record().column_names() {
        assert_eq!(loaded.record().value(name), original.record().value(name), "{name}");
    }
    assert_eq!(loaded.sidecar(), original.sidecar());
}

#[test]
fn ragged_columns_are_not_written() {
    let dir = TempDir::new().expect("temp dir");
    let mut table = optodes();
    table.assign("z", vec![1.0]).expect("short column");
    let err = table
        .save_to(&Labels::new("01", "tap"), dir.path())
        .expect_err("ragged");
    assert!(matches!(err, RecordError::Format { .. }));
    assert!(!dir.path().join("sub-01_optodes.tsv").exists());
}

#[test]
fn sidecar_tracks_populated_columns() {
    let mut table = optodes();
    let first = table.sidecar().clone();
    table.build_sidecar();
    assert_eq!(table.sidecar(), &first);
    assert_eq!(first.len(), 4);
    assert_eq!(first.description("name"), Some("Name of the optode."));

    table.assign("quality", vec![1_i64, 2]).expect("custom column");
    assert_eq!(table.sidecar().len(), 5);
    assert_eq!(table.sidecar().description("quality"), None);

    table.remove("quality").expect("remove");
    assert_eq!(table.sidecar(), &first);
}

#[test]
fn sidecar_document_uses_description_key() {
    let mut table = TabularRecord::new(FileKind::Events, &catalog()).expect("table");
    table.assign("onset", vec![1.0]).expect("onset");
    table.assign("marker", vec![3_i64]).expect("custom");
    let json = table.sidecar_json_string().expect("render");
    insta::assert_snapshot!(json.trim_end(), @r#"
    {
        "onset": {
            "Description": "Onset of the event in seconds from the beginning of the acquisition."
        },
        "marker": null
    }
    "#);
}

#[test]
fn exported_sidecar_loads_back() {
    let dir = TempDir::new().expect("temp dir");
    let labels = Labels::new("01", "tap").with_run("1");
    let table = optodes();
    let path = table.export_sidecar(&labels, dir.path()).expect("export");
    assert_eq!(path, dir.path().join("sub-01_optodes.json"));

    let mut other = optodes();
    fs::write(
        &path,
        r#"{"name": {"Description": "Optode label"}, "type": null}"#,
    )
    .expect("rewrite");
    other.load_sidecar(&path).expect("load sidecar");
    assert_eq!(other.sidecar().len(), 2);
    assert_eq!(other.sidecar().description("name"), Some("Optode label"));

    other.build_sidecar();
    assert_eq!(other.sidecar().description("name"), Some("Optode label"));
}

#[test]
fn unknown_columns_are_rejected() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("sub-01_optodes.tsv");
    fs::write(&path, "name\tbrightness\nS1\t3\n").expect("write");
    let mut table = optodes();
    let before = table.clone();
    assert!(matches!(
        table.load_from(&path),
        Err(RecordError::UnknownField { .. })
    ));
    assert_eq!(table, before);
}

#[test]
fn malformed_numbers_are_rejected() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("sub-01_optodes.tsv");
    fs::write(&path, "name\tx\nS1\tleft\n").expect("write");
    let mut table = optodes();
    assert!(matches!(
        table.load_from(&path),
        Err(RecordError::Format { .. })
    ));
}

#[test]
fn load_strips_bom_and_reads_not_available() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("sub-01_optodes.tsv");
    fs::write(&path, "\u{feff}name\tz\nS1\tn/a\nD1\t4\n").expect("write");
    let mut table = TabularRecord::new(FileKind::Optodes, &catalog()).expect("table");
    table.load_from(&path).expect("load");
    assert_eq!(
        table.record().value("z"),
        Some(&Value::Sequence(vec![Scalar::Null, Scalar::Integer(4)]))
    );
    assert_eq!(table.record().origin(), Some(path));
}
