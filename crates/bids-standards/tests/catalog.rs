//! Tests for the embedded BIDS fNIRS schema catalog.

use bids_model::{FieldKind, FileKind, RequirementLevel};
use bids_standards::{
    FieldSpec, FileSchema, PARTICIPANTS_KEY, SCANS_KEY, SchemaCatalog, SchemaDirectory,
    StandardsError,
};

fn catalog() -> SchemaCatalog {
    SchemaCatalog::load_embedded().expect("load embedded catalog")
}

#[test]
fn every_file_kind_is_registered() {
    let catalog = catalog();
    for kind in FileKind::ALL {
        let fields = catalog
            .fields_for(kind.schema_key())
            .expect("file kind registered");
        assert!(!fields.is_empty(), "{kind} has no fields");
    }
    assert!(catalog.schema_for(PARTICIPANTS_KEY).is_ok());
    assert!(catalog.schema_for(SCANS_KEY).is_ok());
    assert_eq!(catalog.keys().len(), 7);
}

#[test]
fn unknown_key_is_a_schema_error() {
    let err = catalog().fields_for("_anat.json").unwrap_err();
    assert!(matches!(err, StandardsError::UnknownFileKind { ref key } if key == "_anat.json"));
}

#[test]
fn optode_fields_in_declaration_order() {
    let catalog = catalog();
    let fields = catalog.fields_for("_optodes.tsv").expect("optodes fields");
    insta::assert_snapshot!(fields.join("\n"), @r"
    name
    type
    x
    y
    z
    template_x
    template_y
    template_z
    description
    detector_type
    source_type
    ");
}

#[test]
fn kinds_and_levels_follow_the_table() {
    let catalog = catalog();
    let kinds = catalog.kinds_for("_channels.tsv").expect("channel kinds");
    assert!(kinds.contains(&("wavelength_nominal", FieldKind::Number)));
    assert!(kinds.contains(&("name", FieldKind::String)));

    let levels = catalog
        .requirement_levels_for("_nirs.json")
        .expect("sidecar levels");
    assert!(levels.contains(&("TaskName", RequirementLevel::Required)));
    assert!(levels.contains(&("SamplingFrequency", RequirementLevel::Required)));
    assert!(levels.contains(&("CapManufacturer", RequirementLevel::Recommended)));
}

#[test]
fn descriptions_cover_table_columns() {
    let catalog = catalog();
    for key in ["_optodes.tsv", "_channels.tsv", "_events.tsv"] {
        let descriptions = catalog.descriptions_for(key).expect("descriptions");
        for field in catalog.fields_for(key).expect("fields") {
            assert!(descriptions.contains_key(field), "{key} {field} undocumented");
        }
    }
}

#[test]
fn channel_types_fall_back_to_misc() {
    let catalog = catalog();
    assert_eq!(catalog.measurement_type("1"), Some("NIRSCWAMPLITUDE"));
    assert_eq!(catalog.measurement_type("HbO"), Some("NIRSCWHBO"));
    assert_eq!(catalog.measurement_type("99999"), None);
    assert_eq!(catalog.channel_type_or_misc("99999"), "MISC");
}

#[test]
fn in_memory_catalog_substitutes_the_embedded_one() {
    let catalog = SchemaCatalog::new(
        vec![
            FileSchema::new("_events.tsv")
                .with_field(FieldSpec::new("onset", FieldKind::Number, RequirementLevel::Required)),
        ],
        Default::default(),
    );
    assert_eq!(catalog.fields_for("_events.tsv").unwrap(), ["onset"]);
    assert!(catalog.fields_for("_optodes.tsv").is_err());
    assert!(catalog.descriptions_for("_events.tsv").unwrap().is_empty());
}

#[test]
fn required_fields_filter_by_level() {
    let schema = FileSchema::new("_events.tsv")
        .with_field(FieldSpec::new("onset", FieldKind::Number, RequirementLevel::Required))
        .with_field(FieldSpec::new("trial_type", FieldKind::String, RequirementLevel::Optional))
        .with_field(FieldSpec::new("duration", FieldKind::Number, RequirementLevel::Required));
    let required: Vec<_> = schema
        .required_fields()
        .map(|field| field.name.as_str())
        .collect();
    assert_eq!(required, ["onset", "duration"]);
}

#[test]
fn channel_type_fallback_works_through_the_trait() {
    let catalog = catalog();
    let directory: &dyn SchemaDirectory = &catalog;
    assert_eq!(directory.channel_type_or_misc("HbR"), "NIRSCWHBR");
    assert_eq!(directory.channel_type_or_misc("unknown"), "MISC");
}
