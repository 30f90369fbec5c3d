//! Field extraction from a SNIRF source container.
//!
//! Each extractor computes the full set of assignments for one file kind
//! without touching any record, so a failure leaves the record unchanged.

use bids_ingest::{IngestError, SourceContainer, lookup_one_based};
use bids_model::{Scalar, Value, format_compact};
use bids_standards::{FALLBACK_CHANNEL_TYPE, SchemaDirectory};

use crate::error::Result;

/// Field assignments produced for one record.
pub type Extraction = Vec<(&'static str, Value)>;

/// Auxiliary channel types recognised by name.
const AUX_TYPES: [&str; 3] = ["ACCEL", "GYRO", "MAGN"];

/// Coordinate units of the probe.
pub fn extract_coordsystem(source: &dyn SourceContainer) -> Result<Extraction> {
    let mut fields = Extraction::new();
    if let Some(unit) = source.length_unit() {
        fields.push(("NIRSCoordinateUnits", Value::text(unit)));
    }
    Ok(fields)
}

/// One row per source, then one per detector.
pub fn extract_optodes(source: &dyn SourceContainer) -> Result<Extraction> {
    let probe = source.probe().ok_or_else(|| IngestError::MissingProbe {
        name: source.name().to_string(),
    })?;
    let positions = probe.positions()?;
    let source_labels = probe.source_labels()?;
    let detector_labels = probe.detector_labels()?;

    let names: Vec<String> = source_labels
        .iter()
        .chain(&detector_labels)
        .cloned()
        .collect();
    let types: Vec<&str> = std::iter::repeat_n("source", source_labels.len())
        .chain(std::iter::repeat_n("detector", detector_labels.len()))
        .collect();
    let (x, y, z) = positions.columns();

    let mut fields: Extraction = vec![
        ("name", Value::from(names)),
        ("type", Value::from(types)),
        ("x", Value::from(x)),
        ("y", Value::from(y)),
    ];
    if let Some(z) = z {
        fields.push(("z", Value::from(z)));
    }
    Ok(fields)
}

/// Channel type of an auxiliary sensor, by name.
pub fn aux_channel_type(name: &str) -> &'static str {
    let upper = name.to_uppercase();
    AUX_TYPES
        .into_iter()
        .find(|kind| upper.contains(kind))
        .unwrap_or(FALLBACK_CHANNEL_TYPE)
}

/// One row per measurement of the first data block, then one per aux sensor.
pub fn extract_channels(
    source: &dyn SourceContainer,
    schema: &dyn SchemaDirectory,
) -> Result<Extraction> {
    let measurements = source.measurements();
    let aux_names = source.aux_names();

    let mut names = Vec::new();
    let mut types = Vec::new();
    let mut sources = Vec::new();
    let mut detectors = Vec::new();
    let mut wavelengths = Vec::new();

    if !measurements.is_empty() {
        let probe = source.probe().ok_or_else(|| IngestError::MissingProbe {
            name: source.name().to_string(),
        })?;
        let source_labels = probe.source_labels()?;
        let detector_labels = probe.detector_labels()?;

        for measurement in measurements {
            let source_label = lookup_one_based(&source_labels, measurement.source_index, "source")?;
            let detector_label =
                lookup_one_based(&detector_labels, measurement.detector_index, "detector")?;
            let wavelength = measurement
                .wavelength_index
                .map(|index| probe.wavelength(index))
                .transpose()?;
            let data_type = measurement.data_type_key();
            let suffix = wavelength.map_or_else(|| data_type.clone(), format_compact);

            names.push(Scalar::from(format!("{source_label}-{detector_label}-{suffix}")));
            types.push(Scalar::from(
                schema.channel_type_or_misc(&data_type),
            ));
            sources.push(Scalar::from(source_label.as_str()));
            detectors.push(Scalar::from(detector_label.as_str()));
            wavelengths.push(Scalar::from(wavelength));
        }
    }

    for name in aux_names {
        names.push(Scalar::from(name));
        types.push(Scalar::from(aux_channel_type(name)));
        sources.push(Scalar::Null);
        detectors.push(Scalar::Null);
        wavelengths.push(Scalar::Null);
    }

    if names.is_empty() {
        return Ok(Extraction::new());
    }
    Ok(vec![
        ("name", Value::Sequence(names)),
        ("type", Value::Sequence(types)),
        ("source", Value::Sequence(sources)),
        ("detector", Value::Sequence(detectors)),
        ("wavelength_nominal", Value::Sequence(wavelengths)),
    ])
}

/// Stimulus rows of every measurement group, stably sorted by onset.
pub fn extract_events(source: &dyn SourceContainer) -> Result<Extraction> {
    struct EventRow<'a> {
        onset: f64,
        duration: Option<f64>,
        value: Option<f64>,
        trial_type: &'a str,
    }

    let mut rows: Vec<EventRow<'_>> = source
        .stimuli()
        .into_iter()
        .flat_map(|stimulus| {
            stimulus.data.iter().filter_map(move |row| {
                Some(EventRow {
                    onset: *row.first()?,
                    duration: row.get(1).copied(),
                    value: row.get(2).copied(),
                    trial_type: stimulus.name.as_str(),
                })
            })
        })
        .collect();
    if rows.is_empty() {
        return Ok(Extraction::new());
    }
    rows.sort_by(|a, b| a.onset.total_cmp(&b.onset));

    Ok(vec![
        ("onset", Value::from(rows.iter().map(|r| r.onset).collect::<Vec<_>>())),
        (
            "duration",
            Value::from(rows.iter().map(|r| r.duration).collect::<Vec<_>>()),
        ),
        (
            "value",
            Value::from(rows.iter().map(|r| r.value).collect::<Vec<_>>()),
        ),
        (
            "trial_type",
            Value::from(rows.iter().map(|r| r.trial_type).collect::<Vec<_>>()),
        ),
    ])
}

/// Seconds per unit of the container's time axis.
fn seconds_per_time_unit(unit: Option<&str>) -> f64 {
    match unit.map(str::trim) {
        Some("ms") => 1e-3,
        Some("us") => 1e-6,
        _ => 1.0,
    }
}

/// Acquisition sidecar fields derivable from the container.
pub fn extract_nirs(source: &dyn SourceContainer) -> Result<Extraction> {
    let time = source.time();
    if time.len() < 2 {
        return Err(IngestError::InvalidTimeAxis {
            reason: format!("{} time point(s), need at least 2", time.len()),
        }
        .into());
    }
    let scale = seconds_per_time_unit(source.time_unit());
    let intervals: Vec<f64> = time.windows(2).map(|pair| pair[1] - pair[0]).collect();
    let mean_interval = intervals.iter().sum::<f64>() / intervals.len() as f64 * scale;
    if !(mean_interval.is_finite() && mean_interval > 0.0) {
        return Err(IngestError::InvalidTimeAxis {
            reason: "time axis is not increasing".to_string(),
        }
        .into());
    }
    let duration = (time[time.len() - 1] - time[0]) * scale;

    let mut fields: Extraction = vec![
        ("SamplingFrequency", Value::from(1.0 / mean_interval)),
        ("RecordingDuration", Value::from(duration)),
        ("NIRSChannelCount", Value::from(source.measurements().len())),
    ];

    if let Some(positions) = source.probe().and_then(|probe| probe.positions().ok()) {
        fields.push(("NIRSSourceOptodeCount", Value::from(positions.source_count())));
        fields.push((
            "NIRSDetectorOptodeCount",
            Value::from(positions.detector_count()),
        ));
    }

    let aux_names = source.aux_names();
    for (field, kind) in [
        ("ACCELChannelCount", "ACCEL"),
        ("GYROChannelCount", "GYRO"),
        ("MAGNChannelCount", "MAGN"),
    ] {
        let count = aux_names
            .iter()
            .filter(|name| aux_channel_type(name) == kind)
            .count();
        fields.push((field, Value::from(count)));
    }

    for (field, tag) in [
        ("TaskName", "TaskName"),
        ("Manufacturer", "ManufacturerName"),
        ("ManufacturersModelName", "Model"),
    ] {
        if let Some(value) = source.metadata_tag(tag) {
            fields.push((field, Value::text(value)));
        }
    }
    Ok(fields)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aux_types_match_by_substring() {
        assert_eq!(aux_channel_type("ACCEL_X"), "ACCEL");
        assert_eq!(aux_channel_type("head_gyro_z"), "GYRO");
        assert_eq!(aux_channel_type("magn1"), "MAGN");
        assert_eq!(aux_channel_type("pulse"), "MISC");
    }

    #[test]
    fn time_units_scale_to_seconds() {
        assert_eq!(seconds_per_time_unit(None), 1.0);
        assert_eq!(seconds_per_time_unit(Some("ms")), 1e-3);
    }
}
