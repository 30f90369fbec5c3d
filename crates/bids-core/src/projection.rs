//! Participant and scan rows derived from an acquisition.

use bids_ingest::SourceContainer;
use bids_model::{DatasetRow, Labels, acquisition_stem};
use chrono::{NaiveDate, NaiveTime};
use tracing::debug;

/// Species recorded when the container does not name one.
pub const DEFAULT_SPECIES: &str = "homo sapiens";

/// Participant columns taken from metadata tags, in table order.
const PARTICIPANT_TAGS: [&str; 6] = ["species", "age", "sex", "handedness", "strain", "strain_rrid"];

/// The participants.tsv row for a subject.
pub fn participant_row(subject: &str, source: Option<&dyn SourceContainer>) -> DatasetRow {
    let mut row = DatasetRow::new().with("participant_id", Some(format!("sub-{subject}")));
    for column in PARTICIPANT_TAGS {
        let value = source.and_then(|source| source.metadata_tag(column));
        let value = match column {
            "sex" => value.map(|sex| recode_sex(&sex)),
            "species" => value.or_else(|| Some(DEFAULT_SPECIES.to_string())),
            _ => value,
        };
        row.set(column, value);
    }
    row
}

/// SNIRF encodes sex as 1 (male) and 2 (female).
pub fn recode_sex(value: &str) -> String {
    match value.trim() {
        "1" => "M".to_string(),
        "2" => "F".to_string(),
        other => other.to_string(),
    }
}

/// The scans.tsv row for an acquisition.
pub fn scan_row(labels: Option<&Labels>, source: Option<&dyn SourceContainer>) -> DatasetRow {
    let filename = labels.map(|labels| format!("nirs/{}_nirs.snirf", acquisition_stem(labels)));
    let acq_time = source.and_then(|source| {
        let date = source.metadata_tag("MeasurementDate")?;
        let time = source.metadata_tag("MeasurementTime")?;
        acquisition_time(&date, &time)
    });
    DatasetRow::new()
        .with("filename", filename)
        .with("acq_time", acq_time)
}

/// Combine SNIRF `MeasurementDate` and `MeasurementTime` into a BIDS datetime.
///
/// The date and the `hh:mm:ss` part are validated; fractional seconds and a
/// `Z` or `±hh:mm` zone suffix are kept as written.
pub fn acquisition_time(date: &str, time: &str) -> Option<String> {
    let date = date.trim();
    let time = time.trim();
    if NaiveDate::parse_from_str(date, "%Y-%m-%d").is_err() {
        debug!(date, "unparseable MeasurementDate");
        return None;
    }
    let (clock, rest) = time.split_at_checked(8)?;
    if NaiveTime::parse_from_str(clock, "%H:%M:%S").is_err() || !is_time_suffix(rest) {
        debug!(time, "unparseable MeasurementTime");
        return None;
    }
    Some(format!("{date}T{clock}{rest}"))
}

fn is_time_suffix(rest: &str) -> bool {
    let zone = match rest.strip_prefix('.') {
        Some(after_dot) => {
            let digits = after_dot
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(after_dot.len());
            if digits == 0 {
                return false;
            }
            &after_dot[digits..]
        }
        None => rest,
    };
    match zone.as_bytes() {
        [] | [b'Z'] => true,
        [sign, h1, h2, b':', m1, m2] | [sign, h1, h2, m1, m2] => {
            matches!(sign, b'+' | b'-')
                && [h1, h2, m1, m2].iter().all(|digit| digit.is_ascii_digit())
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_date_and_time() {
        assert_eq!(
            acquisition_time("2021-03-04", "10:15:30"),
            Some("2021-03-04T10:15:30".to_string())
        );
        assert_eq!(
            acquisition_time("2021-03-04", "10:15:30.25Z"),
            Some("2021-03-04T10:15:30.25Z".to_string())
        );
        assert_eq!(
            acquisition_time("2021-03-04", "10:15:30-05:00"),
            Some("2021-03-04T10:15:30-05:00".to_string())
        );
    }

    #[test]
    fn rejects_malformed_values() {
        assert_eq!(acquisition_time("unknown", "10:15:30"), None);
        assert_eq!(acquisition_time("2021-03-04", "10:15"), None);
        assert_eq!(acquisition_time("2021-03-04", "25:00:00"), None);
        assert_eq!(acquisition_time("2021-03-04", "10:15:30 local"), None);
        assert_eq!(acquisition_time("2021-03-04", "10:15:30."), None);
    }

    #[test]
    fn participant_defaults() {
        let row = participant_row("07", None);
        assert_eq!(row.get("participant_id"), Some("sub-07"));
        assert_eq!(row.get("species"), Some(DEFAULT_SPECIES));
        assert_eq!(row.get("sex"), None);
        assert_eq!(recode_sex("2"), "F");
        assert_eq!(recode_sex("1"), "M");
        assert_eq!(recode_sex("O"), "O");
    }

    #[test]
    fn scan_filename_needs_labels() {
        let labels = Labels::new("01", "tap").with_run("2");
        let row = scan_row(Some(&labels), None);
        assert_eq!(row.get("filename"), Some("nirs/sub-01_task-tap_run-2_nirs.snirf"));
        assert_eq!(scan_row(None, None).get("filename"), None);
    }
}
