//! Deterministic BIDS file names.

use crate::file_kind::{FileKind, Marker};
use crate::labels::Labels;

/// File name for `kind` under `labels`.
///
/// Every name starts with `sub-<subject>` and, when present,
/// `_ses-<session>`. Only acquisition-scoped kinds (channels, events, nirs)
/// carry `_task-<task>` and an optional `_run-<run>`.
pub fn build_filename(kind: FileKind, labels: &Labels, marker: Option<Marker>) -> String {
    let mut name = subject_session_prefix(labels);
    if kind.is_acquisition_scoped() {
        push_task_run(&mut name, labels);
    }
    name.push_str(kind.suffix(marker));
    name
}

/// `sub-<subject>[_ses-<session>]_task-<task>[_run-<run>]`.
pub fn acquisition_stem(labels: &Labels) -> String {
    let mut name = subject_session_prefix(labels);
    push_task_run(&mut name, labels);
    name
}

fn subject_session_prefix(labels: &Labels) -> String {
    let mut name = format!("sub-{}", labels.subject);
    if let Some(session) = &labels.session {
        name.push_str("_ses-");
        name.push_str(session);
    }
    name
}

fn push_task_run(name: &mut String, labels: &Labels) {
    name.push_str("_task-");
    name.push_str(&labels.task);
    if let Some(run) = &labels.run {
        name.push_str("_run-");
        name.push_str(run);
    }
}
