pub mod conformance;
pub mod dataset;
pub mod field;
pub mod file_kind;
pub mod labels;
pub mod naming;
pub mod value;

pub use conformance::{ComplianceIssue, ComplianceReport, RequirementLevel};
pub use dataset::DatasetRow;
pub use field::{FieldKind, FieldValue};
pub use file_kind::{FileKind, Marker, RecordFormat};
pub use labels::{IdentityLabels, Labels, ParsedEntities};
pub use naming::{acquisition_stem, build_filename};
pub use value::{NOT_AVAILABLE, Scalar, Value, format_compact, format_float};
