use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// BIDS requirement level of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RequirementLevel {
    Required,
    Recommended,
    Optional,
    /// Required only under conditions the converter does not evaluate.
    Conditional,
}

impl RequirementLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequirementLevel::Required => "REQUIRED",
            RequirementLevel::Recommended => "RECOMMENDED",
            RequirementLevel::Optional => "OPTIONAL",
            RequirementLevel::Conditional => "CONDITIONAL",
        }
    }

    pub fn is_required(&self) -> bool {
        matches!(self, RequirementLevel::Required)
    }
}

impl fmt::Display for RequirementLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RequirementLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "REQUIRED" => Ok(RequirementLevel::Required),
            "RECOMMENDED" => Ok(RequirementLevel::Recommended),
            "OPTIONAL" => Ok(RequirementLevel::Optional),
            "CONDITIONAL" => Ok(RequirementLevel::Conditional),
            _ => Err(format!("Unknown requirement level: {s}")),
        }
    }
}

/// A required field with no value at export time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceIssue {
    /// Schema key of the checked file, e.g. `_nirs.json` or `participants.tsv`.
    pub file: String,
    pub field: String,
    pub level: RequirementLevel,
}

impl ComplianceIssue {
    pub fn message(&self) -> String {
        format!(
            "{} is {} in {} but has no value",
            self.field, self.level, self.file
        )
    }
}

/// Outcome of the compliance pass over one acquisition.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComplianceReport {
    pub issues: Vec<ComplianceIssue>,
}

impl ComplianceReport {
    pub fn warning_count(&self) -> usize {
        self.issues.len()
    }

    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    /// Issues raised against one schema key.
    pub fn issues_for<'a>(&'a self, file: &'a str) -> impl Iterator<Item = &'a ComplianceIssue> {
        self.issues.iter().filter(move |issue| issue.file == file)
    }

    pub fn extend(&mut self, other: ComplianceReport) {
        self.issues.extend(other.issues);
    }
}
