//! BIDS entity labels identifying an acquisition.

use serde::{Deserialize, Serialize};

/// Fully resolved labels, ready for file naming.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Labels {
    pub subject: String,
    pub session: Option<String>,
    pub task: String,
    pub run: Option<String>,
}

impl Labels {
    pub fn new(subject: impl Into<String>, task: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            session: None,
            task: task.into(),
            run: None,
        }
    }

    #[must_use]
    pub fn with_session(mut self, session: impl Into<String>) -> Self {
        self.session = Some(session.into());
        self
    }

    #[must_use]
    pub fn with_run(mut self, run: impl Into<String>) -> Self {
        self.run = Some(run.into());
        self
    }
}

/// Labels of an acquisition whose task may not be known yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityLabels {
    pub subject: String,
    pub session: Option<String>,
    pub task: Option<String>,
    pub run: Option<String>,
}

impl IdentityLabels {
    /// Resolved labels, or `None` while the task is unknown.
    pub fn resolve(&self) -> Option<Labels> {
        let task = self.task.clone()?;
        Some(Labels {
            subject: self.subject.clone(),
            session: self.session.clone(),
            task,
            run: self.run.clone(),
        })
    }
}

/// Entity values found in a file name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedEntities {
    pub subject: Option<String>,
    pub session: Option<String>,
    pub task: Option<String>,
    pub run: Option<String>,
}

impl ParsedEntities {
    /// Parse `sub-`, `ses-`, `task-` and `run-` entities from a file name.
    ///
    /// Directories and the extension are ignored. The name is split on `_`
    /// and the first token carrying each prefix wins. Empty values count as
    /// missing.
    pub fn parse(name: &str) -> Self {
        let file_name = name.rsplit(['/', '\\']).next().unwrap_or(name);
        let stem = file_name.split('.').next().unwrap_or(file_name);

        let mut entities = ParsedEntities::default();
        for token in stem.split('_') {
            let Some((key, value)) = token.split_once('-') else {
                continue;
            };
            if value.is_empty() {
                continue;
            }
            let slot = match key {
                "sub" => &mut entities.subject,
                "ses" => &mut entities.session,
                "task" => &mut entities.task,
                "run" => &mut entities.run,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.to_string());
            }
        }
        entities
    }
}
