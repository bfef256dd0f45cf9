use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One birthday submission, stored exactly as the form sent it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub date: String,
    pub month: String,
    pub reddit: String,
    // Keys we don't know about survive a rewrite untouched.
    #[serde(flatten, default)]
    pub extra: Map<String, Value>,
}

impl Record {
    pub fn new(
        date: impl Into<String>,
        month: impl Into<String>,
        reddit: impl Into<String>,
    ) -> Self {
        Self {
            date: date.into(),
            month: month.into(),
            reddit: reddit.into(),
            extra: Map::new(),
        }
    }
}

/// Raw `/submit` form body. Every field may be absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubmissionForm {
    pub date: Option<String>,
    pub month: Option<String>,
    pub reddit: Option<String>,
}

impl SubmissionForm {
    /// Presence check only: each field must be there and non-empty.
    pub fn into_record(self) -> Option<Record> {
        let present = |v: Option<String>| v.filter(|s| !s.is_empty());
        Some(Record::new(
            present(self.date)?,
            present(self.month)?,
            present(self.reddit)?,
        ))
    }
}

/// Identifies the located data file within a backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHandle {
    pub id: String,
}

impl FileHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// Full file contents plus the backend's revision token, when it has one.
#[derive(Debug, Clone)]
pub struct Download {
    pub bytes: Vec<u8>,
    pub revision: Option<String>,
}
