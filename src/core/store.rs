use crate::core::{FileStore, Record};
use crate::domain::model::FileHandle;
use crate::utils::error::{Result, StoreError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// How `append` writes the document back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteMode {
    /// Unconditional overwrite. Concurrent appends can lose records.
    #[default]
    Overwrite,
    /// Overwrite only if the file is still at the revision we read,
    /// otherwise start over.
    Conditional,
}

impl std::str::FromStr for WriteMode {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "overwrite" => Ok(WriteMode::Overwrite),
            "conditional" => Ok(WriteMode::Conditional),
            other => Err(StoreError::config(format!("unknown write mode: {}", other))),
        }
    }
}

/// Where the data file lives inside the backend.
#[derive(Debug, Clone)]
pub struct FileLocation {
    pub folder_id: String,
    pub file_name: String,
}

/// Reads and appends to the JSON array of submissions held in one remote file.
pub struct SubmissionStore {
    backend: Arc<dyn FileStore>,
    location: FileLocation,
    write_mode: WriteMode,
    max_attempts: u32,
}

impl SubmissionStore {
    pub fn new(backend: Arc<dyn FileStore>, location: FileLocation) -> Self {
        Self {
            backend,
            location,
            write_mode: WriteMode::Overwrite,
            max_attempts: 1,
        }
    }

    pub fn with_write_mode(mut self, write_mode: WriteMode, max_attempts: u32) -> Self {
        self.write_mode = write_mode;
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub async fn locate(&self) -> Result<FileHandle> {
        tracing::debug!(
            "Locating {} in folder {}",
            self.location.file_name,
            self.location.folder_id
        );
        self.backend
            .locate(&self.location.file_name, &self.location.folder_id)
            .await
    }

    pub async fn fetch_all(&self) -> Result<Vec<Record>> {
        Ok(self.fetch_with_revision(false).await?.0)
    }

    async fn fetch_with_revision(
        &self,
        with_revision: bool,
    ) -> Result<(Vec<Record>, Option<String>)> {
        let handle = self.locate().await?;
        let download = self.backend.download(&handle, with_revision).await?;
        tracing::debug!(
            "Downloaded {} bytes (revision {:?})",
            download.bytes.len(),
            download.revision
        );
        let records: Vec<Record> = serde_json::from_slice(&download.bytes)?;
        Ok((records, download.revision))
    }

    pub async fn append(&self, record: Record) -> Result<()> {
        match self.write_mode {
            WriteMode::Overwrite => self.try_append(&record, false).await,
            WriteMode::Conditional => {
                for attempt in 1..=self.max_attempts {
                    match self.try_append(&record, true).await {
                        Err(StoreError::PreconditionFailed) => {
                            tracing::warn!(
                                "Data file changed during append (attempt {}/{}), retrying",
                                attempt,
                                self.max_attempts
                            );
                        }
                        other => return other,
                    }
                }
                Err(StoreError::Conflict {
                    attempts: self.max_attempts,
                })
            }
        }
    }

    /// One read-modify-write pass.
    async fn try_append(&self, record: &Record, conditional: bool) -> Result<()> {
        let (mut records, revision) = self.fetch_with_revision(conditional).await?;
        records.push(record.clone());
        let body = serde_json::to_vec_pretty(&records)?;

        // The file is located a second time before writing.
        let handle = self.locate().await?;
        let precondition = if conditional { revision.as_deref() } else { None };
        self.backend.update(&handle, body, precondition).await?;

        tracing::info!(
            "Appended submission for {} ({} records)",
            record.reddit,
            records.len()
        );
        Ok(())
    }
}
