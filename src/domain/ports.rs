use crate::domain::model::{Download, FileHandle};
use crate::utils::error::Result;
use async_trait::async_trait;

/// The three calls the submission store makes against a hosted file service.
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Human-readable service name used in not-found messages.
    fn service_name(&self) -> &str;

    /// Finds `name` directly under `parent`. First match wins.
    async fn locate(&self, name: &str, parent: &str) -> Result<FileHandle>;

    /// Reads the whole file. Backends only owe a revision when
    /// `with_revision` is set; some hand one back regardless.
    async fn download(&self, handle: &FileHandle, with_revision: bool) -> Result<Download>;

    /// Replaces the whole file. When `expected_revision` is set and the file
    /// has moved on, returns `StoreError::PreconditionFailed` without writing.
    async fn update(
        &self,
        handle: &FileHandle,
        bytes: Vec<u8>,
        expected_revision: Option<&str>,
    ) -> Result<()>;
}

/// Supplies bearer tokens for authenticated backends.
#[async_trait]
pub trait TokenSource: Send + Sync {
    async fn access_token(&self) -> Result<String>;
}
