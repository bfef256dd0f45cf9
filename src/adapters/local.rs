use crate::core::{Download, FileHandle, FileStore};
use crate::utils::error::{Result, StoreError};
use async_trait::async_trait;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

/// Data file on the local disk. The "folder id" is a directory, resolved
/// against `base_path`.
#[derive(Debug)]
pub struct LocalStore {
    base_path: PathBuf,
    write_lock: Mutex<()>,
}

impl LocalStore {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            write_lock: Mutex::new(()),
        }
    }
}

fn revision_of(bytes: &[u8]) -> String {
    let mut hasher = DefaultHasher::new();
    bytes.hash(&mut hasher);
    format!("{:016x}", hasher.finish())
}

#[async_trait]
impl FileStore for LocalStore {
    fn service_name(&self) -> &str {
        "local storage"
    }

    async fn locate(&self, name: &str, parent: &str) -> Result<FileHandle> {
        let full_path = self.base_path.join(parent).join(name);
        if tokio::fs::metadata(&full_path)
            .await
            .map(|m| m.is_file())
            .unwrap_or(false)
        {
            Ok(FileHandle::new(full_path.to_string_lossy()))
        } else {
            Err(StoreError::not_found(name, self.service_name()))
        }
    }

    async fn download(&self, handle: &FileHandle, _with_revision: bool) -> Result<Download> {
        let bytes = tokio::fs::read(Path::new(&handle.id)).await?;
        let revision = Some(revision_of(&bytes));
        Ok(Download { bytes, revision })
    }

    async fn update(
        &self,
        handle: &FileHandle,
        bytes: Vec<u8>,
        expected_revision: Option<&str>,
    ) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let path = Path::new(&handle.id);

        if let Some(expected) = expected_revision {
            let current = tokio::fs::read(path).await?;
            if revision_of(&current) != expected {
                return Err(StoreError::PreconditionFailed);
            }
        }

        tokio::fs::write(path, bytes).await?;
        Ok(())
    }
}
