//! In-memory `FileStore` for unit tests.

use crate::domain::model::{Download, FileHandle, Record};
use crate::domain::ports::FileStore;
use crate::utils::error::{Result, StoreError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tokio::sync::Barrier;

#[derive(Default)]
pub struct MemoryStore {
    // id -> (contents, revision)
    files: Mutex<HashMap<String, (Vec<u8>, u64)>>,
    locates: AtomicUsize,
    downloads: AtomicUsize,
    updates: AtomicUsize,
    // The first `n` downloads wait for each other before returning.
    interleave: Option<(usize, Barrier)>,
    always_conflict: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(parent: &str, name: &str, records: &[Record]) -> Self {
        let store = Self::new();
        let bytes = serde_json::to_vec_pretty(records).unwrap();
        store.put(parent, name, bytes);
        store
    }

    pub fn interleave_first_downloads(mut self, n: usize) -> Self {
        self.interleave = Some((n, Barrier::new(n)));
        self
    }

    pub fn always_conflict(mut self) -> Self {
        self.always_conflict = true;
        self
    }

    pub fn put(&self, parent: &str, name: &str, bytes: Vec<u8>) {
        self.files
            .lock()
            .unwrap()
            .insert(format!("{}/{}", parent, name), (bytes, 1));
    }

    pub fn contents(&self, name: &str) -> Option<Vec<u8>> {
        let files = self.files.lock().unwrap();
        files
            .iter()
            .find(|(id, _)| id.ends_with(&format!("/{}", name)))
            .map(|(_, (bytes, _))| bytes.clone())
    }

    pub fn locate_calls(&self) -> usize {
        self.locates.load(Ordering::SeqCst)
    }

    pub fn update_calls(&self) -> usize {
        self.updates.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FileStore for MemoryStore {
    fn service_name(&self) -> &str {
        "memory"
    }

    async fn locate(&self, name: &str, parent: &str) -> Result<FileHandle> {
        self.locates.fetch_add(1, Ordering::SeqCst);
        let id = format!("{}/{}", parent, name);
        if self.files.lock().unwrap().contains_key(&id) {
            Ok(FileHandle::new(id))
        } else {
            Err(StoreError::not_found(name, self.service_name()))
        }
    }

    async fn download(&self, handle: &FileHandle, _with_revision: bool) -> Result<Download> {
        let nth = self.downloads.fetch_add(1, Ordering::SeqCst);
        let download = {
            let files = self.files.lock().unwrap();
            let (bytes, revision) = files
                .get(&handle.id)
                .ok_or_else(|| StoreError::not_found(&handle.id, "memory"))?;
            Download {
                bytes: bytes.clone(),
                revision: Some(revision.to_string()),
            }
        };
        if let Some((n, barrier)) = &self.interleave {
            if nth < *n {
                barrier.wait().await;
            }
        }
        Ok(download)
    }

    async fn update(
        &self,
        handle: &FileHandle,
        bytes: Vec<u8>,
        expected_revision: Option<&str>,
    ) -> Result<()> {
        self.updates.fetch_add(1, Ordering::SeqCst);
        let mut files = self.files.lock().unwrap();
        let entry = files
            .get_mut(&handle.id)
            .ok_or_else(|| StoreError::not_found(&handle.id, "memory"))?;
        if let Some(expected) = expected_revision {
            if self.always_conflict || entry.1.to_string() != expected {
                return Err(StoreError::PreconditionFailed);
            }
        }
        *entry = (bytes, entry.1 + 1);
        Ok(())
    }
}
