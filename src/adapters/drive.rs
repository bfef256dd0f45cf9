use crate::core::{Download, FileHandle, FileStore, TokenSource};
use crate::utils::error::{Result, StoreError};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use std::sync::Arc;

pub const DEFAULT_API_BASE: &str = "https://www.googleapis.com/drive/v3";
pub const DEFAULT_UPLOAD_BASE: &str = "https://www.googleapis.com/upload/drive/v3";

#[derive(Debug, Deserialize)]
struct FileList {
    #[serde(default)]
    files: Vec<FileId>,
}

#[derive(Debug, Deserialize)]
struct FileId {
    id: String,
}

#[derive(Debug, Deserialize)]
struct FileVersion {
    version: Option<String>,
}

/// Google Drive v3 over plain REST calls.
pub struct DriveStore {
    client: Client,
    tokens: Arc<dyn TokenSource>,
    api_base: String,
    upload_base: String,
}

impl DriveStore {
    pub fn new(client: Client, tokens: Arc<dyn TokenSource>) -> Self {
        Self {
            client,
            tokens,
            api_base: DEFAULT_API_BASE.to_string(),
            upload_base: DEFAULT_UPLOAD_BASE.to_string(),
        }
    }

    pub fn with_endpoints(mut self, api_base: &str, upload_base: &str) -> Self {
        self.api_base = api_base.trim_end_matches('/').to_string();
        self.upload_base = upload_base.trim_end_matches('/').to_string();
        self
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let token = self.tokens.access_token().await?;
        let response = request.bearer_auth(token).send().await?;
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(StoreError::Remote {
                status: status.as_u16(),
                body,
            })
        }
    }

    async fn current_version(&self, handle: &FileHandle) -> Result<Option<String>> {
        let url = format!("{}/files/{}", self.api_base, handle.id);
        let response = self
            .send(self.client.get(url).query(&[("fields", "version")]))
            .await?;
        let meta: FileVersion = response.json().await?;
        Ok(meta.version)
    }
}

/// Escapes a value for use inside a single-quoted Drive query literal.
fn quote(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}

#[async_trait]
impl FileStore for DriveStore {
    fn service_name(&self) -> &str {
        "Google Drive"
    }

    async fn locate(&self, name: &str, parent: &str) -> Result<FileHandle> {
        let query = format!("'{}' in parents and name='{}'", quote(parent), quote(name));
        tracing::debug!("Drive files.list q={}", query);

        let url = format!("{}/files", self.api_base);
        let response = self
            .send(
                self.client
                    .get(url)
                    .query(&[("q", query.as_str()), ("fields", "files(id)")]),
            )
            .await?;

        let list: FileList = response.json().await?;
        if list.files.len() > 1 {
            tracing::warn!("{} files named {} in folder, using the first", list.files.len(), name);
        }
        list.files
            .into_iter()
            .next()
            .map(|f| FileHandle::new(f.id))
            .ok_or_else(|| StoreError::not_found(name, self.service_name()))
    }

    async fn download(&self, handle: &FileHandle, with_revision: bool) -> Result<Download> {
        // Version first: if the file changes in between we only risk a
        // spurious conflict, never a lost write.
        let revision = if with_revision {
            self.current_version(handle).await?
        } else {
            None
        };

        let url = format!("{}/files/{}", self.api_base, handle.id);
        let response = self
            .send(self.client.get(url).query(&[("alt", "media")]))
            .await?;
        let bytes = response.bytes().await?.to_vec();

        Ok(Download { bytes, revision })
    }

    async fn update(
        &self,
        handle: &FileHandle,
        bytes: Vec<u8>,
        expected_revision: Option<&str>,
    ) -> Result<()> {
        if let Some(expected) = expected_revision {
            let current = self.current_version(handle).await?;
            if current.as_deref() != Some(expected) {
                return Err(StoreError::PreconditionFailed);
            }
        }

        let url = format!("{}/files/{}", self.upload_base, handle.id);
        tracing::debug!("Drive files.update {} ({} bytes)", handle.id, bytes.len());
        self.send(
            self.client
                .patch(url)
                .query(&[("uploadType", "media")])
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(bytes),
        )
        .await?;
        Ok(())
    }
}
