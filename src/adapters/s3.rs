#[cfg(feature = "lambda")]
use crate::core::{Download, FileHandle, FileStore};
#[cfg(feature = "lambda")]
use crate::utils::error::{Result, StoreError};
#[cfg(feature = "lambda")]
use async_trait::async_trait;
#[cfg(feature = "lambda")]
use aws_sdk_s3::primitives::ByteStream;
#[cfg(feature = "lambda")]
use aws_sdk_s3::Client as S3Client;

/// Data file as an object in one bucket. The "folder id" is the key prefix.
#[cfg(feature = "lambda")]
#[derive(Debug, Clone)]
pub struct S3Store {
    client: S3Client,
    bucket: String,
}

#[cfg(feature = "lambda")]
impl S3Store {
    pub fn new(client: S3Client, bucket: String) -> Self {
        Self { client, bucket }
    }
}

#[cfg(feature = "lambda")]
fn object_key(parent: &str, name: &str) -> String {
    let prefix = parent.trim_matches('/');
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", prefix, name)
    }
}

#[cfg(feature = "lambda")]
fn s3_error(e: impl std::fmt::Display) -> StoreError {
    StoreError::Remote {
        status: 0,
        body: format!("S3: {}", e),
    }
}

#[cfg(feature = "lambda")]
#[async_trait]
impl FileStore for S3Store {
    fn service_name(&self) -> &str {
        "S3"
    }

    async fn locate(&self, name: &str, parent: &str) -> Result<FileHandle> {
        let key = object_key(parent, name);
        match self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(&key)
            .send()
            .await
        {
            Ok(_) => Ok(FileHandle::new(key)),
            Err(err) => match err.into_service_error() {
                e if e.is_not_found() => Err(StoreError::not_found(name, self.service_name())),
                e => Err(s3_error(e)),
            },
        }
    }

    // The ETag rides along on the same response, so it is always returned.
    async fn download(&self, handle: &FileHandle, _with_revision: bool) -> Result<Download> {
        let resp = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(&handle.id)
            .send()
            .await
            .map_err(|e| s3_error(e.into_service_error()))?;

        let revision = resp.e_tag().map(str::to_string);
        let data = resp.body.collect().await.map_err(s3_error)?;

        Ok(Download {
            bytes: data.into_bytes().to_vec(),
            revision,
        })
    }

    async fn update(
        &self,
        handle: &FileHandle,
        bytes: Vec<u8>,
        expected_revision: Option<&str>,
    ) -> Result<()> {
        let mut request = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(&handle.id)
            .content_type("application/json")
            .body(ByteStream::from(bytes));
        if let Some(etag) = expected_revision {
            request = request.if_match(etag);
        }

        match request.send().await {
            Ok(_) => Ok(()),
            Err(err) => {
                let status = err.raw_response().map(|r| r.status().as_u16());
                if status == Some(412) {
                    Err(StoreError::PreconditionFailed)
                } else {
                    Err(s3_error(err.into_service_error()))
                }
            }
        }
    }
}
