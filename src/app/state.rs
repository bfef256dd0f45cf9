use crate::adapters::{DriveStore, LocalStore, ServiceAccountAuth};
use crate::config::{AppConfig, Backend};
use crate::core::store::SubmissionStore;
use crate::core::FileStore;
use crate::utils::error::{Result, StoreError};
use std::sync::Arc;
use std::time::Duration;

/// Builds the long-lived storage client once; the result is shared by every
/// request for the life of the process.
pub async fn build_store(config: &AppConfig) -> Result<SubmissionStore> {
    let backend = build_backend(config).await?;
    tracing::info!(
        "Using {} for {}/{} ({:?} writes)",
        backend.service_name(),
        config.folder_id,
        config.file_name,
        config.write_mode
    );
    Ok(SubmissionStore::new(backend, config.location())
        .with_write_mode(config.write_mode, config.max_attempts))
}

async fn build_backend(config: &AppConfig) -> Result<Arc<dyn FileStore>> {
    match config.backend {
        Backend::Drive => {
            let client = reqwest::Client::builder()
                .timeout(Duration::from_secs(config.request_timeout_secs))
                .build()?;
            let auth = ServiceAccountAuth::from_file(&config.credentials_path, client.clone())?;
            let drive = DriveStore::new(client, Arc::new(auth))
                .with_endpoints(&config.drive_api_base, &config.drive_upload_base);
            Ok(Arc::new(drive))
        }
        // Folder ids are directories relative to the working directory.
        Backend::Local => Ok(Arc::new(LocalStore::new("."))),
        Backend::S3 => build_s3(config).await,
    }
}

#[cfg(feature = "lambda")]
async fn build_s3(config: &AppConfig) -> Result<Arc<dyn FileStore>> {
    use aws_config::BehaviorVersion;
    use aws_sdk_s3::config::Region;

    let bucket = config
        .s3_bucket
        .clone()
        .ok_or_else(|| StoreError::config("s3_bucket is required for the s3 backend"))?;
    let shared = aws_config::load_defaults(BehaviorVersion::latest()).await;
    let s3_config = aws_sdk_s3::config::Builder::from(&shared)
        .region(Region::new(config.s3_region.clone()))
        .build();
    let client = aws_sdk_s3::Client::from_conf(s3_config);
    Ok(Arc::new(crate::adapters::S3Store::new(client, bucket)))
}

#[cfg(not(feature = "lambda"))]
async fn build_s3(_config: &AppConfig) -> Result<Arc<dyn FileStore>> {
    Err(StoreError::config(
        "the s3 backend needs a build with the `lambda` feature",
    ))
}
