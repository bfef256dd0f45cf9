#[cfg(feature = "cli")]
pub mod cli;

use crate::adapters::drive::{DEFAULT_API_BASE, DEFAULT_UPLOAD_BASE};
use crate::core::store::{FileLocation, WriteMode};
use crate::utils::error::{Result, StoreError};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    Drive,
    Local,
    S3,
}

impl FromStr for Backend {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "drive" => Ok(Backend::Drive),
            "local" => Ok(Backend::Local),
            "s3" => Ok(Backend::S3),
            other => Err(StoreError::config(format!("unknown backend: {}", other))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub backend: Backend,
    pub folder_id: String,
    pub file_name: String,
    pub credentials_path: String,
    pub drive_api_base: String,
    pub drive_upload_base: String,
    pub s3_bucket: Option<String>,
    pub s3_region: String,
    pub write_mode: WriteMode,
    pub max_attempts: u32,
    pub request_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend: Backend::Drive,
            folder_id: String::new(),
            file_name: "data.json".to_string(),
            credentials_path: "credentials.json".to_string(),
            drive_api_base: DEFAULT_API_BASE.to_string(),
            drive_upload_base: DEFAULT_UPLOAD_BASE.to_string(),
            s3_bucket: None,
            s3_region: "us-east-1".to_string(),
            write_mode: WriteMode::Overwrite,
            max_attempts: 3,
            request_timeout_secs: 30,
        }
    }
}

fn parse_var<T: FromStr>(key: &str, default: T) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw.parse().map_err(|e: T::Err| StoreError::InvalidConfigValue {
            field: key.to_string(),
            value: raw.clone(),
            reason: e.to_string(),
        }),
        Err(_) => Ok(default),
    }
}

impl AppConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            StoreError::config(format!(
                "Failed to read config file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| StoreError::config(format!("Failed to parse TOML config: {}", e)))
    }

    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            backend: parse_var("BIRTHDAYS_BACKEND", defaults.backend)?,
            folder_id: env::var("BIRTHDAYS_FOLDER_ID").map_err(|_| {
                StoreError::config("BIRTHDAYS_FOLDER_ID environment variable is required")
            })?,
            file_name: env::var("BIRTHDAYS_FILE_NAME").unwrap_or(defaults.file_name),
            credentials_path: env::var("BIRTHDAYS_CREDENTIALS")
                .unwrap_or(defaults.credentials_path),
            drive_api_base: env::var("BIRTHDAYS_DRIVE_API").unwrap_or(defaults.drive_api_base),
            drive_upload_base: env::var("BIRTHDAYS_DRIVE_UPLOAD_API")
                .unwrap_or(defaults.drive_upload_base),
            s3_bucket: env::var("BIRTHDAYS_S3_BUCKET").ok(),
            s3_region: env::var("BIRTHDAYS_S3_REGION").unwrap_or(defaults.s3_region),
            write_mode: parse_var("BIRTHDAYS_WRITE_MODE", defaults.write_mode)?,
            max_attempts: parse_var("BIRTHDAYS_MAX_ATTEMPTS", defaults.max_attempts)?,
            request_timeout_secs: parse_var(
                "BIRTHDAYS_REQUEST_TIMEOUT",
                defaults.request_timeout_secs,
            )?,
        })
    }

    pub fn location(&self) -> FileLocation {
        FileLocation {
            folder_id: self.folder_id.clone(),
            file_name: self.file_name.clone(),
        }
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_non_empty_string("folder_id", &self.folder_id)?;
        validation::validate_non_empty_string("file_name", &self.file_name)?;
        validation::validate_path("file_name", &self.file_name)?;
        validation::validate_range("max_attempts", self.max_attempts as usize, 1, 10)?;
        validation::validate_positive_number(
            "request_timeout_secs",
            self.request_timeout_secs as usize,
            1,
        )?;

        match self.backend {
            Backend::Drive => {
                validation::validate_url("drive_api_base", &self.drive_api_base)?;
                validation::validate_url("drive_upload_base", &self.drive_upload_base)?;
                validation::validate_path("credentials_path", &self.credentials_path)?;
            }
            Backend::Local => {}
            Backend::S3 => {
                let bucket = self.s3_bucket.as_deref().unwrap_or_default();
                validation::validate_non_empty_string("s3_bucket", bucket)?;
                validation::validate_non_empty_string("s3_region", &self.s3_region)?;
            }
        }

        tracing::debug!("Configuration validation passed");
        Ok(())
    }
}
