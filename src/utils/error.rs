use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("{name} not found in {service}")]
    NotFound { name: String, service: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Storage service returned {status}: {body}")]
    Remote { status: u16, body: String },

    #[error("Invalid JSON in data file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Authentication failed: {message}")]
    Auth { message: String },

    #[error("Data file changed since it was read")]
    PreconditionFailed,

    #[error("Gave up after {attempts} conflicting writes")]
    Conflict { attempts: u32 },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },
}

/// Flat classification callers can branch on without matching every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Storage,
}

impl StoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StoreError::NotFound { .. } => ErrorKind::NotFound,
            _ => ErrorKind::Storage,
        }
    }

    pub fn not_found(name: impl Into<String>, service: impl Into<String>) -> Self {
        StoreError::NotFound {
            name: name.into(),
            service: service.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        StoreError::Config {
            message: message.into(),
        }
    }
}

impl From<jsonwebtoken::errors::Error> for StoreError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        StoreError::Auth {
            message: e.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
