// Adapters layer: concrete FileStore backends and their credentials.

pub mod auth;
pub mod drive;
pub mod local;
pub mod s3;

pub use auth::{ServiceAccountAuth, ServiceAccountKey, StaticToken};
pub use drive::DriveStore;
pub use local::LocalStore;

#[cfg(feature = "lambda")]
pub use s3::S3Store;
