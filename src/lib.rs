pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(test)]
pub(crate) mod test_support;

#[cfg(feature = "cli")]
pub use config::cli::Cli;

pub use app::{build_router, build_store};
pub use config::AppConfig;
pub use core::store::{FileLocation, SubmissionStore, WriteMode};
pub use domain::model::Record;
pub use utils::error::{ErrorKind, Result, StoreError};
