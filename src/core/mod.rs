pub mod store;

pub use crate::domain::model::{Download, FileHandle, Record, SubmissionForm};
pub use crate::domain::ports::{FileStore, TokenSource};
pub use crate::utils::error::Result;
