pub mod app;
pub mod error;
pub mod git;
pub mod github;
pub mod repo;
pub mod sync;

pub use error::{ErrorKind, Result, SyncError};
