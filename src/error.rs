use thiserror::Error;

use crate::git::GitError;

/// Every variant's `Display` is the final text shown to the user, so callers
/// print it as-is.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("could not determine the base repository: no git remote of this checkout points to {host}")]
    NoBaseRemote { host: String },

    #[error("can't determine source repository for {repo} because repository is not fork")]
    NotAFork { repo: String },

    #[error("{branch} branch does not exist on {repo} repository")]
    BranchNotFound { branch: String, repo: String },

    #[error("can't sync because there are diverging changes; use `--force` to overwrite the destination branch")]
    DivergedHistory,

    #[error("can't sync because there are local changes; please stash them before trying again")]
    DirtyWorkingTree,

    #[error("Upstream commits contain workflow changes, which require the `workflow` scope to merge. To request it, run: gh auth refresh -s workflow")]
    InsufficientScope,

    #[error("can't find corresponding remote for {repo}")]
    MissingRemote { repo: String },

    #[error("can't sync because {branch} is not tracking {repo}")]
    MismatchedRemote { branch: String, repo: String },

    #[error("can't sync repositories from different hosts")]
    DifferentHosts,

    #[error("expected the \"[HOST/]OWNER/REPO\" format, got \"{0}\"")]
    InvalidRepository(String),

    #[error("HTTP {status}: {message}")]
    Http {
        status: u16,
        message: String,
        body: String,
    },

    #[error("{0}")]
    Network(String),

    #[error(transparent)]
    Git(#[from] GitError),
}

/// Kind of failure, independent of which executor produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NoBaseRemote,
    NotAFork,
    BranchNotFound,
    DivergedHistory,
    DirtyWorkingTree,
    InsufficientScope,
    /// Arguments or local remotes don't describe a syncable pair.
    Resolution,
    /// Git and HTTP failures the engine does not interpret.
    Transport,
}

impl SyncError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SyncError::NoBaseRemote { .. } => ErrorKind::NoBaseRemote,
            SyncError::NotAFork { .. } => ErrorKind::NotAFork,
            SyncError::BranchNotFound { .. } => ErrorKind::BranchNotFound,
            SyncError::DivergedHistory => ErrorKind::DivergedHistory,
            SyncError::DirtyWorkingTree => ErrorKind::DirtyWorkingTree,
            SyncError::InsufficientScope => ErrorKind::InsufficientScope,
            SyncError::MissingRemote { .. }
            | SyncError::MismatchedRemote { .. }
            | SyncError::DifferentHosts
            | SyncError::InvalidRepository(_) => ErrorKind::Resolution,
            SyncError::Http { .. } | SyncError::Network(_) | SyncError::Git(_) => {
                ErrorKind::Transport
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, SyncError>;
