pub mod command;
#[cfg(test)]
pub mod fake;
pub mod remote;

pub use command::CommandGitClient;
pub use remote::{list_remotes, Remote};

use thiserror::Error;

/// Ref written by `git fetch`, the target of every local sync mutation.
pub const FETCH_HEAD: &str = "FETCH_HEAD";

#[derive(Debug, Error)]
pub enum GitError {
    #[error("git {command} failed: {stderr}")]
    Command { command: String, stderr: String },

    #[error("failed to run git: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("git error: {0}")]
    Repository(#[from] git2::Error),
}

/// Local repository primitives used by the local sync executor.
///
/// Every method blocks until the underlying git operation finishes.
pub trait GitClient {
    fn fetch(&self, remote: &str, refspec: &str) -> Result<(), GitError>;

    fn has_local_branch(&self, name: &str) -> bool;

    /// `None` when HEAD is detached.
    fn current_branch(&self) -> Result<Option<String>, GitError>;

    /// Remote configured as the upstream of a local branch, if any.
    fn branch_remote(&self, name: &str) -> Result<Option<String>, GitError>;

    fn is_ancestor(&self, ancestor: &str, reference: &str) -> Result<bool, GitError>;

    /// Uncommitted changes to tracked files. Untracked files are ignored.
    fn is_dirty(&self) -> Result<bool, GitError>;

    fn merge_fast_forward(&self, reference: &str) -> Result<(), GitError>;

    fn reset_hard(&self, reference: &str) -> Result<(), GitError>;

    /// Move a branch that is not checked out without touching the working tree.
    fn update_branch(&self, name: &str, reference: &str) -> Result<(), GitError>;

    /// Create a branch at `reference` that tracks the same-named branch of `remote`.
    fn create_branch(&self, name: &str, reference: &str, remote: &str)
        -> Result<(), GitError>;
}
