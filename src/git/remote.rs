use git2::{ErrorCode, Repository};
use std::path::Path;

use super::GitError;
use crate::repo::{parse_git_url, RepositoryRef};

/// Config key marking which remote is the base repository, as in
/// `git config remote.upstream.gh-resolved base`.
pub const RESOLVED_KEY: &str = "gh-resolved";

/// A local git remote pointing at a hosted repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Remote {
    pub name: String,
    pub repo: RepositoryRef,
    /// Value of `remote.<name>.gh-resolved`: either `base` or `OWNER/REPO`.
    pub resolved: Option<String>,
}

impl Remote {
    pub fn new(name: &str, repo: RepositoryRef) -> Self {
        Self {
            name: name.to_string(),
            repo,
            resolved: None,
        }
    }

    pub fn with_resolved(mut self, resolved: &str) -> Self {
        self.resolved = Some(resolved.to_string());
        self
    }
}

/// List the remotes of the repository containing `repo_path`.
///
/// Remotes whose URL does not name a hosted repository are skipped. Nothing is
/// written to the repository.
pub fn list_remotes(repo_path: &Path) -> Result<Vec<Remote>, GitError> {
    let repo = Repository::discover(repo_path)?;
    let config = repo.config()?;
    let names = repo.remotes()?;

    let mut remotes = Vec::new();
    for name in names.iter().flatten() {
        let remote = match repo.find_remote(name) {
            Ok(r) => r,
            Err(e) => {
                tracing::debug!("Skipping remote '{}': {}", name, e);
                continue;
            }
        };

        let Some(repo_ref) = remote.url().and_then(parse_git_url) else {
            tracing::debug!("Remote '{}' does not point at a hosted repository", name);
            continue;
        };

        let resolved = match config.get_string(&format!("remote.{}.{}", name, RESOLVED_KEY)) {
            Ok(value) => Some(value),
            Err(e) if e.code() == ErrorCode::NotFound => None,
            Err(e) => return Err(e.into()),
        };

        remotes.push(Remote {
            name: name.to_string(),
            repo: repo_ref,
            resolved,
        });
    }

    Ok(remotes)
}
