use async_trait::async_trait;

use super::types::{ApiResult, MergeUpstreamResponse};
use crate::repo::RepositoryRef;

/// Remote repository and ref primitives of the hosting provider.
///
/// Non-2xx responses come back as [`super::ApiError::Status`] rather than
/// being flattened into a message, so the sync engine can classify them.
#[async_trait]
pub trait HostingApi: Send + Sync {
    /// Login of the authenticated user on `host`.
    async fn current_login(&self, host: &str) -> ApiResult<String>;

    async fn default_branch(&self, repo: &RepositoryRef) -> ApiResult<String>;

    /// The repository `repo` was forked from, if it is a fork.
    async fn find_parent(&self, repo: &RepositoryRef) -> ApiResult<Option<RepositoryRef>>;

    /// `POST /repos/{repo}/merge-upstream`.
    async fn merge_upstream(
        &self,
        repo: &RepositoryRef,
        branch: &str,
    ) -> ApiResult<MergeUpstreamResponse>;

    /// Commit SHA at the tip of `branch`.
    async fn branch_head(&self, repo: &RepositoryRef, branch: &str) -> ApiResult<String>;

    /// `PATCH /repos/{repo}/git/refs/heads/{branch}`.
    async fn update_branch_ref(
        &self,
        repo: &RepositoryRef,
        branch: &str,
        sha: &str,
        force: bool,
    ) -> ApiResult<()>;
}
