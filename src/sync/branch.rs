use super::classify::classify;
use crate::error::Result;
use crate::github::HostingApi;
use crate::repo::RepositoryRef;

/// Branch to sync: the one asked for, else the source repository's default.
///
/// The default always comes from the hosted source repository, never from the
/// local checkout's HEAD.
pub async fn resolve_branch(
    explicit: Option<&str>,
    source: &RepositoryRef,
    api: &dyn HostingApi,
) -> Result<String> {
    if let Some(branch) = explicit.filter(|b| !b.is_empty()) {
        return Ok(branch.to_string());
    }

    let branch = api.default_branch(source).await.map_err(classify)?;
    tracing::debug!("Default branch of {} is '{}'", source, branch);
    Ok(branch)
}
