use super::branch::resolve_branch;
use super::classify::{classify_ref, is_fast_forward_conflict, is_missing_workflow_scope};
use super::resolve::resolve_remote_source;
use super::{Performed, SyncOutcome, SyncRequest};
use crate::error::{Result, SyncError};
use crate::github::{ApiError, HostingApi, MergeUpstreamResponse};
use crate::repo::RepositoryRef;

/// Sync a branch of a hosted fork. `merge-upstream` is tried first; when it
/// refuses, the destination ref is patched to the source branch's head.
pub async fn sync_remote(
    api: &dyn HostingApi,
    dest: &RepositoryRef,
    request: &SyncRequest,
) -> Result<SyncOutcome> {
    let source = resolve_remote_source(dest, request.source.as_ref(), api).await?;
    let branch = resolve_branch(request.branch.as_deref(), &source, api).await?;

    tracing::info!("Syncing {}:{} from {}", dest, branch, source);

    match api.merge_upstream(dest, &branch).await {
        Ok(response) => return Ok(server_merge_outcome(dest, &source, &branch, response)),
        Err(ApiError::Status(failure)) if matches!(failure.status, 409 | 422) => {
            if is_missing_workflow_scope(&failure) {
                return Err(SyncError::InsufficientScope);
            }

            let conflict = failure.status == 409 || is_fast_forward_conflict(&failure);
            if conflict && !request.force {
                return Err(SyncError::DivergedHistory);
            }

            tracing::info!(
                "merge-upstream refused for {} ({}); updating the ref directly",
                dest,
                failure.message
            );
        }
        Err(err) => return Err(classify_ref(err, &branch, dest)),
    }

    manual_patch(api, dest, &source, &branch, request.force).await
}

fn server_merge_outcome(
    dest: &RepositoryRef,
    source: &RepositoryRef,
    branch: &str,
    response: MergeUpstreamResponse,
) -> SyncOutcome {
    tracing::debug!(
        "merge-upstream: {} (merge_type={})",
        response.message,
        response.merge_type
    );

    let base_branch = if response.base_branch.is_empty() {
        format!("{}:{}", source.owner, branch)
    } else {
        response.base_branch
    };

    let branch = match base_branch.split_once(':') {
        Some((_, name)) if !name.is_empty() => name.to_string(),
        _ => branch.to_string(),
    };

    SyncOutcome {
        branch,
        source_label: base_branch,
        dest_label: dest.owner.clone(),
        performed: Performed::ServerMerge,
    }
}

async fn manual_patch(
    api: &dyn HostingApi,
    dest: &RepositoryRef,
    source: &RepositoryRef,
    branch: &str,
    force: bool,
) -> Result<SyncOutcome> {
    let sha = match api.branch_head(source, branch).await {
        Ok(sha) => sha,
        Err(ApiError::Status(failure)) if failure.status == 404 => {
            return Err(SyncError::BranchNotFound {
                branch: branch.to_string(),
                repo: source.full_name(),
            });
        }
        Err(err) => return Err(classify_ref(err, branch, source)),
    };

    tracing::debug!("Moving {}:{} to {} (force={})", dest, branch, sha, force);

    api.update_branch_ref(dest, branch, &sha, force)
        .await
        .map_err(|err| classify_ref(err, branch, dest))?;

    Ok(SyncOutcome {
        branch: branch.to_string(),
        source_label: format!("{}:{}", source.owner, branch),
        dest_label: dest.owner.clone(),
        performed: Performed::ManualPatch,
    })
}
