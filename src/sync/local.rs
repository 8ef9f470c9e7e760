use super::branch::resolve_branch;
use super::resolve::{resolve_local, RemoteLookup};
use super::{Performed, SyncOutcome, SyncRequest, LOCAL_LABEL};
use crate::error::{Result, SyncError};
use crate::git::{GitClient, FETCH_HEAD};
use crate::github::HostingApi;
use crate::repo::RepositoryRef;

/// Sync a branch of the current checkout from one of its remotes.
///
/// Fetch is the only network step. The single ref mutation is always the last
/// git call, so a failed run can simply be repeated.
pub async fn sync_local(
    git: &dyn GitClient,
    api: &dyn HostingApi,
    remotes: RemoteLookup<'_>,
    host: &str,
    request: &SyncRequest,
) -> Result<SyncOutcome> {
    let remotes = remotes()?;
    let target = resolve_local(request.source.as_ref(), &remotes, host)?;
    let branch = resolve_branch(request.branch.as_deref(), &target.source, api).await?;

    tracing::info!(
        "Syncing '{}' of the {} checkout from {} via remote '{}'",
        branch,
        target.base,
        target.source,
        target.remote_name
    );

    git.fetch(&target.remote_name, &format!("refs/heads/{}", branch))?;
    let performed = apply(git, &branch, &target.remote_name, &target.source, request.force)?;

    tracing::info!("Local sync of '{}' finished: {:?}", branch, performed);

    Ok(SyncOutcome {
        branch,
        source_label: target.source.full_name(),
        dest_label: LOCAL_LABEL.to_string(),
        performed,
    })
}

/// Move `branch` to the freshly fetched `FETCH_HEAD`.
pub fn apply(
    git: &dyn GitClient,
    branch: &str,
    remote: &str,
    source: &RepositoryRef,
    force: bool,
) -> Result<Performed> {
    let has_local_branch = git.has_local_branch(branch);
    let mut force = force;

    if has_local_branch {
        if let Some(tracking) = git.branch_remote(branch)? {
            if tracking != remote {
                return Err(SyncError::MismatchedRemote {
                    branch: branch.to_string(),
                    repo: source.full_name(),
                });
            }
        }

        let fast_forward = git.is_ancestor(branch, FETCH_HEAD)?;
        if !fast_forward && !force {
            return Err(SyncError::DivergedHistory);
        }
        if fast_forward {
            // nothing to overwrite
            force = false;
        }
    }

    let current = git.current_branch()?;

    if current.as_deref() == Some(branch) {
        if git.is_dirty()? {
            return Err(SyncError::DirtyWorkingTree);
        }

        if force {
            tracing::debug!("Resetting '{}' to {}", branch, FETCH_HEAD);
            git.reset_hard(FETCH_HEAD)?;
            Ok(Performed::Reset)
        } else {
            git.merge_fast_forward(FETCH_HEAD)?;
            Ok(Performed::FastForward)
        }
    } else if has_local_branch {
        // update-ref moves the branch whether or not it has diverged
        git.update_branch(branch, FETCH_HEAD)?;
        Ok(Performed::UpdatedNonCurrent)
    } else {
        git.create_branch(branch, FETCH_HEAD, remote)?;
        Ok(Performed::Created)
    }
}
