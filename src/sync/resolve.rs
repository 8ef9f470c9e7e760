use super::classify::classify;
use super::{Destination, SyncRequest};
use crate::error::{Result, SyncError};
use crate::git::Remote;
use crate::github::HostingApi;
use crate::repo::{parse_git_url, valid_segment, RepositoryRef};

/// Read-only query for the remotes of the current checkout.
pub type RemoteLookup<'a> = &'a dyn Fn() -> Result<Vec<Remote>>;

/// Remote names tried, in order, when no remote is marked as the base.
const REMOTE_PRIORITY: [&str; 3] = ["upstream", "github", "origin"];

/// Options as given on the command line, before any resolution.
#[derive(Debug, Clone, Default)]
pub struct SyncArgs {
    pub destination: Option<String>,
    pub source: Option<String>,
    pub branch: Option<String>,
    pub force: bool,
}

pub async fn build_request(
    args: &SyncArgs,
    host: &str,
    api: &dyn HostingApi,
) -> Result<SyncRequest> {
    let destination = match non_empty(&args.destination) {
        None => Destination::LocalCheckout,
        Some(arg) => Destination::Repository(parse_repository_arg(arg, host, api).await?),
    };

    let source = match non_empty(&args.source) {
        None => None,
        Some(arg) => Some(parse_repository_arg(arg, host, api).await?),
    };

    Ok(SyncRequest {
        destination,
        source,
        branch: non_empty(&args.branch).map(String::from),
        force: args.force,
    })
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Accepts `REPO`, `OWNER/REPO`, `HOST/OWNER/REPO` or a git URL.
///
/// A bare `REPO` belongs to the authenticated user.
pub async fn parse_repository_arg(
    arg: &str,
    host: &str,
    api: &dyn HostingApi,
) -> Result<RepositoryRef> {
    if arg.contains("://") || arg.starts_with("git@") {
        return parse_git_url(arg).ok_or_else(|| SyncError::InvalidRepository(arg.to_string()));
    }

    if !arg.contains('/') {
        if !valid_segment(arg) {
            return Err(SyncError::InvalidRepository(arg.to_string()));
        }
        let owner = api.current_login(host).await.map_err(classify)?;
        tracing::debug!("Resolved bare repository '{}' to owner '{}'", arg, owner);
        return Ok(RepositoryRef::new(host, &owner, arg));
    }

    RepositoryRef::from_full_name(arg, host)
        .ok_or_else(|| SyncError::InvalidRepository(arg.to_string()))
}

/// Base repository of a checkout and the remote it is fetched through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseRemote {
    pub name: String,
    pub repo: RepositoryRef,
}

impl BaseRemote {
    fn of(remote: &Remote, repo: RepositoryRef) -> Self {
        Self {
            name: remote.name.clone(),
            repo,
        }
    }
}

/// The base repository of a checkout.
///
/// A remote marked `gh-resolved = base` wins, then a marker naming
/// `OWNER/REPO` directly, then the first remote on `host` by name priority.
/// A marker naming a repository keeps its remote even when the remote URL
/// still points at an older name.
pub fn select_base_remote(remotes: &[Remote], host: &str) -> Option<BaseRemote> {
    if let Some(remote) = remotes
        .iter()
        .find(|r| r.resolved.as_deref() == Some("base"))
    {
        return Some(BaseRemote::of(remote, remote.repo.clone()));
    }

    if let Some(base) = remotes.iter().find_map(|r| {
        r.resolved
            .as_deref()
            .and_then(|value| RepositoryRef::from_full_name(value, &r.repo.host))
            .map(|repo| BaseRemote::of(r, repo))
    }) {
        return Some(base);
    }

    let mut candidates: Vec<&Remote> = remotes
        .iter()
        .filter(|r| r.repo.host.eq_ignore_ascii_case(host))
        .collect();
    candidates.sort_by(|a, b| {
        remote_rank(&a.name)
            .cmp(&remote_rank(&b.name))
            .then_with(|| a.name.cmp(&b.name))
    });

    candidates
        .first()
        .map(|r| BaseRemote::of(r, r.repo.clone()))
}

fn remote_rank(name: &str) -> usize {
    REMOTE_PRIORITY
        .iter()
        .position(|p| *p == name)
        .unwrap_or(REMOTE_PRIORITY.len())
}

/// Where a local sync fetches from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalTarget {
    /// Base repository of the checkout.
    pub base: RepositoryRef,
    pub source: RepositoryRef,
    /// Local remote whose repository is `source`.
    pub remote_name: String,
}

pub fn resolve_local(
    explicit_source: Option<&RepositoryRef>,
    remotes: &[Remote],
    host: &str,
) -> Result<LocalTarget> {
    let base = select_base_remote(remotes, host).ok_or_else(|| SyncError::NoBaseRemote {
        host: host.to_string(),
    })?;

    let source = explicit_source
        .cloned()
        .unwrap_or_else(|| base.repo.clone());

    let remote_name = if source == base.repo {
        base.name
    } else {
        remotes
            .iter()
            .find(|r| r.repo == source)
            .map(|r| r.name.clone())
            .ok_or_else(|| SyncError::MissingRemote {
                repo: source.full_name(),
            })?
    };

    Ok(LocalTarget {
        base: base.repo,
        source,
        remote_name,
    })
}

/// Source of a sync between hosted repositories: explicit, or the fork parent.
pub async fn resolve_remote_source(
    dest: &RepositoryRef,
    explicit_source: Option<&RepositoryRef>,
    api: &dyn HostingApi,
) -> Result<RepositoryRef> {
    if let Some(source) = explicit_source {
        if !source.is_same_host(dest) {
            return Err(SyncError::DifferentHosts);
        }
        return Ok(source.clone());
    }

    let parent = api.find_parent(dest).await.map_err(classify)?;
    parent.ok_or_else(|| SyncError::NotAFork {
        repo: dest.full_name(),
    })
}
