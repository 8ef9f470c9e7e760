use super::{valid_segment, RepositoryRef};

/// Parse a git remote URL into a repository identity.
///
/// Accepts `https://`, `http://`, `git://`, `ssh://` and scp-like
/// `git@host:owner/repo` forms, with or without a trailing `.git`.
pub fn parse_git_url(url: &str) -> Option<RepositoryRef> {
    let url = url.trim().trim_end_matches('/');
    let url = url.strip_suffix(".git").unwrap_or(url);

    if let Some(rest) = url.strip_prefix("ssh://") {
        parse_with_scheme(rest)
    } else if let Some(rest) = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .or_else(|| url.strip_prefix("git://"))
    {
        parse_with_scheme(rest)
    } else if url.contains("://") {
        None
    } else {
        parse_scp_like(url)
    }
}

// host[:port]/owner/repo, host may carry a user@ prefix
fn parse_with_scheme(rest: &str) -> Option<RepositoryRef> {
    let (authority, path) = rest.split_once('/')?;
    let host = authority.rsplit('@').next()?;
    let host = host.split(':').next()?;

    repository_from_path(host, path)
}

// git@github.com:owner/repo
fn parse_scp_like(url: &str) -> Option<RepositoryRef> {
    let (authority, path) = url.split_once(':')?;
    let host = authority.rsplit('@').next()?;
    if host.is_empty() || host.contains('/') {
        return None;
    }

    repository_from_path(host, path)
}

fn repository_from_path(host: &str, path: &str) -> Option<RepositoryRef> {
    if host.is_empty() {
        return None;
    }

    let parts: Vec<&str> = path.trim_start_matches('/').split('/').collect();
    match parts.as_slice() {
        [owner, name] if valid_segment(owner) && valid_segment(name) => {
            Some(RepositoryRef::new(host, owner, name))
        }
        _ => None,
    }
}
