mod url;

pub use url::parse_git_url;

use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_HOST: &str = "github.com";

/// Identity of a hosted repository.
///
/// Equality ignores ASCII case on all three fields, matching how the hosting
/// provider treats owner and repository names.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryRef {
    pub host: String,
    pub owner: String,
    pub name: String,
}

impl RepositoryRef {
    pub fn new(host: &str, owner: &str, name: &str) -> Self {
        Self {
            host: normalize_host(host),
            owner: owner.to_string(),
            name: name.to_string(),
        }
    }

    /// `OWNER/REPO`, the label used in user-facing messages.
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }

    /// Parse `OWNER/REPO` or `HOST/OWNER/REPO`.
    pub fn from_full_name(value: &str, default_host: &str) -> Option<Self> {
        let parts: Vec<&str> = value.split('/').collect();
        match parts.as_slice() {
            [owner, name] if valid_segment(owner) && valid_segment(name) => {
                Some(Self::new(default_host, owner, name))
            }
            [host, owner, name]
                if !host.is_empty() && valid_segment(owner) && valid_segment(name) =>
            {
                Some(Self::new(host, owner, name))
            }
            _ => None,
        }
    }

    pub fn is_same_host(&self, other: &RepositoryRef) -> bool {
        self.host.eq_ignore_ascii_case(&other.host)
    }
}

impl PartialEq for RepositoryRef {
    fn eq(&self, other: &Self) -> bool {
        self.is_same_host(other)
            && self.owner.eq_ignore_ascii_case(&other.owner)
            && self.name.eq_ignore_ascii_case(&other.name)
    }
}

impl Eq for RepositoryRef {}

impl fmt::Display for RepositoryRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

pub(crate) fn valid_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

fn normalize_host(host: &str) -> String {
    let host = host.to_lowercase();
    let host = host.strip_prefix("www.").unwrap_or(&host);
    if host == "ssh.github.com" {
        DEFAULT_HOST.to_string()
    } else {
        host.to_string()
    }
}
