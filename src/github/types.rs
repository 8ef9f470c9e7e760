use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Deserialize)]
pub struct RepositoryResponse {
    pub default_branch: String,
    #[serde(default)]
    pub parent: Option<ParentRepository>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ParentRepository {
    pub name: String,
    pub owner: OwnerResponse,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OwnerResponse {
    pub login: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserResponse {
    pub login: String,
}

#[derive(Debug, Serialize)]
pub struct MergeUpstreamRequest<'a> {
    pub branch: &'a str,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct MergeUpstreamResponse {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub merge_type: String,
    /// `OWNER:branch` of the upstream branch that was merged.
    #[serde(default)]
    pub base_branch: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RefResponse {
    pub object: RefObject,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RefObject {
    pub sha: String,
}

#[derive(Debug, Serialize)]
pub struct UpdateRefRequest<'a> {
    pub sha: &'a str,
    pub force: bool,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    errors: Vec<serde_json::Value>,
}

/// A non-2xx response, kept structured so callers can classify it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpFailure {
    pub status: u16,
    /// `message` from the error body joined with any entries of `errors`.
    pub message: String,
    pub body: String,
}

impl HttpFailure {
    pub fn from_body(status: u16, body: &str) -> Self {
        let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();

        let mut messages = Vec::new();
        if !parsed.message.is_empty() {
            messages.push(parsed.message);
        }
        for error in parsed.errors {
            match error {
                serde_json::Value::String(s) => messages.push(s),
                serde_json::Value::Object(map) => {
                    if let Some(serde_json::Value::String(s)) = map.get("message") {
                        messages.push(s.clone());
                    }
                }
                _ => {}
            }
        }

        let message = if messages.is_empty() {
            body.trim().to_string()
        } else {
            messages.join("; ")
        };

        Self {
            status,
            message,
            body: body.to_string(),
        }
    }

    pub fn mentions(&self, needle: &str) -> bool {
        self.message.contains(needle) || self.body.contains(needle)
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP {}: {}", .0.status, .0.message)]
    Status(HttpFailure),

    #[error("{0}")]
    Transport(String),

    #[error("failed to decode API response: {0}")]
    Decode(String),
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;
