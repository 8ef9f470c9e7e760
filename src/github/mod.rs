mod api;
mod client;
#[cfg(test)]
pub mod fake;
mod types;

pub use api::HostingApi;
pub use client::GitHubClient;
pub use types::{ApiError, ApiResult, HttpFailure, MergeUpstreamResponse};
