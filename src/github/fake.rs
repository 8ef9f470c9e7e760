use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

use super::api::HostingApi;
use super::types::{ApiError, ApiResult, HttpFailure, MergeUpstreamResponse};
use crate::repo::RepositoryRef;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    CurrentLogin(String),
    DefaultBranch(String),
    FindParent(String),
    MergeUpstream { repo: String, branch: String },
    BranchHead { repo: String, branch: String },
    UpdateRef { repo: String, branch: String, sha: String, force: bool },
}

#[derive(Debug, Clone)]
pub enum ApiReply {
    Login(String),
    Branch(String),
    Parent(Option<RepositoryRef>),
    Merged(MergeUpstreamResponse),
    Sha(String),
    Done,
    Fail { status: u16, body: String },
    Transport(String),
}

impl ApiReply {
    pub fn fail(status: u16, body: &str) -> Self {
        ApiReply::Fail {
            status,
            body: body.to_string(),
        }
    }

    pub fn merged(base_branch: &str) -> Self {
        ApiReply::Merged(MergeUpstreamResponse {
            message: "Successfully fetched and fast-forwarded from upstream".to_string(),
            merge_type: "fast-forward".to_string(),
            base_branch: base_branch.to_string(),
        })
    }
}

/// Hosting API that answers from an ordered expectation list.
#[derive(Default)]
pub struct FakeApi {
    expected: Mutex<VecDeque<(ApiCall, ApiReply)>>,
    calls: Mutex<Vec<ApiCall>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn expect(self, call: ApiCall, reply: ApiReply) -> Self {
        self.expected.lock().unwrap().push_back((call, reply));
        self
    }

    pub fn calls(&self) -> Vec<ApiCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn assert_done(&self) {
        let remaining = self.expected.lock().unwrap();
        assert!(
            remaining.is_empty(),
            "expected API calls never made: {:?}",
            remaining.iter().map(|(c, _)| c).collect::<Vec<_>>()
        );
    }

    fn answer(&self, call: ApiCall) -> ApiResult<ApiReply> {
        self.calls.lock().unwrap().push(call.clone());
        let (expected, reply) = self
            .expected
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("unexpected API call: {:?}", call));
        assert_eq!(expected, call, "API call out of order");

        match reply {
            ApiReply::Fail { status, body } => {
                Err(ApiError::Status(HttpFailure::from_body(status, &body)))
            }
            ApiReply::Transport(message) => Err(ApiError::Transport(message)),
            other => Ok(other),
        }
    }
}

#[async_trait]
impl HostingApi for FakeApi {
    async fn current_login(&self, host: &str) -> ApiResult<String> {
        match self.answer(ApiCall::CurrentLogin(host.to_string()))? {
            ApiReply::Login(login) => Ok(login),
            other => panic!("expected a login reply, got {:?}", other),
        }
    }

    async fn default_branch(&self, repo: &RepositoryRef) -> ApiResult<String> {
        match self.answer(ApiCall::DefaultBranch(repo.full_name()))? {
            ApiReply::Branch(branch) => Ok(branch),
            other => panic!("expected a branch reply, got {:?}", other),
        }
    }

    async fn find_parent(&self, repo: &RepositoryRef) -> ApiResult<Option<RepositoryRef>> {
        match self.answer(ApiCall::FindParent(repo.full_name()))? {
            ApiReply::Parent(parent) => Ok(parent),
            other => panic!("expected a parent reply, got {:?}", other),
        }
    }

    async fn merge_upstream(
        &self,
        repo: &RepositoryRef,
        branch: &str,
    ) -> ApiResult<MergeUpstreamResponse> {
        let call = ApiCall::MergeUpstream {
            repo: repo.full_name(),
            branch: branch.to_string(),
        };
        match self.answer(call)? {
            ApiReply::Merged(response) => Ok(response),
            other => panic!("expected a merge reply, got {:?}", other),
        }
    }

    async fn branch_head(&self, repo: &RepositoryRef, branch: &str) -> ApiResult<String> {
        let call = ApiCall::BranchHead {
            repo: repo.full_name(),
            branch: branch.to_string(),
        };
        match self.answer(call)? {
            ApiReply::Sha(sha) => Ok(sha),
            other => panic!("expected a sha reply, got {:?}", other),
        }
    }

    async fn update_branch_ref(
        &self,
        repo: &RepositoryRef,
        branch: &str,
        sha: &str,
        force: bool,
    ) -> ApiResult<()> {
        let call = ApiCall::UpdateRef {
            repo: repo.full_name(),
            branch: branch.to_string(),
            sha: sha.to_string(),
            force,
        };
        self.answer(call).map(|_| ())
    }
}
