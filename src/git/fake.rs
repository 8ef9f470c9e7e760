use std::cell::RefCell;
use std::collections::VecDeque;

use super::{GitClient, GitError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GitCall {
    Fetch { remote: String, refspec: String },
    HasLocalBranch(String),
    CurrentBranch,
    BranchRemote(String),
    IsAncestor { ancestor: String, reference: String },
    IsDirty,
    MergeFastForward(String),
    ResetHard(String),
    UpdateBranch { name: String, reference: String },
    CreateBranch { name: String, reference: String, remote: String },
}

impl GitCall {
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            GitCall::MergeFastForward(_)
                | GitCall::ResetHard(_)
                | GitCall::UpdateBranch { .. }
                | GitCall::CreateBranch { .. }
        )
    }
}

#[derive(Debug, Clone)]
pub enum Reply {
    Ok,
    Bool(bool),
    Branch(Option<String>),
    Fail(String),
}

/// Git client that answers from an ordered expectation list.
///
/// Each call must match the next expectation exactly, otherwise the test panics.
#[derive(Default)]
pub struct FakeGit {
    expected: RefCell<VecDeque<(GitCall, Reply)>>,
    calls: RefCell<Vec<GitCall>>,
}

impl FakeGit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn expect(self, call: GitCall, reply: Reply) -> Self {
        self.expected.borrow_mut().push_back((call, reply));
        self
    }

    pub fn calls(&self) -> Vec<GitCall> {
        self.calls.borrow().clone()
    }

    pub fn mutations(&self) -> Vec<GitCall> {
        self.calls().into_iter().filter(GitCall::is_mutation).collect()
    }

    pub fn assert_done(&self) {
        let remaining = self.expected.borrow();
        assert!(
            remaining.is_empty(),
            "expected git calls never made: {:?}",
            remaining.iter().map(|(c, _)| c).collect::<Vec<_>>()
        );
    }

    fn answer(&self, call: GitCall) -> Reply {
        self.calls.borrow_mut().push(call.clone());
        let (expected, reply) = self
            .expected
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| panic!("unexpected git call: {:?}", call));
        assert_eq!(expected, call, "git call out of order");
        reply
    }

    fn unit(&self, call: GitCall) -> Result<(), GitError> {
        match self.answer(call) {
            Reply::Fail(stderr) => Err(failure(stderr)),
            _ => Ok(()),
        }
    }

    fn boolean(&self, call: GitCall) -> Result<bool, GitError> {
        match self.answer(call) {
            Reply::Bool(value) => Ok(value),
            Reply::Fail(stderr) => Err(failure(stderr)),
            other => panic!("expected a boolean reply, got {:?}", other),
        }
    }
}

fn failure(stderr: String) -> GitError {
    GitError::Command {
        command: "fake".to_string(),
        stderr,
    }
}

impl GitClient for FakeGit {
    fn fetch(&self, remote: &str, refspec: &str) -> Result<(), GitError> {
        self.unit(GitCall::Fetch {
            remote: remote.to_string(),
            refspec: refspec.to_string(),
        })
    }

    fn has_local_branch(&self, name: &str) -> bool {
        match self.answer(GitCall::HasLocalBranch(name.to_string())) {
            Reply::Bool(value) => value,
            other => panic!("expected a boolean reply, got {:?}", other),
        }
    }

    fn current_branch(&self) -> Result<Option<String>, GitError> {
        match self.answer(GitCall::CurrentBranch) {
            Reply::Branch(branch) => Ok(branch),
            Reply::Fail(stderr) => Err(failure(stderr)),
            other => panic!("expected a branch reply, got {:?}", other),
        }
    }

    fn branch_remote(&self, name: &str) -> Result<Option<String>, GitError> {
        match self.answer(GitCall::BranchRemote(name.to_string())) {
            Reply::Branch(remote) => Ok(remote),
            Reply::Fail(stderr) => Err(failure(stderr)),
            other => panic!("expected a remote reply, got {:?}", other),
        }
    }

    fn is_ancestor(&self, ancestor: &str, reference: &str) -> Result<bool, GitError> {
        self.boolean(GitCall::IsAncestor {
            ancestor: ancestor.to_string(),
            reference: reference.to_string(),
        })
    }

    fn is_dirty(&self) -> Result<bool, GitError> {
        self.boolean(GitCall::IsDirty)
    }

    fn merge_fast_forward(&self, reference: &str) -> Result<(), GitError> {
        self.unit(GitCall::MergeFastForward(reference.to_string()))
    }

    fn reset_hard(&self, reference: &str) -> Result<(), GitError> {
        self.unit(GitCall::ResetHard(reference.to_string()))
    }

    fn update_branch(&self, name: &str, reference: &str) -> Result<(), GitError> {
        self.unit(GitCall::UpdateBranch {
            name: name.to_string(),
            reference: reference.to_string(),
        })
    }

    fn create_branch(
        &self,
        name: &str,
        reference: &str,
        remote: &str,
    ) -> Result<(), GitError> {
        self.unit(GitCall::CreateBranch {
            name: name.to_string(),
            reference: reference.to_string(),
            remote: remote.to_string(),
        })
    }
}
