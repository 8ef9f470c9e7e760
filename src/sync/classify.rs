use regex::Regex;
use std::sync::LazyLock;

use crate::error::SyncError;
use crate::github::{ApiError, HttpFailure};
use crate::repo::RepositoryRef;

pub const NOT_FAST_FORWARD: &str = "Update is not a fast forward";
pub const REFERENCE_MISSING: &str = "Reference does not exist";

static WORKFLOW_SCOPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"refusing to allow.*without `workflow` scope").unwrap());

static FAST_FORWARD_CONFLICT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)not a fast[- ]forward|merge conflict|diverg").unwrap()
});

pub fn is_missing_workflow_scope(failure: &HttpFailure) -> bool {
    WORKFLOW_SCOPE.is_match(&failure.message) || WORKFLOW_SCOPE.is_match(&failure.body)
}

/// 409/422 whose message says the update can't be applied as a fast-forward.
pub fn is_fast_forward_conflict(failure: &HttpFailure) -> bool {
    matches!(failure.status, 409 | 422)
        && (FAST_FORWARD_CONFLICT.is_match(&failure.message)
            || FAST_FORWARD_CONFLICT.is_match(&failure.body))
}

// Git failures never come through here; they convert straight into SyncError::Git.

/// Classify a failure that isn't tied to a particular branch ref.
pub fn classify(err: ApiError) -> SyncError {
    classify_with(err, None)
}

/// Classify a failure of a request against `branch` of `repo`.
pub fn classify_ref(err: ApiError, branch: &str, repo: &RepositoryRef) -> SyncError {
    classify_with(err, Some((branch, repo)))
}

fn classify_with(err: ApiError, target: Option<(&str, &RepositoryRef)>) -> SyncError {
    let failure = match err {
        ApiError::Status(failure) => failure,
        other => return SyncError::Network(other.to_string()),
    };

    // The scope message arrives with conflict-shaped status codes, so it wins
    if is_missing_workflow_scope(&failure) {
        return SyncError::InsufficientScope;
    }

    if let Some((branch, repo)) = target {
        if failure.mentions(REFERENCE_MISSING) {
            return SyncError::BranchNotFound {
                branch: branch.to_string(),
                repo: repo.full_name(),
            };
        }
    }

    if failure.mentions(NOT_FAST_FORWARD) || is_fast_forward_conflict(&failure) {
        return SyncError::DivergedHistory;
    }

    SyncError::Http {
        status: failure.status,
        message: failure.message,
        body: failure.body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn status(code: u16, body: &str) -> ApiError {
        ApiError::Status(HttpFailure::from_body(code, body))
    }

    fn dest() -> RepositoryRef {
        RepositoryRef::new("github.com", "FORKOWNER", "REPO-FORK")
    }

    #[test]
    fn test_not_fast_forward_is_diverged() {
        let err = classify_ref(
            status(422, r#"{"message":"Update is not a fast forward"}"#),
            "trunk",
            &dest(),
        );
        assert_eq!(err.kind(), ErrorKind::DivergedHistory);
    }

    #[test]
    fn test_not_fast_forward_text_is_diverged_with_any_status() {
        let err = classify_ref(
            status(400, r#"{"message":"Update is not a fast forward"}"#),
            "trunk",
            &dest(),
        );
        assert_eq!(err.kind(), ErrorKind::DivergedHistory);
    }

    #[test]
    fn test_merge_conflict_409_is_diverged() {
        let err = classify(status(409, r#"{"message":"There are merge conflicts"}"#));
        assert_eq!(err.kind(), ErrorKind::DivergedHistory);
    }

    #[test]
    fn test_missing_reference_names_branch_and_repo() {
        let err = classify_ref(
            status(422, r#"{"message":"Reference does not exist"}"#),
            "trunk",
            &dest(),
        );
        assert_eq!(
            err.to_string(),
            "trunk branch does not exist on FORKOWNER/REPO-FORK repository"
        );
    }

    #[test]
    fn test_workflow_scope_takes_precedence_over_conflict() {
        let body = r#"{"message":"refusing to allow an OAuth App to create or update workflow `.github/workflows/ci.yml` without `workflow` scope; Update is not a fast forward"}"#;
        let err = classify_ref(status(422, body), "trunk", &dest());
        assert_eq!(err.kind(), ErrorKind::InsufficientScope);
    }

    #[test]
    fn test_workflow_scope_with_any_status() {
        let body = r#"{"message":"refusing to allow a Personal Access Token to create or update workflow `x.yml` without `workflow` scope"}"#;
        let err = classify(status(403, body));
        assert_eq!(err.kind(), ErrorKind::InsufficientScope);
    }

    #[test]
    fn test_conflict_text_with_other_status_is_transport() {
        let err = classify(status(500, r#"{"message":"merge conflict in cache"}"#));
        assert_eq!(err.kind(), ErrorKind::Transport);
        assert_eq!(err.to_string(), "HTTP 500: merge conflict in cache");
    }

    #[test]
    fn test_network_error_is_transport() {
        let err = classify(ApiError::Transport("connection reset".to_string()));
        assert_eq!(err.kind(), ErrorKind::Transport);
        assert_eq!(err.to_string(), "connection reset");
    }
}
