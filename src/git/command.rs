use git2::{BranchType, ErrorCode, Repository, StatusOptions};
use std::path::PathBuf;
use std::process::Command;

use super::{GitClient, GitError};

/// Git client for a working copy.
///
/// Queries go through libgit2; anything that mutates refs or the working tree
/// shells out to the `git` binary so hooks, credential helpers and lock files
/// behave exactly as they do for the user.
pub struct CommandGitClient {
    repo_path: PathBuf,
    git_binary: String,
}

impl CommandGitClient {
    pub fn new(repo_path: impl Into<PathBuf>, git_binary: &str) -> Self {
        Self {
            repo_path: repo_path.into(),
            git_binary: git_binary.to_string(),
        }
    }

    fn open(&self) -> Result<Repository, GitError> {
        Ok(Repository::discover(&self.repo_path)?)
    }

    fn run(&self, args: &[&str]) -> Result<std::process::Output, GitError> {
        tracing::debug!("git {}", args.join(" "));

        let output = Command::new(&self.git_binary)
            .args(args)
            .current_dir(&self.repo_path)
            .output()?;

        Ok(output)
    }

    fn run_checked(&self, args: &[&str]) -> Result<(), GitError> {
        let output = self.run(args)?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(GitError::Command {
                command: args.first().copied().unwrap_or_default().to_string(),
                stderr,
            });
        }

        Ok(())
    }
}

impl GitClient for CommandGitClient {
    fn fetch(&self, remote: &str, refspec: &str) -> Result<(), GitError> {
        self.run_checked(&["fetch", remote, refspec])
    }

    fn has_local_branch(&self, name: &str) -> bool {
        self.open()
            .map(|repo| repo.find_branch(name, BranchType::Local).is_ok())
            .unwrap_or(false)
    }

    fn current_branch(&self) -> Result<Option<String>, GitError> {
        let repo = self.open()?;

        let head = match repo.head() {
            Ok(head) => head,
            Err(e) if e.code() == ErrorCode::UnbornBranch => {
                // Fresh repository: HEAD points at a branch with no commits yet
                let head = repo.find_reference("HEAD")?;
                return Ok(head
                    .symbolic_target()
                    .and_then(|target| target.strip_prefix("refs/heads/"))
                    .map(String::from));
            }
            Err(e) => return Err(e.into()),
        };

        if !head.is_branch() {
            return Ok(None);
        }

        Ok(head.shorthand().map(String::from))
    }

    fn branch_remote(&self, name: &str) -> Result<Option<String>, GitError> {
        let repo = self.open()?;
        let config = repo.config()?;

        match config.get_string(&format!("branch.{}.remote", name)) {
            Ok(remote) => Ok(Some(remote)),
            Err(e) if e.code() == ErrorCode::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn is_ancestor(&self, ancestor: &str, reference: &str) -> Result<bool, GitError> {
        let output = self.run(&["merge-base", "--is-ancestor", ancestor, reference])?;

        // exit 1 is a clean "no"; anything else is a real failure
        match output.status.code() {
            Some(0) => Ok(true),
            Some(1) => Ok(false),
            _ => Err(GitError::Command {
                command: "merge-base".to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }),
        }
    }

    fn is_dirty(&self) -> Result<bool, GitError> {
        let repo = self.open()?;
        let statuses = repo.statuses(Some(
            StatusOptions::new()
                .include_untracked(false)
                .include_ignored(false),
        ))?;

        Ok(!statuses.is_empty())
    }

    fn merge_fast_forward(&self, reference: &str) -> Result<(), GitError> {
        self.run_checked(&["merge", "--ff-only", reference])
    }

    fn reset_hard(&self, reference: &str) -> Result<(), GitError> {
        self.run_checked(&["reset", "--hard", reference])
    }

    fn update_branch(&self, name: &str, reference: &str) -> Result<(), GitError> {
        self.run_checked(&["update-ref", &format!("refs/heads/{}", name), reference])
    }

    fn create_branch(
        &self,
        name: &str,
        reference: &str,
        remote: &str,
    ) -> Result<(), GitError> {
        self.run_checked(&["branch", "--no-track", name, reference])?;

        // Written directly: a single-branch clone has no refs/remotes/<remote>/<name>
        // for `git branch --set-upstream-to` to point at.
        let repo = self.open()?;
        let mut config = repo.config()?;
        config.set_str(&format!("branch.{}.remote", name), remote)?;
        config.set_str(
            &format!("branch.{}.merge", name),
            &format!("refs/heads/{}", name),
        )?;
        Ok(())
    }
}
