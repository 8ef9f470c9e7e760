pub mod branch;
pub mod classify;
pub mod local;
pub mod remote;
pub mod resolve;

pub use resolve::{build_request, RemoteLookup, SyncArgs};

use crate::error::Result;
use crate::git::GitClient;
use crate::github::HostingApi;
use crate::repo::RepositoryRef;

/// Label used for the destination when syncing the current checkout.
pub const LOCAL_LABEL: &str = "local repository";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// The working copy the command runs in.
    LocalCheckout,
    Repository(RepositoryRef),
}

/// One sync invocation, built from command-line options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncRequest {
    pub destination: Destination,
    pub source: Option<RepositoryRef>,
    pub branch: Option<String>,
    pub force: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Performed {
    FastForward,
    Reset,
    Created,
    UpdatedNonCurrent,
    ServerMerge,
    ManualPatch,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncOutcome {
    pub branch: String,
    pub source_label: String,
    pub dest_label: String,
    pub performed: Performed,
}

impl SyncOutcome {
    /// Success line shown to the user.
    pub fn summary(&self) -> String {
        match self.performed {
            Performed::FastForward
            | Performed::Reset
            | Performed::Created
            | Performed::UpdatedNonCurrent => format!(
                "Synced the \"{}\" branch from {} to {}",
                self.branch, self.source_label, self.dest_label
            ),
            Performed::ServerMerge | Performed::ManualPatch => format!(
                "Synced the \"{}:{}\" branch from \"{}\"",
                self.dest_label, self.branch, self.source_label
            ),
        }
    }
}

/// Picks the executor for a request: git for the current checkout, the
/// hosting API for a named repository.
pub struct SyncEngine<'a> {
    git: &'a dyn GitClient,
    api: &'a dyn HostingApi,
    remotes: RemoteLookup<'a>,
    host: String,
}

impl<'a> SyncEngine<'a> {
    pub fn new(
        git: &'a dyn GitClient,
        api: &'a dyn HostingApi,
        remotes: RemoteLookup<'a>,
        host: &str,
    ) -> Self {
        Self {
            git,
            api,
            remotes,
            host: host.to_string(),
        }
    }

    pub async fn run(&self, request: &SyncRequest) -> Result<SyncOutcome> {
        match &request.destination {
            Destination::LocalCheckout => {
                tracing::info!("Syncing local checkout");
                local::sync_local(self.git, self.api, self.remotes, &self.host, request).await
            }
            Destination::Repository(dest) => {
                tracing::info!("Syncing {} through the API", dest);
                remote::sync_remote(self.api, dest, request).await
            }
        }
    }
}
