//! Git hosting provider abstraction.
//!
//! "Do X": Run repository lifecycle operations against any hosting backend.
//!
//! One contract over four structurally different backends - GitHub, GitLab,
//! Gitea, and a local filesystem pseudo-provider for bare repositories.
//! Each backend maps its endpoint, verb, and payload quirks onto the same
//! result envelope; expected failures never panic and never surface as
//! `Err`.
//!
//! # Design
//!
//! - **GitHostingProvider**: the lifecycle contract (info / create /
//!   archive / delete) plus identity and capability flags.
//! - **detect**: staged provider detection from a bare remote URL, and a
//!   caller-owned registry keyed by (kind, instance).
//! - **credentials**: deterministic PAT key derivation per instance.
//!
//! # Example
//!
//! ```ignore
//! use ckli_hosting::hosting::{resolve_provider, EnvSecretsStore};
//!
//! let provider = resolve_provider(&EnvSecretsStore, "git@github.com:owner/repo.git").unwrap();
//! let info = provider.repository_info("owner", "repo", false);
//! ```

pub mod credentials;
pub mod detect;
pub mod filesystem;
pub mod gitea;
pub mod github;
pub mod gitlab;
pub mod result;
pub mod transport;
pub mod types;

pub use credentials::{credential_keys, AccessLevel, EnvSecretsStore, SecretsStore};
pub use detect::{create_provider, resolve_provider, ProviderRegistry};
pub use filesystem::FileSystemProvider;
pub use gitea::GiteaProvider;
pub use github::GitHubProvider;
pub use gitlab::GitLabProvider;
pub use result::OperationResult;
pub use transport::{ApiMethod, ApiRequest, ApiResponse, AuthStyle, HttpTransport};
pub use types::{CloudProvider, CreateOptions, ProviderKind, RepositoryInfo};

use log::{error, info};
use url::Url;

use crate::remote_url::{self, ParsedRemote};

/// Repository lifecycle operations against one hosting backend.
///
/// A provider is constructed once per (kind, host) pair, holds a single
/// transport, and is safe for concurrent use; no cross-call mutable state
/// exists beyond the transport and the fixed identity fields. Expected
/// failures come back as failed [`OperationResult`]s, never as panics.
/// No retries happen here: transient failures (5xx, 429) are ordinary
/// failed results so the caller can apply backoff policy uniformly.
pub trait GitHostingProvider: Send + Sync {
    /// Which backend this instance talks to.
    fn kind(&self) -> ProviderKind;

    /// Public SaaS identity of the host; `Unknown` for self-hosted
    /// instances.
    fn cloud(&self) -> CloudProvider;

    /// The host this instance was constructed for.
    fn instance_id(&self) -> &str;

    /// Base REST URL. Always ends with `/`; relative request paths resolve
    /// against it.
    fn base_api_url(&self) -> &Url;

    /// Whether repositories default to public visibility on this backend.
    fn is_default_public(&self) -> bool;

    /// Whether the backend supports archiving at all.
    fn can_archive(&self) -> bool;

    /// Fetch a repository snapshot.
    ///
    /// Absent repository: failed result when `must_exist`, otherwise a
    /// successful result carrying [`RepositoryInfo::absent`].
    fn repository_info(
        &self,
        owner: &str,
        name: &str,
        must_exist: bool,
    ) -> OperationResult<RepositoryInfo>;

    /// Create a repository, organization/group-scoped when the owner is
    /// one. Naming conflicts come back as failed results.
    fn create_repository(&self, options: &CreateOptions) -> OperationResult;

    /// Archive (`archive = true`) or restore a repository. Idempotent: a
    /// repository already in the requested state yields success without a
    /// state-changing request.
    fn archive_repository(&self, owner: &str, name: &str, archive: bool) -> OperationResult;

    /// Delete a repository. Success only on a definitive deletion response.
    fn delete_repository(&self, owner: &str, name: &str) -> OperationResult;

    /// Parse a remote URL, rejecting hosts that do not belong to this
    /// instance.
    fn parse_remote_url(&self, url: &str) -> Option<ParsedRemote> {
        let parsed = remote_url::parse(url)?;
        if !parsed.host.eq_ignore_ascii_case(self.instance_id()) {
            return None;
        }
        Some(parsed)
    }
}

/// Result shape for an absent repository, logging the contractual error
/// line when the caller required existence.
pub(crate) fn absent_repository(
    base: &Url,
    owner: &str,
    name: &str,
    must_exist: bool,
) -> OperationResult<RepositoryInfo> {
    if must_exist {
        error!(
            "Expected Git repository at '{}{}/{}' is missing.",
            base, owner, name
        );
        return OperationResult::http_error(404, format!("Repository '{owner}/{name}' not found."));
    }
    OperationResult::ok_with(RepositoryInfo::absent())
}

/// Contractual notice for an archive call that has nothing to do.
pub(crate) fn log_archive_noop(base: &Url, owner: &str, name: &str, archived: bool) {
    if archived {
        info!("Repository '{}{}/{}' is already archived.", base, owner, name);
    } else {
        info!("Repository '{}{}/{}' is not archived.", base, owner, name);
    }
}
