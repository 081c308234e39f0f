//! Provider detection and construction.
//!
//! "Do X": Pick the right hosting provider for a bare remote URL.
//!
//! Detection is staged: well-known host, then hostname pattern, then an
//! explicit "indeterminate" stage for hosts that could only be classified
//! by probing their API with credentials. That last stage is deliberately
//! distinct from "not found": the detector never guesses, it tells the
//! caller to configure the provider explicitly.

use std::collections::HashMap;
use std::sync::Arc;

use log::{debug, warn};

use super::credentials::SecretsStore;
use super::filesystem::FileSystemProvider;
use super::gitea::GiteaProvider;
use super::github::GitHubProvider;
use super::gitlab::GitLabProvider;
use super::types::ProviderKind;
use super::GitHostingProvider;
use crate::remote_url;

/// Outcome of one detection strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum HostMatch {
    Known(ProviderKind),
    /// The host could only be classified by probing its API with
    /// credentials; callers must fall back to explicit configuration.
    Indeterminate,
}

type Strategy = fn(&str) -> Option<HostMatch>;

/// Ordered detection stages; the first one with an opinion wins.
const STRATEGIES: &[Strategy] = &[well_known_host, hostname_pattern, credential_probe];

fn well_known_host(host: &str) -> Option<HostMatch> {
    match host {
        "github.com" => Some(HostMatch::Known(ProviderKind::GitHub)),
        "gitlab.com" => Some(HostMatch::Known(ProviderKind::GitLab)),
        _ => None,
    }
}

fn hostname_pattern(host: &str) -> Option<HostMatch> {
    if host.contains("github") {
        Some(HostMatch::Known(ProviderKind::GitHub))
    } else if host.contains("gitlab") {
        Some(HostMatch::Known(ProviderKind::GitLab))
    } else if host.contains("gitea") {
        Some(HostMatch::Known(ProviderKind::Gitea))
    } else {
        None
    }
}

fn credential_probe(_host: &str) -> Option<HostMatch> {
    // Identifying an arbitrary host would mean probing its API with a PAT.
    // That stage is not implemented, so the host stays indeterminate.
    Some(HostMatch::Indeterminate)
}

pub(crate) fn detect_host(host: &str) -> HostMatch {
    for strategy in STRATEGIES {
        if let Some(matched) = strategy(host) {
            return matched;
        }
    }
    HostMatch::Indeterminate
}

/// Construct a provider from an explicitly configured type name.
///
/// Unknown type names yield `None` without side effects. Gitea derives
/// `https://{host}/api/v1/` when no API URL is supplied.
pub fn create_provider(
    type_name: &str,
    host: &str,
    secrets: &dyn SecretsStore,
    api_url: Option<&str>,
) -> Option<Arc<dyn GitHostingProvider>> {
    let kind = ProviderKind::from_type_name(type_name)?;
    build(kind, host, secrets, api_url)
}

/// Staged, best-effort detection over a bare remote URL.
///
/// Unparseable input and indeterminate hosts both yield `None`; only the
/// logging differs.
pub fn resolve_provider(
    secrets: &dyn SecretsStore,
    remote_url_text: &str,
) -> Option<Arc<dyn GitHostingProvider>> {
    let host = remote_url::host_of(remote_url_text)?;
    match detect_host(&host) {
        HostMatch::Known(kind) => build(kind, &host, secrets, None),
        HostMatch::Indeterminate => {
            debug!(
                "Could not determine the hosting provider for '{host}' without credentials; \
                 configure it explicitly."
            );
            None
        }
    }
}

fn build(
    kind: ProviderKind,
    host: &str,
    secrets: &dyn SecretsStore,
    api_url: Option<&str>,
) -> Option<Arc<dyn GitHostingProvider>> {
    let built: Result<Arc<dyn GitHostingProvider>, anyhow::Error> = match kind {
        ProviderKind::GitHub => GitHubProvider::new(host, secrets)
            .map(|provider| Arc::new(provider) as Arc<dyn GitHostingProvider>),
        ProviderKind::GitLab => GitLabProvider::new(host, secrets)
            .map(|provider| Arc::new(provider) as Arc<dyn GitHostingProvider>),
        ProviderKind::Gitea => GiteaProvider::new(host, secrets, api_url)
            .map(|provider| Arc::new(provider) as Arc<dyn GitHostingProvider>),
        ProviderKind::FileSystem => Ok(FileSystemProvider::shared()),
    };
    match built {
        Ok(provider) => Some(provider),
        Err(e) => {
            warn!("Failed to construct {} for '{}': {e:#}", kind, host);
            None
        }
    }
}

/// Caller-owned cache of provider instances keyed by (kind, instance id).
///
/// Construction is lazy on first use; instances are reused for every later
/// operation on the same host. The filesystem provider always collapses to
/// the process-wide instance.
#[derive(Default)]
pub struct ProviderRegistry {
    providers: HashMap<(ProviderKind, String), Arc<dyn GitHostingProvider>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Cached variant of [`create_provider`].
    pub fn get_or_create(
        &mut self,
        type_name: &str,
        host: &str,
        secrets: &dyn SecretsStore,
        api_url: Option<&str>,
    ) -> Option<Arc<dyn GitHostingProvider>> {
        let kind = ProviderKind::from_type_name(type_name)?;
        self.cached(kind, host, secrets, api_url)
    }

    /// Cached variant of [`resolve_provider`].
    pub fn resolve(
        &mut self,
        secrets: &dyn SecretsStore,
        remote_url_text: &str,
    ) -> Option<Arc<dyn GitHostingProvider>> {
        let host = remote_url::host_of(remote_url_text)?;
        match detect_host(&host) {
            HostMatch::Known(kind) => self.cached(kind, &host, secrets, None),
            HostMatch::Indeterminate => {
                debug!(
                    "Could not determine the hosting provider for '{host}' without credentials; \
                     configure it explicitly."
                );
                None
            }
        }
    }

    fn cached(
        &mut self,
        kind: ProviderKind,
        host: &str,
        secrets: &dyn SecretsStore,
        api_url: Option<&str>,
    ) -> Option<Arc<dyn GitHostingProvider>> {
        let key = (kind, registry_host(kind, host));
        if let Some(existing) = self.providers.get(&key) {
            return Some(existing.clone());
        }
        let provider = build(kind, host, secrets, api_url)?;
        self.providers.insert(key, provider.clone());
        Some(provider)
    }
}

fn registry_host(kind: ProviderKind, host: &str) -> String {
    if kind == ProviderKind::FileSystem {
        "filesystem".to_string()
    } else {
        host.trim().to_ascii_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hosting::types::CloudProvider;

    /// Store that never resolves anything; detection must not need it.
    struct NoSecrets;

    impl SecretsStore for NoSecrets {
        fn first_secret(&self, _candidates: &[String]) -> Option<String> {
            None
        }
    }

    #[test]
    fn test_resolve_well_known_hosts() {
        let github = resolve_provider(&NoSecrets, "git@github.com:owner/repo.git").unwrap();
        assert_eq!(github.kind(), ProviderKind::GitHub);
        assert_eq!(github.cloud(), CloudProvider::GitHub);
        assert_eq!(github.instance_id(), "github.com");

        let gitlab = resolve_provider(&NoSecrets, "https://gitlab.com/group/repo").unwrap();
        assert_eq!(gitlab.kind(), ProviderKind::GitLab);
        assert_eq!(gitlab.cloud(), CloudProvider::GitLab);
    }

    #[test]
    fn test_resolve_hostname_patterns() {
        let gitlab = resolve_provider(&NoSecrets, "https://gitlab.internal.org/group/repo").unwrap();
        assert_eq!(gitlab.kind(), ProviderKind::GitLab);
        assert_eq!(gitlab.instance_id(), "gitlab.internal.org");
        assert_eq!(gitlab.cloud(), CloudProvider::Unknown);

        let gitea = resolve_provider(&NoSecrets, "ssh://git@gitea.corp.io/owner/repo.git").unwrap();
        assert_eq!(gitea.kind(), ProviderKind::Gitea);
        assert_eq!(
            gitea.base_api_url().as_str(),
            "https://gitea.corp.io/api/v1/"
        );

        let enterprise =
            resolve_provider(&NoSecrets, "https://github.company.com/owner/repo").unwrap();
        assert_eq!(enterprise.kind(), ProviderKind::GitHub);
        assert_eq!(enterprise.cloud(), CloudProvider::Unknown);
    }

    #[test]
    fn test_resolve_unknown_host_is_none() {
        assert!(resolve_provider(&NoSecrets, "https://git.example.com/owner/repo").is_none());
    }

    #[test]
    fn test_resolve_unparseable_is_none() {
        assert!(resolve_provider(&NoSecrets, "").is_none());
        assert!(resolve_provider(&NoSecrets, "not a url").is_none());
    }

    #[test]
    fn test_detect_stages() {
        assert_eq!(
            detect_host("github.com"),
            HostMatch::Known(ProviderKind::GitHub)
        );
        assert_eq!(
            detect_host("gitea.company.com"),
            HostMatch::Known(ProviderKind::Gitea)
        );
        assert_eq!(detect_host("git.example.com"), HostMatch::Indeterminate);
    }

    #[test]
    fn test_create_provider_dispatch() {
        // Case-insensitive on the type name.
        let provider = create_provider("GitHub", "github.com", &NoSecrets, None).unwrap();
        assert_eq!(provider.kind(), ProviderKind::GitHub);

        let gitea = create_provider("gitea", "gitea.corp.io", &NoSecrets, None).unwrap();
        assert_eq!(
            gitea.base_api_url().as_str(),
            "https://gitea.corp.io/api/v1/"
        );

        assert!(create_provider("bitbucket", "bitbucket.org", &NoSecrets, None).is_none());
    }

    #[test]
    fn test_every_provider_base_url_ends_with_slash() {
        let providers = [
            create_provider("github", "github.com", &NoSecrets, None).unwrap(),
            create_provider("github", "github.company.com", &NoSecrets, None).unwrap(),
            create_provider("gitlab", "gitlab.com", &NoSecrets, None).unwrap(),
            create_provider("gitlab", "gitlab.internal.org", &NoSecrets, None).unwrap(),
            create_provider("gitea", "gitea.corp.io", &NoSecrets, None).unwrap(),
            create_provider("filesystem", "", &NoSecrets, None).unwrap(),
        ];
        for provider in providers {
            assert!(
                provider.base_api_url().as_str().ends_with('/'),
                "{} base URL must end with '/'",
                provider.kind()
            );
        }
    }

    #[test]
    fn test_registry_reuses_instances() {
        let mut registry = ProviderRegistry::new();
        let first = registry
            .resolve(&NoSecrets, "git@github.com:owner/repo.git")
            .unwrap();
        let second = registry
            .resolve(&NoSecrets, "https://github.com/other/project")
            .unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(registry.len(), 1);

        registry
            .get_or_create("gitlab", "gitlab.internal.org", &NoSecrets, None)
            .unwrap();
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_registry_collapses_filesystem_instances() {
        let mut registry = ProviderRegistry::new();
        let a = registry
            .get_or_create("filesystem", "/tmp/stacks", &NoSecrets, None)
            .unwrap();
        let b = registry
            .get_or_create("filesystem", "/var/repos", &NoSecrets, None)
            .unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(registry.len(), 1);
    }
}
