//! Domain types shared by every hosting backend.
//!
//! Platform-agnostic shapes for repository snapshots, creation options, and
//! provider identity. Wire-format structs live inside each backend module.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// The four supported backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    GitHub,
    GitLab,
    Gitea,
    FileSystem,
}

impl ProviderKind {
    /// Stable name used in configuration and diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            ProviderKind::GitHub => "GitHubProvider",
            ProviderKind::GitLab => "GitLabProvider",
            ProviderKind::Gitea => "GiteaProvider",
            ProviderKind::FileSystem => "FileSystemProvider",
        }
    }

    /// Case-insensitive parse of a configured type name. Both the short
    /// form ("github") and the full form ("GitHubProvider") are accepted.
    pub fn from_type_name(name: &str) -> Option<Self> {
        let name = name.trim().to_ascii_lowercase();
        match name.strip_suffix("provider").unwrap_or(&name) {
            "github" => Some(ProviderKind::GitHub),
            "gitlab" => Some(ProviderKind::GitLab),
            "gitea" => Some(ProviderKind::Gitea),
            "filesystem" => Some(ProviderKind::FileSystem),
            _ => None,
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// Which public SaaS a host corresponds to, if any.
///
/// Only the well-known hosts qualify; every self-hosted or enterprise
/// instance of the same software is `Unknown` and addressed by its literal
/// hostname.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CloudProvider {
    GitHub,
    GitLab,
    Unknown,
}

impl fmt::Display for CloudProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CloudProvider::GitHub => "GitHub",
            CloudProvider::GitLab => "GitLab",
            CloudProvider::Unknown => "Unknown",
        };
        f.write_str(name)
    }
}

/// Snapshot of a hosted repository.
///
/// When `exists` is false every optional field is unset and every flag is
/// false; see [`RepositoryInfo::absent`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct RepositoryInfo {
    pub exists: bool,
    pub repo_path: String,
    pub owner: String,
    pub name: String,
    pub description: Option<String>,
    pub is_private: bool,
    pub is_archived: bool,
    pub is_empty: bool,
    pub default_branch: Option<String>,
    pub clone_url_https: Option<String>,
    pub clone_url_ssh: Option<String>,
    pub web_url: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl RepositoryInfo {
    /// The fixed shape for a repository that does not exist: empty path,
    /// false flags, no URLs, no timestamps.
    pub fn absent() -> Self {
        Self::default()
    }
}

/// Options for `create_repository`.
///
/// Backend extras are honored where the service supports them and silently
/// ignored otherwise (the filesystem provider ignores all of them).
#[derive(Debug, Clone, Default)]
pub struct CreateOptions {
    pub owner: String,
    pub name: String,
    pub description: Option<String>,
    pub private: bool,
    pub auto_init: bool,
    pub gitignore_template: Option<String>,
    pub license_template: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_name_round_trip() {
        assert_eq!(ProviderKind::from_type_name("github"), Some(ProviderKind::GitHub));
        assert_eq!(ProviderKind::from_type_name("GitLab"), Some(ProviderKind::GitLab));
        assert_eq!(ProviderKind::from_type_name(" GITEA "), Some(ProviderKind::Gitea));
        assert_eq!(
            ProviderKind::from_type_name("filesystem"),
            Some(ProviderKind::FileSystem)
        );
        assert_eq!(
            ProviderKind::from_type_name("GitHubProvider"),
            Some(ProviderKind::GitHub)
        );
        assert_eq!(ProviderKind::from_type_name("bitbucket"), None);
        assert_eq!(ProviderKind::GitHub.type_name(), "GitHubProvider");
    }

    #[test]
    fn test_absent_shape() {
        let absent = RepositoryInfo::absent();
        assert!(!absent.exists);
        assert!(absent.repo_path.is_empty());
        assert!(!absent.is_private);
        assert!(!absent.is_archived);
        assert!(!absent.is_empty);
        assert!(absent.web_url.is_none());
        assert!(absent.clone_url_https.is_none());
        assert!(absent.created_at.is_none());
        assert!(absent.updated_at.is_none());
    }
}
