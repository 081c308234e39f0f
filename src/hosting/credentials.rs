//! Personal Access Token key derivation and the secrets lookup contract.
//!
//! "Do X": Name the PAT for a provider instance deterministically.
//!
//! Cloud hosts get the short form (`GITHUB_GIT_WRITE_PAT`); every other
//! instance derives its key from the sanitized host, so
//! `github.company.com` looks up `GITHUB_COMPANY_COM_GIT_WRITE_PAT`. Ports
//! never contribute to a key.

use super::types::ProviderKind;

/// What the token will be used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessLevel {
    Read,
    Write,
}

/// Ordered candidate key names for one provider instance and access level.
///
/// Read lookups fall back to the write key; write lookups never fall back
/// to a read-only token.
pub fn credential_keys(kind: ProviderKind, instance_id: &str, level: AccessLevel) -> Vec<String> {
    let prefix = key_prefix(kind, instance_id);
    match level {
        AccessLevel::Write => vec![format!("{prefix}_WRITE_PAT")],
        AccessLevel::Read => vec![format!("{prefix}_READ_PAT"), format!("{prefix}_WRITE_PAT")],
    }
}

fn key_prefix(kind: ProviderKind, instance_id: &str) -> String {
    match kind {
        ProviderKind::FileSystem => "FILESYSTEM_GIT".to_string(),
        ProviderKind::GitHub if instance_id.eq_ignore_ascii_case("github.com") => {
            "GITHUB_GIT".to_string()
        }
        ProviderKind::GitLab if instance_id.eq_ignore_ascii_case("gitlab.com") => {
            "GITLAB_GIT".to_string()
        }
        _ => format!("{}_GIT", sanitize_host(instance_id)),
    }
}

/// Uppercase the host and fold `.`/`-` to `_`, dropping any port.
fn sanitize_host(host: &str) -> String {
    let host = host.split(':').next().unwrap_or(host);
    host.trim()
        .to_ascii_uppercase()
        .chars()
        .map(|c| if c == '.' || c == '-' { '_' } else { c })
        .collect()
}

/// Lookup contract of the secrets-store collaborator: the first non-empty
/// match wins. The implementation (OS keychain, encrypted vault, ...) is out
/// of scope here.
pub trait SecretsStore {
    fn first_secret(&self, candidates: &[String]) -> Option<String>;
}

/// Environment-backed store so the CLI works without a vault.
pub struct EnvSecretsStore;

impl SecretsStore for EnvSecretsStore {
    fn first_secret(&self, candidates: &[String]) -> Option<String> {
        candidates
            .iter()
            .filter_map(|key| std::env::var(key).ok())
            .find(|value| !value.is_empty())
    }
}

/// Best available token for a provider's transport: the write PAT first,
/// the read PAT as fallback, anonymous when neither resolves.
pub(crate) fn lookup_token(
    secrets: &dyn SecretsStore,
    kind: ProviderKind,
    instance_id: &str,
) -> Option<String> {
    let prefix = key_prefix(kind, instance_id);
    let candidates = vec![format!("{prefix}_WRITE_PAT"), format!("{prefix}_READ_PAT")];
    secrets.first_secret(&candidates)
}
