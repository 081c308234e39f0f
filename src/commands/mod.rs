pub mod archive;
pub mod create;
pub mod delete;
pub mod detect;
pub mod info;
pub mod parse;

use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Result};

use ckli_hosting::hosting::{create_provider, resolve_provider, EnvSecretsStore, ProviderKind};
use ckli_hosting::{GitHostingProvider, OperationResult};

/// Build the provider for a remote URL, preferring an explicit `--provider`
/// over staged detection.
pub(crate) fn provider_for(
    remote_url: &str,
    provider_name: Option<&str>,
    api_url: Option<&str>,
) -> Result<Arc<dyn GitHostingProvider>> {
    let secrets = EnvSecretsStore;
    let provider = match provider_name {
        Some(name) => {
            let host = ckli_hosting::remote_url::host_of(remote_url).unwrap_or_default();
            create_provider(name, &host, &secrets, api_url)
        }
        None => resolve_provider(&secrets, remote_url),
    };
    match provider {
        Some(provider) => Ok(provider),
        None => bail!(
            "Could not determine a hosting provider for '{remote_url}'. \
             Pass --provider (github, gitlab, gitea, filesystem) to configure it explicitly."
        ),
    }
}

/// Owner and repository name for the provider's addressing scheme.
///
/// Cloud providers parse the remote URL; the filesystem provider treats it
/// as a local path whose parent directory is the owner.
pub(crate) fn coordinates(
    provider: &dyn GitHostingProvider,
    remote_url: &str,
) -> Result<(String, String)> {
    if provider.kind() == ProviderKind::FileSystem {
        let path = Path::new(remote_url.trim_start_matches("file://"));
        let name = path
            .file_name()
            .and_then(|name| name.to_str())
            .map(|name| name.trim_end_matches(".git").to_string());
        let owner = path.parent().map(|parent| parent.display().to_string());
        return match (owner, name) {
            (Some(owner), Some(name)) if !name.is_empty() => Ok((owner, name)),
            _ => bail!("'{remote_url}' is not a usable local repository path."),
        };
    }
    match provider.parse_remote_url(remote_url) {
        Some(parsed) => Ok((parsed.owner, parsed.repo_name)),
        None => bail!(
            "'{remote_url}' does not point at '{}'.",
            provider.instance_id()
        ),
    }
}

/// Turn a failed result into a process error; successes pass through.
pub(crate) fn finish(result: OperationResult) -> Result<()> {
    if result.success {
        return Ok(());
    }
    let message = result
        .error_message
        .unwrap_or_else(|| "Operation failed.".to_string());
    match result.http_status {
        Some(status) => bail!("{message} (HTTP {status})"),
        None => bail!("{message}"),
    }
}
