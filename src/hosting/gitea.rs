//! Gitea REST v1 backend.
//!
//! GitHub-shaped payloads with two welcome differences: the repository
//! payload carries an `empty` flag directly (no secondary probe), and the
//! API URL is always explicit because Gitea has no official SaaS host -
//! `https://{host}/api/v1/` is derived when the caller gives none.

use std::sync::Arc;

use anyhow::Result;
use chrono::{DateTime, Utc};
use log::debug;
use serde::Deserialize;
use serde_json::{json, Value};
use url::Url;

use super::credentials::{lookup_token, SecretsStore};
use super::result::OperationResult;
use super::transport::{ApiRequest, AuthStyle, HttpTransport, RestTransport};
use super::types::{CloudProvider, CreateOptions, ProviderKind, RepositoryInfo};
use super::{absent_repository, log_archive_noop, GitHostingProvider};

pub struct GiteaProvider {
    instance_id: String,
    base_api_url: Url,
    transport: Arc<dyn HttpTransport>,
}

impl GiteaProvider {
    pub fn new(host: &str, secrets: &dyn SecretsStore, api_url: Option<&str>) -> Result<Self> {
        let host = host.trim().to_ascii_lowercase();
        let base_api_url = Self::api_base(&host, api_url)?;
        let token = lookup_token(secrets, ProviderKind::Gitea, &host);
        let transport = Arc::new(RestTransport::new(
            base_api_url.clone(),
            token.map(|token| (AuthStyle::TokenHeader, token)),
        )?);
        Ok(Self {
            instance_id: host,
            base_api_url,
            transport,
        })
    }

    fn api_base(host: &str, api_url: Option<&str>) -> Result<Url> {
        let mut base = match api_url {
            Some(explicit) => explicit.trim().to_string(),
            None => format!("https://{host}/api/v1/"),
        };
        if !base.ends_with('/') {
            base.push('/');
        }
        Ok(Url::parse(&base)?)
    }

    #[cfg(test)]
    pub(crate) fn with_transport(
        host: &str,
        api_url: Option<&str>,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        let host = host.to_ascii_lowercase();
        Self {
            base_api_url: Self::api_base(&host, api_url).expect("valid host"),
            instance_id: host,
            transport,
        }
    }
}

#[derive(Debug, Deserialize)]
struct GiteaRepo {
    name: String,
    full_name: String,
    owner: GiteaAccount,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    private: bool,
    #[serde(default)]
    archived: bool,
    #[serde(default)]
    empty: bool,
    #[serde(default)]
    default_branch: Option<String>,
    #[serde(default)]
    clone_url: Option<String>,
    #[serde(default)]
    ssh_url: Option<String>,
    #[serde(default)]
    html_url: Option<String>,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct GiteaAccount {
    login: String,
}

fn into_info(repo: GiteaRepo) -> RepositoryInfo {
    RepositoryInfo {
        exists: true,
        repo_path: repo.full_name,
        owner: repo.owner.login,
        name: repo.name,
        description: repo.description,
        is_private: repo.private,
        is_archived: repo.archived,
        is_empty: repo.empty,
        default_branch: repo.default_branch,
        clone_url_https: repo.clone_url,
        clone_url_ssh: repo.ssh_url,
        web_url: repo.html_url,
        created_at: repo.created_at,
        updated_at: repo.updated_at,
    }
}

fn create_body(options: &CreateOptions) -> Value {
    let mut body = json!({
        "name": options.name,
        "private": options.private,
        "auto_init": options.auto_init,
    });
    if let Some(description) = &options.description {
        body["description"] = json!(description);
    }
    if let Some(template) = &options.gitignore_template {
        body["gitignores"] = json!(template);
    }
    if let Some(template) = &options.license_template {
        body["license"] = json!(template);
    }
    body
}

impl GitHostingProvider for GiteaProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Gitea
    }

    fn cloud(&self) -> CloudProvider {
        // No official SaaS host exists.
        CloudProvider::Unknown
    }

    fn instance_id(&self) -> &str {
        &self.instance_id
    }

    fn base_api_url(&self) -> &Url {
        &self.base_api_url
    }

    fn is_default_public(&self) -> bool {
        false
    }

    fn can_archive(&self) -> bool {
        true
    }

    fn repository_info(
        &self,
        owner: &str,
        name: &str,
        must_exist: bool,
    ) -> OperationResult<RepositoryInfo> {
        let request = ApiRequest::get(format!("repos/{owner}/{name}"));
        let response = match self.transport.execute(&request) {
            Ok(response) => response,
            Err(e) => return OperationResult::failed(format!("Gitea request failed: {e:#}")),
        };
        if response.status == 404 {
            return absent_repository(&self.base_api_url, owner, name, must_exist);
        }
        if !response.is_success() {
            return OperationResult::http_error(response.status, response.error_text());
        }
        match serde_json::from_str::<GiteaRepo>(&response.body) {
            Ok(repo) => OperationResult::ok_with(into_info(repo)),
            Err(e) => OperationResult::failed(format!("Unexpected Gitea repository payload: {e}")),
        }
    }

    fn create_repository(&self, options: &CreateOptions) -> OperationResult {
        let body = create_body(options);
        let org_request = ApiRequest::post(format!("orgs/{}/repos", options.owner), body.clone());
        let mut response = match self.transport.execute(&org_request) {
            Ok(response) => response,
            Err(e) => return OperationResult::failed(format!("Gitea request failed: {e:#}")),
        };
        if response.status == 404 {
            debug!(
                "Organization '{}' not found on '{}'; creating under the authenticated user.",
                options.owner, self.instance_id
            );
            response = match self.transport.execute(&ApiRequest::post("user/repos", body)) {
                Ok(response) => response,
                Err(e) => return OperationResult::failed(format!("Gitea request failed: {e:#}")),
            };
        }
        if response.is_success() {
            OperationResult::ok()
        } else {
            OperationResult::http_error(response.status, response.error_text())
        }
    }

    fn archive_repository(&self, owner: &str, name: &str, archive: bool) -> OperationResult {
        let info = self.repository_info(owner, name, true);
        if !info.success {
            return info.into_unit();
        }
        if info
            .data
            .as_ref()
            .is_some_and(|repo| repo.is_archived == archive)
        {
            log_archive_noop(&self.base_api_url, owner, name, archive);
            return OperationResult::ok();
        }
        let request = ApiRequest::patch(
            format!("repos/{owner}/{name}"),
            json!({ "archived": archive }),
        );
        match self.transport.execute(&request) {
            Ok(response) if response.is_success() => OperationResult::ok(),
            Ok(response) => OperationResult::http_error(response.status, response.error_text()),
            Err(e) => OperationResult::failed(format!("Gitea request failed: {e:#}")),
        }
    }

    fn delete_repository(&self, owner: &str, name: &str) -> OperationResult {
        let request = ApiRequest::delete(format!("repos/{owner}/{name}"));
        match self.transport.execute(&request) {
            Ok(response) if matches!(response.status, 200 | 204) => OperationResult::ok(),
            Ok(response) => OperationResult::http_error(response.status, response.error_text()),
            Err(e) => OperationResult::failed(format!("Gitea request failed: {e:#}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hosting::transport::testing::MockTransport;
    use crate::hosting::transport::ApiMethod;

    const REPO_JSON: &str = r#"{
        "name": "repo",
        "full_name": "team/repo",
        "owner": { "login": "team" },
        "private": false,
        "archived": false,
        "empty": true,
        "default_branch": "main",
        "clone_url": "https://gitea.company.com/team/repo.git",
        "ssh_url": "git@gitea.company.com:team/repo.git",
        "html_url": "https://gitea.company.com/team/repo"
    }"#;

    fn provider(transport: Arc<MockTransport>) -> GiteaProvider {
        GiteaProvider::with_transport("gitea.company.com", None, transport)
    }

    #[test]
    fn test_api_url_derivation() {
        let derived = provider(MockTransport::new(&[]));
        assert_eq!(
            derived.base_api_url().as_str(),
            "https://gitea.company.com/api/v1/"
        );
        assert_eq!(derived.cloud(), CloudProvider::Unknown);

        // Explicit URLs are normalized to carry the trailing slash.
        let explicit = GiteaProvider::with_transport(
            "gitea.company.com",
            Some("https://gitea.company.com/custom/api/v1"),
            MockTransport::new(&[]),
        );
        assert_eq!(
            explicit.base_api_url().as_str(),
            "https://gitea.company.com/custom/api/v1/"
        );
    }

    #[test]
    fn test_empty_flag_comes_from_payload() {
        let transport = MockTransport::new(&[(200, REPO_JSON)]);
        let info = provider(transport.clone()).repository_info("team", "repo", true);
        assert!(info.success);
        assert!(info.data.unwrap().is_empty);
        // One request only: no secondary refs probe like GitHub.
        assert_eq!(transport.requests().len(), 1);
    }

    #[test]
    fn test_create_falls_back_to_user_namespace() {
        let transport = MockTransport::new(&[(404, ""), (201, r#"{"id": 3}"#)]);
        let options = CreateOptions {
            owner: "user".to_string(),
            name: "repo".to_string(),
            gitignore_template: Some("Rust".to_string()),
            ..Default::default()
        };
        let result = provider(transport.clone()).create_repository(&options);
        assert!(result.success);

        let requests = transport.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].path, "orgs/user/repos");
        assert_eq!(requests[1].path, "user/repos");
        // Gitea names the template field differently from GitHub.
        assert_eq!(requests[1].body.as_ref().unwrap()["gitignores"], "Rust");
    }

    #[test]
    fn test_archive_uses_patch() {
        let transport = MockTransport::new(&[(200, REPO_JSON), (200, "")]);
        let result = provider(transport.clone()).archive_repository("team", "repo", true);
        assert!(result.success);
        let requests = transport.requests();
        assert_eq!(requests[1].method, ApiMethod::Patch);
        assert_eq!(requests[1].body.as_ref().unwrap()["archived"], true);
    }
}
