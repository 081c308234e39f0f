//! GitHub REST v3 backend.
//!
//! "Do X": Run repository lifecycle operations against GitHub.
//!
//! Serves both the cloud (`https://api.github.com/`) and enterprise
//! instances (`https://{host}/api/v3/`). Wire shapes live in internal.rs.
//! Empty-repository detection needs a secondary call: the repository
//! payload carries no such flag, so `git/refs/heads` is probed.

mod internal;

use std::sync::Arc;

use anyhow::Result;
use log::debug;
use serde_json::json;
use url::Url;

use super::credentials::{lookup_token, SecretsStore};
use super::result::OperationResult;
use super::transport::{ApiRequest, AuthStyle, HttpTransport, RestTransport};
use super::types::{CloudProvider, CreateOptions, ProviderKind, RepositoryInfo};
use super::{absent_repository, log_archive_noop, GitHostingProvider};

pub struct GitHubProvider {
    instance_id: String,
    cloud: CloudProvider,
    base_api_url: Url,
    transport: Arc<dyn HttpTransport>,
}

impl GitHubProvider {
    pub fn new(host: &str, secrets: &dyn SecretsStore) -> Result<Self> {
        let host = host.trim().to_ascii_lowercase();
        let base_api_url = api_base(&host)?;
        let token = lookup_token(secrets, ProviderKind::GitHub, &host);
        let transport = Arc::new(RestTransport::new(
            base_api_url.clone(),
            token.map(|token| (AuthStyle::TokenHeader, token)),
        )?);
        Ok(Self {
            cloud: cloud_of(&host),
            instance_id: host,
            base_api_url,
            transport,
        })
    }

    #[cfg(test)]
    pub(crate) fn with_transport(host: &str, transport: Arc<dyn HttpTransport>) -> Self {
        let host = host.to_ascii_lowercase();
        Self {
            cloud: cloud_of(&host),
            base_api_url: api_base(&host).expect("valid host"),
            instance_id: host,
            transport,
        }
    }

    /// Heuristic: a repository with no branch refs is empty. The refs
    /// endpoint answers 404 or 409 for repositories without any commit.
    fn probe_empty(&self, owner: &str, name: &str) -> bool {
        let request = ApiRequest::get(format!("repos/{owner}/{name}/git/refs/heads"));
        match self.transport.execute(&request) {
            Ok(response) if response.is_success() => {
                serde_json::from_str::<Vec<serde_json::Value>>(&response.body)
                    .map(|refs| refs.is_empty())
                    .unwrap_or(false)
            }
            Ok(response) => matches!(response.status, 404 | 409),
            Err(_) => false,
        }
    }
}

fn cloud_of(host: &str) -> CloudProvider {
    if host == "github.com" {
        CloudProvider::GitHub
    } else {
        CloudProvider::Unknown
    }
}

fn api_base(host: &str) -> Result<Url> {
    let base = if host == "github.com" {
        "https://api.github.com/".to_string()
    } else {
        format!("https://{host}/api/v3/")
    };
    Ok(Url::parse(&base)?)
}

impl GitHostingProvider for GitHubProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::GitHub
    }

    fn cloud(&self) -> CloudProvider {
        self.cloud
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
            Err(e) => return OperationResult::failed(format!("GitHub request failed: {e:#}")),
        };
        if response.status == 404 {
            return absent_repository(&self.base_api_url, owner, name, must_exist);
        }
        if !response.is_success() {
            return OperationResult::http_error(response.status, response.error_text());
        }
        let repo: internal::GitHubRepo = match serde_json::from_str(&response.body) {
            Ok(repo) => repo,
            Err(e) => {
                return OperationResult::failed(format!(
                    "Unexpected GitHub repository payload: {e}"
                ))
            }
        };
        let is_empty = self.probe_empty(owner, name);
        OperationResult::ok_with(internal::into_info(repo, is_empty))
    }

    fn create_repository(&self, options: &CreateOptions) -> OperationResult {
        let body = internal::create_body(options);
        let org_request = ApiRequest::post(format!("orgs/{}/repos", options.owner), body.clone());
        let mut response = match self.transport.execute(&org_request) {
            Ok(response) => response,
            Err(e) => return OperationResult::failed(format!("GitHub request failed: {e:#}")),
        };
        if response.status == 404 {
            // Owner is not an organization; retry in the authenticated
            // user's namespace.
            debug!(
                "Organization '{}' not found on '{}'; creating under the authenticated user.",
                options.owner, self.instance_id
            );
            response = match self.transport.execute(&ApiRequest::post("user/repos", body)) {
                Ok(response) => response,
                Err(e) => return OperationResult::failed(format!("GitHub request failed: {e:#}")),
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
            Err(e) => OperationResult::failed(format!("GitHub request failed: {e:#}")),
        }
    }

    fn delete_repository(&self, owner: &str, name: &str) -> OperationResult {
        let request = ApiRequest::delete(format!("repos/{owner}/{name}"));
        match self.transport.execute(&request) {
            Ok(response) if matches!(response.status, 200 | 204) => OperationResult::ok(),
            Ok(response) => OperationResult::http_error(response.status, response.error_text()),
            Err(e) => OperationResult::failed(format!("GitHub request failed: {e:#}")),
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
        "full_name": "owner/repo",
        "owner": { "login": "owner" },
        "description": "a test repository",
        "private": true,
        "archived": false,
        "default_branch": "main",
        "clone_url": "https://github.com/owner/repo.git",
        "ssh_url": "git@github.com:owner/repo.git",
        "html_url": "https://github.com/owner/repo",
        "created_at": "2023-01-10T08:00:00Z",
        "updated_at": "2024-06-01T12:30:00Z"
    }"#;

    const ARCHIVED_REPO_JSON: &str = r#"{
        "name": "repo",
        "full_name": "owner/repo",
        "owner": { "login": "owner" },
        "archived": true,
        "default_branch": "main"
    }"#;

    fn provider(transport: Arc<MockTransport>) -> GitHubProvider {
        GitHubProvider::with_transport("github.com", transport)
    }

    #[test]
    fn test_identity_flags() {
        let cloud = provider(MockTransport::new(&[]));
        assert_eq!(cloud.kind(), ProviderKind::GitHub);
        assert_eq!(cloud.cloud(), CloudProvider::GitHub);
        assert_eq!(cloud.base_api_url().as_str(), "https://api.github.com/");
        assert!(cloud.base_api_url().as_str().ends_with('/'));
        assert!(cloud.can_archive());
        assert!(!cloud.is_default_public());

        let enterprise =
            GitHubProvider::with_transport("github.company.com", MockTransport::new(&[]));
        assert_eq!(enterprise.cloud(), CloudProvider::Unknown);
        assert_eq!(
            enterprise.base_api_url().as_str(),
            "https://github.company.com/api/v3/"
        );
    }

    #[test]
    fn test_info_maps_every_field() {
        let transport = MockTransport::new(&[
            (200, REPO_JSON),
            (200, r#"[{"ref": "refs/heads/main"}]"#),
        ]);
        let info = provider(transport.clone()).repository_info("owner", "repo", true);
        assert!(info.success);
        let repo = info.data.unwrap();
        assert!(repo.exists);
        assert_eq!(repo.repo_path, "owner/repo");
        assert_eq!(repo.owner, "owner");
        assert_eq!(repo.name, "repo");
        assert_eq!(repo.description.as_deref(), Some("a test repository"));
        assert!(repo.is_private);
        assert!(!repo.is_archived);
        assert!(!repo.is_empty);
        assert_eq!(repo.default_branch.as_deref(), Some("main"));
        assert_eq!(
            repo.clone_url_https.as_deref(),
            Some("https://github.com/owner/repo.git")
        );
        assert!(repo.created_at.is_some());
        assert!(repo.updated_at.is_some());

        let requests = transport.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].path, "repos/owner/repo");
        assert_eq!(requests[1].path, "repos/owner/repo/git/refs/heads");
    }

    #[test]
    fn test_empty_detection_variants() {
        // Empty ref list.
        let transport = MockTransport::new(&[(200, REPO_JSON), (200, "[]")]);
        let info = provider(transport).repository_info("owner", "repo", true);
        assert!(info.data.unwrap().is_empty);

        // 409 from the refs endpoint also means empty.
        let transport = MockTransport::new(&[(200, REPO_JSON), (409, "")]);
        let info = provider(transport).repository_info("owner", "repo", true);
        assert!(info.data.unwrap().is_empty);

        // 404 likewise.
        let transport = MockTransport::new(&[(200, REPO_JSON), (404, "")]);
        let info = provider(transport).repository_info("owner", "repo", true);
        assert!(info.data.unwrap().is_empty);
    }

    #[test]
    fn test_absent_repository_default_shape() {
        let transport = MockTransport::new(&[(404, r#"{"message": "Not Found"}"#)]);
        let info = provider(transport).repository_info("owner", "gone", false);
        assert!(info.success);
        let repo = info.data.unwrap();
        assert!(!repo.exists);
        assert!(repo.repo_path.is_empty());
        assert!(!repo.is_private);
        assert!(!repo.is_archived);
        assert!(repo.web_url.is_none());
        assert!(repo.clone_url_https.is_none());
        assert!(repo.created_at.is_none());
        assert!(repo.updated_at.is_none());
    }

    #[test]
    fn test_missing_repository_logs_contract_message() {
        testing_logger::setup();
        let transport = MockTransport::new(&[(404, r#"{"message": "Not Found"}"#)]);
        let info = provider(transport).repository_info("owner", "gone", true);
        assert!(!info.success);
        assert!(info.is_not_found());
        testing_logger::validate(|captured| {
            assert!(captured.iter().any(|entry| {
                entry.level == log::Level::Error
                    && entry.body
                        == "Expected Git repository at 'https://api.github.com/owner/gone' is missing."
            }));
        });
    }

    #[test]
    fn test_create_falls_back_to_user_namespace() {
        let transport = MockTransport::new(&[
            (404, r#"{"message": "Not Found"}"#),
            (201, r#"{"name": "repo"}"#),
        ]);
        let options = CreateOptions {
            owner: "user".to_string(),
            name: "repo".to_string(),
            ..Default::default()
        };
        let result = provider(transport.clone()).create_repository(&options);
        assert!(result.success);

        let requests = transport.requests();
        assert_eq!(requests.len(), 2, "exactly two HTTP requests expected");
        assert_eq!(requests[0].path, "orgs/user/repos");
        assert_eq!(requests[1].path, "user/repos");
        assert_eq!(requests[1].method, ApiMethod::Post);
    }

    #[test]
    fn test_create_conflict_is_a_failed_result() {
        let transport =
            MockTransport::new(&[(422, r#"{"message": "name already exists on this account"}"#)]);
        let options = CreateOptions {
            owner: "org".to_string(),
            name: "repo".to_string(),
            ..Default::default()
        };
        let result = provider(transport).create_repository(&options);
        assert!(!result.success);
        assert_eq!(result.http_status, Some(422));
        assert!(result.error_message.unwrap().contains("already exists"));
    }

    #[test]
    fn test_archive_is_idempotent() {
        testing_logger::setup();
        // First call: repository not archived yet, PATCH goes out.
        let transport = MockTransport::new(&[
            (200, REPO_JSON),
            (200, r#"[{"ref": "refs/heads/main"}]"#),
            (200, ARCHIVED_REPO_JSON),
        ]);
        let result = provider(transport.clone()).archive_repository("owner", "repo", true);
        assert!(result.success);
        assert!(transport
            .requests()
            .iter()
            .any(|request| request.method == ApiMethod::Patch));

        // Second call: already archived, no state-changing request.
        let transport = MockTransport::new(&[
            (200, ARCHIVED_REPO_JSON),
            (200, r#"[{"ref": "refs/heads/main"}]"#),
        ]);
        let result = provider(transport.clone()).archive_repository("owner", "repo", true);
        assert!(result.success);
        assert!(transport
            .requests()
            .iter()
            .all(|request| request.method == ApiMethod::Get));
        testing_logger::validate(|captured| {
            assert!(captured.iter().any(|entry| {
                entry.level == log::Level::Info
                    && entry.body
                        == "Repository 'https://api.github.com/owner/repo' is already archived."
            }));
        });
    }

    #[test]
    fn test_delete_without_admin_rights() {
        let transport = MockTransport::new(&[(
            403,
            r#"{"message": "Must have admin rights to Repository."}"#,
        )]);
        let result = provider(transport).delete_repository("owner", "repo");
        assert!(!result.success);
        assert!(result.is_authentication_error());
        assert!(result.error_message.unwrap().contains("admin rights"));
    }

    #[test]
    fn test_delete_success_on_204() {
        let transport = MockTransport::new(&[(204, "")]);
        let result = provider(transport.clone()).delete_repository("owner", "repo");
        assert!(result.success);
        assert_eq!(transport.requests()[0].method, ApiMethod::Delete);
    }

    #[test]
    fn test_parse_remote_url_checks_host() {
        let github = provider(MockTransport::new(&[]));
        let parsed = github.parse_remote_url("git@github.com:owner/repo.git").unwrap();
        assert_eq!(parsed.owner, "owner");
        assert_eq!(parsed.repo_name, "repo");

        assert!(github
            .parse_remote_url("git@gitlab.com:owner/repo.git")
            .is_none());
    }
}
