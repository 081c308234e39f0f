//! GitLab REST v4 backend.
//!
//! "Do X": Run repository lifecycle operations against GitLab.
//!
//! Projects are addressed by their URL-encoded full path
//! (`namespace%2Frepo`), which doubles as the project id for info, archive,
//! and delete. Creation resolves the namespace id first; a namespace that
//! cannot be found means the project lands under the current user.

mod internal;

use std::sync::Arc;

use anyhow::Result;
use log::debug;
use url::Url;

use super::credentials::{lookup_token, SecretsStore};
use super::result::OperationResult;
use super::transport::{ApiRequest, AuthStyle, HttpTransport, RestTransport};
use super::types::{CloudProvider, CreateOptions, ProviderKind, RepositoryInfo};
use super::{absent_repository, log_archive_noop, GitHostingProvider};

pub struct GitLabProvider {
    instance_id: String,
    cloud: CloudProvider,
    base_api_url: Url,
    transport: Arc<dyn HttpTransport>,
}

impl GitLabProvider {
    pub fn new(host: &str, secrets: &dyn SecretsStore) -> Result<Self> {
        let host = host.trim().to_ascii_lowercase();
        let base_api_url = Url::parse(&format!("https://{host}/api/v4/"))?;
        let token = lookup_token(secrets, ProviderKind::GitLab, &host);
        let transport = Arc::new(RestTransport::new(
            base_api_url.clone(),
            token.map(|token| (AuthStyle::PrivateToken, token)),
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
            base_api_url: Url::parse(&format!("https://{host}/api/v4/")).expect("valid host"),
            instance_id: host,
            transport,
        }
    }

    /// URL-encoded project path, valid as a project id in the v4 API.
    fn project_id(owner: &str, name: &str) -> String {
        urlencoding::encode(&format!("{owner}/{name}")).into_owned()
    }

    /// Find the namespace id for `owner`. `Ok(None)` means "create under
    /// the current user"; hard failures are returned as results.
    fn resolve_namespace(&self, owner: &str) -> Result<Option<u64>, OperationResult> {
        let request = ApiRequest::get(format!(
            "namespaces?search={}",
            urlencoding::encode(owner)
        ));
        let response = match self.transport.execute(&request) {
            Ok(response) => response,
            Err(e) => {
                return Err(OperationResult::failed(format!(
                    "GitLab request failed: {e:#}"
                )))
            }
        };
        if response.status == 404 {
            return Ok(None);
        }
        if !response.is_success() {
            return Err(OperationResult::http_error(
                response.status,
                response.error_text(),
            ));
        }
        let namespaces: Vec<internal::GitLabNamespace> =
            match serde_json::from_str(&response.body) {
                Ok(namespaces) => namespaces,
                Err(e) => {
                    return Err(OperationResult::failed(format!(
                        "Unexpected GitLab namespace payload: {e}"
                    )))
                }
            };
        Ok(namespaces
            .into_iter()
            .find(|namespace| namespace.full_path.eq_ignore_ascii_case(owner))
            .map(|namespace| namespace.id))
    }
}

fn cloud_of(host: &str) -> CloudProvider {
    if host == "gitlab.com" {
        CloudProvider::GitLab
    } else {
        CloudProvider::Unknown
    }
}

impl GitHostingProvider for GitLabProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::GitLab
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
        let request = ApiRequest::get(format!("projects/{}", Self::project_id(owner, name)));
        let response = match self.transport.execute(&request) {
            Ok(response) => response,
            Err(e) => return OperationResult::failed(format!("GitLab request failed: {e:#}")),
        };
        if response.status == 404 {
            return absent_repository(&self.base_api_url, owner, name, must_exist);
        }
        if !response.is_success() {
            return OperationResult::http_error(response.status, response.error_text());
        }
        match serde_json::from_str::<internal::GitLabProject>(&response.body) {
            Ok(project) => OperationResult::ok_with(internal::into_info(project)),
            Err(e) => OperationResult::failed(format!("Unexpected GitLab project payload: {e}")),
        }
    }

    fn create_repository(&self, options: &CreateOptions) -> OperationResult {
        let namespace_id = match self.resolve_namespace(&options.owner) {
            Ok(id) => id,
            Err(failed) => return failed,
        };
        if namespace_id.is_none() {
            debug!(
                "Namespace '{}' not found on '{}'; creating under the current user.",
                options.owner, self.instance_id
            );
        }
        let request = ApiRequest::post("projects", internal::create_body(options, namespace_id));
        match self.transport.execute(&request) {
            Ok(response) if response.is_success() => OperationResult::ok(),
            Ok(response) => OperationResult::http_error(response.status, response.error_text()),
            Err(e) => OperationResult::failed(format!("GitLab request failed: {e:#}")),
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
            .is_some_and(|project| project.is_archived == archive)
        {
            log_archive_noop(&self.base_api_url, owner, name, archive);
            return OperationResult::ok();
        }
        let action = if archive { "archive" } else { "unarchive" };
        let request = ApiRequest::post_empty(format!(
            "projects/{}/{}",
            Self::project_id(owner, name),
            action
        ));
        match self.transport.execute(&request) {
            Ok(response) if response.is_success() => OperationResult::ok(),
            Ok(response) => OperationResult::http_error(response.status, response.error_text()),
            Err(e) => OperationResult::failed(format!("GitLab request failed: {e:#}")),
        }
    }

    fn delete_repository(&self, owner: &str, name: &str) -> OperationResult {
        let request = ApiRequest::delete(format!("projects/{}", Self::project_id(owner, name)));
        match self.transport.execute(&request) {
            // GitLab acknowledges deletion with 202 Accepted.
            Ok(response) if response.is_success() => OperationResult::ok(),
            Ok(response) => OperationResult::http_error(response.status, response.error_text()),
            Err(e) => OperationResult::failed(format!("GitLab request failed: {e:#}")),
        }
    }
}
