//! GitLab REST v4 wire shapes and payload mapping.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::hosting::types::{CreateOptions, RepositoryInfo};

#[derive(Debug, Deserialize)]
pub(crate) struct GitLabProject {
    pub path_with_namespace: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub visibility: Option<String>,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub empty_repo: bool,
    #[serde(default)]
    pub default_branch: Option<String>,
    #[serde(default)]
    pub http_url_to_repo: Option<String>,
    #[serde(default)]
    pub ssh_url_to_repo: Option<String>,
    #[serde(default)]
    pub web_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_activity_at: Option<DateTime<Utc>>,
}

/// Namespace entry from `GET namespaces?search=`.
#[derive(Debug, Deserialize)]
pub(crate) struct GitLabNamespace {
    pub id: u64,
    pub full_path: String,
}

pub(crate) fn into_info(project: GitLabProject) -> RepositoryInfo {
    // The namespace path is the owner; the final segment is the project.
    let (owner, name) = project
        .path_with_namespace
        .rsplit_once('/')
        .map(|(owner, name)| (owner.to_string(), name.to_string()))
        .unwrap_or_else(|| (String::new(), project.path_with_namespace.clone()));
    RepositoryInfo {
        exists: true,
        repo_path: project.path_with_namespace,
        owner,
        name,
        description: project.description,
        is_private: project.visibility.as_deref() != Some("public"),
        is_archived: project.archived,
        is_empty: project.empty_repo,
        default_branch: project.default_branch,
        clone_url_https: project.http_url_to_repo,
        clone_url_ssh: project.ssh_url_to_repo,
        web_url: project.web_url,
        created_at: project.created_at,
        updated_at: project.last_activity_at,
    }
}

pub(crate) fn create_body(options: &CreateOptions, namespace_id: Option<u64>) -> Value {
    let visibility = if options.private { "private" } else { "public" };
    let mut body = json!({
        "name": options.name,
        "path": options.name,
        "visibility": visibility,
        "initialize_with_readme": options.auto_init,
    });
    if let Some(description) = &options.description {
        body["description"] = json!(description);
    }
    if let Some(id) = namespace_id {
        body["namespace_id"] = json!(id);
    }
    // gitignore/license templates have no GitLab equivalent here and are
    // silently ignored.
    body
}
