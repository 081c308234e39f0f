//! GitHub REST v3 wire shapes and payload mapping.
//!
//! Matches the JSON the API actually returns; not exposed outside the
//! backend. Gitea intentionally does not share these types even though its
//! payloads look similar - the two APIs drift independently.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::hosting::types::{CreateOptions, RepositoryInfo};

#[derive(Debug, Deserialize)]
pub(crate) struct GitHubRepo {
    pub name: String,
    pub full_name: String,
    pub owner: GitHubAccount,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub private: bool,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub default_branch: Option<String>,
    #[serde(default)]
    pub clone_url: Option<String>,
    #[serde(default)]
    pub ssh_url: Option<String>,
    #[serde(default)]
    pub html_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GitHubAccount {
    pub login: String,
}

pub(crate) fn into_info(repo: GitHubRepo, is_empty: bool) -> RepositoryInfo {
    RepositoryInfo {
        exists: true,
        repo_path: repo.full_name,
        owner: repo.owner.login,
        name: repo.name,
        description: repo.description,
        is_private: repo.private,
        is_archived: repo.archived,
        is_empty,
        default_branch: repo.default_branch,
        clone_url_https: repo.clone_url,
        clone_url_ssh: repo.ssh_url,
        web_url: repo.html_url,
        created_at: repo.created_at,
        updated_at: repo.updated_at,
    }
}

pub(crate) fn create_body(options: &CreateOptions) -> Value {
    let mut body = json!({
        "name": options.name,
        "private": options.private,
        "auto_init": options.auto_init,
    });
    if let Some(description) = &options.description {
        body["description"] = json!(description);
    }
    if let Some(template) = &options.gitignore_template {
        body["gitignore_template"] = json!(template);
    }
    if let Some(template) = &options.license_template {
        body["license_template"] = json!(template);
    }
    body
}
