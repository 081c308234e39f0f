//! Local filesystem pseudo-provider for bare repositories.
//!
//! "Do X": Manage bare Git repositories on the local disk.
//!
//! No network and no HTTP: a repository is a bare directory
//! `{owner}/{name}.git`, where `owner` is a local directory path. One
//! instance serves the whole process - the provider has no host-specific
//! state, only `is_default_public = true` and the `file://` base URL.
//! Validation failures (destination exists, nested repository, `.git`
//! suffix) are failed results like everywhere else, never panics.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use log::{debug, error};
use url::Url;

use super::result::OperationResult;
use super::types::{CloudProvider, CreateOptions, ProviderKind, RepositoryInfo};
use super::GitHostingProvider;

pub struct FileSystemProvider {
    base_url: Url,
}

static SHARED: OnceLock<Arc<FileSystemProvider>> = OnceLock::new();

impl FileSystemProvider {
    /// The process-wide instance. Local paths and visibility flags carry no
    /// per-instance state, so one provider serves every local stack.
    pub fn shared() -> Arc<FileSystemProvider> {
        SHARED
            .get_or_init(|| {
                Arc::new(FileSystemProvider {
                    base_url: Url::parse("file:///").expect("literal URL"),
                })
            })
            .clone()
    }

    fn repo_dir(owner: &str, name: &str) -> PathBuf {
        Path::new(owner).join(format!("{name}.git"))
    }
}

/// A directory qualifies as a bare repository when it carries the minimal
/// `git init --bare` layout.
fn is_bare_repository(dir: &Path) -> bool {
    dir.join("HEAD").is_file() && dir.join("objects").is_dir() && dir.join("refs").is_dir()
}

/// The branch `HEAD` points at, if it is a symbolic ref.
fn head_branch(dir: &Path) -> Option<String> {
    let head = fs::read_to_string(dir.join("HEAD")).ok()?;
    head.trim()
        .strip_prefix("ref: refs/heads/")
        .map(|branch| branch.to_string())
}

/// Reject a destination that sits inside an existing repository.
fn repository_ancestor(dir: &Path) -> Option<PathBuf> {
    dir.ancestors()
        .skip(1)
        .find(|ancestor| {
            ancestor
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.ends_with(".git"))
        })
        .map(|ancestor| ancestor.to_path_buf())
}

fn init_bare(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir.join("objects").join("info"))?;
    fs::create_dir_all(dir.join("objects").join("pack"))?;
    fs::create_dir_all(dir.join("refs").join("heads"))?;
    fs::create_dir_all(dir.join("refs").join("tags"))?;
    fs::write(dir.join("HEAD"), "ref: refs/heads/main\n")
        .with_context(|| format!("Failed to write HEAD in '{}'", dir.display()))?;
    fs::write(
        dir.join("config"),
        "[core]\n\trepositoryformatversion = 0\n\tfilemode = true\n\tbare = true\n",
    )
    .with_context(|| format!("Failed to write config in '{}'", dir.display()))?;
    Ok(())
}

fn fs_time(time: std::io::Result<std::time::SystemTime>) -> Option<DateTime<Utc>> {
    time.ok().map(DateTime::<Utc>::from)
}

impl GitHostingProvider for FileSystemProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::FileSystem
    }

    fn cloud(&self) -> CloudProvider {
        CloudProvider::Unknown
    }

    fn instance_id(&self) -> &str {
        "filesystem"
    }

    fn base_api_url(&self) -> &Url {
        &self.base_url
    }

    fn is_default_public(&self) -> bool {
        true
    }

    fn can_archive(&self) -> bool {
        false
    }

    fn repository_info(
        &self,
        owner: &str,
        name: &str,
        must_exist: bool,
    ) -> OperationResult<RepositoryInfo> {
        let dir = Self::repo_dir(owner, name);
        if !is_bare_repository(&dir) {
            if must_exist {
                error!("Expected Git repository at '{}' is missing.", dir.display());
                return OperationResult::failed(format!(
                    "Repository '{}' not found.",
                    dir.display()
                ));
            }
            return OperationResult::ok_with(RepositoryInfo::absent());
        }

        let clone_url = dir
            .canonicalize()
            .ok()
            .and_then(|absolute| Url::from_file_path(absolute).ok())
            .map(|url| url.to_string());
        let metadata = fs::metadata(&dir);
        let (created_at, updated_at) = match metadata {
            Ok(metadata) => (fs_time(metadata.created()), fs_time(metadata.modified())),
            Err(_) => (None, None),
        };
        OperationResult::ok_with(RepositoryInfo {
            exists: true,
            repo_path: format!("{owner}/{name}"),
            owner: owner.to_string(),
            name: name.to_string(),
            description: None,
            is_private: false,
            is_archived: false,
            // A local bare repository counts as non-empty once created.
            is_empty: false,
            default_branch: head_branch(&dir),
            clone_url_https: None,
            clone_url_ssh: clone_url.clone(),
            web_url: clone_url,
            created_at,
            updated_at,
        })
    }

    fn create_repository(&self, options: &CreateOptions) -> OperationResult {
        if options.name.ends_with(".git") {
            return OperationResult::failed(format!(
                "Repository name '{}' must not end in '.git'.",
                options.name
            ));
        }
        let dir = Self::repo_dir(&options.owner, &options.name);
        if dir.exists() {
            return OperationResult::failed(format!(
                "Destination '{}' already exists.",
                dir.display()
            ));
        }
        if let Some(ancestor) = repository_ancestor(&dir) {
            return OperationResult::failed(format!(
                "Destination '{}' is nested inside the Git repository '{}'.",
                dir.display(),
                ancestor.display()
            ));
        }
        // Description, visibility, and templates have no meaning on disk
        // and are ignored.
        match init_bare(&dir) {
            Ok(()) => {
                debug!("Created bare repository at '{}'.", dir.display());
                OperationResult::ok()
            }
            Err(e) => OperationResult::failed(format!(
                "Failed to create bare repository at '{}': {e:#}",
                dir.display()
            )),
        }
    }

    fn archive_repository(&self, _owner: &str, _name: &str, _archive: bool) -> OperationResult {
        OperationResult::failed("The filesystem provider does not support archiving repositories.")
    }

    fn delete_repository(&self, owner: &str, name: &str) -> OperationResult {
        let dir = Self::repo_dir(owner, name);
        if !is_bare_repository(&dir) {
            error!("Expected Git repository at '{}' is missing.", dir.display());
            return OperationResult::failed(format!("Repository '{}' not found.", dir.display()));
        }
        match fs::remove_dir_all(&dir) {
            Ok(()) => {
                debug!("Deleted repository '{}'.", dir.display());
                OperationResult::ok()
            }
            Err(e) => OperationResult::failed(format!(
                "Failed to delete repository '{}': {e}",
                dir.display()
            )),
        }
    }
}
