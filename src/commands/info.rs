use anyhow::{bail, Result};
use colored::Colorize;

use ckli_hosting::{GitHostingProvider, RepositoryInfo};

use crate::commands::{coordinates, provider_for};

pub fn execute(
    remote_url: &str,
    provider_name: Option<&str>,
    api_url: Option<&str>,
    must_exist: bool,
    json: bool,
) -> Result<()> {
    let provider = provider_for(remote_url, provider_name, api_url)?;
    let (owner, name) = coordinates(provider.as_ref(), remote_url)?;

    let result = provider.repository_info(&owner, &name, must_exist);
    if !result.success {
        let message = result
            .error_message
            .unwrap_or_else(|| "Lookup failed.".to_string());
        match result.http_status {
            Some(status) => bail!("{message} (HTTP {status})"),
            None => bail!("{message}"),
        }
    }
    let Some(repo) = result.data else {
        bail!("The provider returned no repository data.");
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&repo)?);
        return Ok(());
    }
    print_info(&repo);
    Ok(())
}

fn print_info(repo: &RepositoryInfo) {
    if !repo.exists {
        println!("{}", "Repository does not exist.".yellow());
        return;
    }
    println!("{} {}", "Repository:".bold(), repo.repo_path);
    println!(
        "{} {}{}{}",
        "State:".bold(),
        if repo.is_private { "private" } else { "public" },
        if repo.is_archived { ", archived" } else { "" },
        if repo.is_empty { ", empty" } else { "" }
    );
    if let Some(description) = &repo.description {
        println!("{} {description}", "Description:".bold());
    }
    if let Some(branch) = &repo.default_branch {
        println!("{} {branch}", "Default branch:".bold());
    }
    if let Some(url) = &repo.clone_url_https {
        println!("{} {url}", "Clone (https):".bold());
    }
    if let Some(url) = &repo.clone_url_ssh {
        println!("{} {url}", "Clone (ssh):".bold());
    }
    if let Some(url) = &repo.web_url {
        println!("{} {url}", "Web:".bold());
    }
    if let Some(created) = repo.created_at {
        println!("{} {created}", "Created:".bold());
    }
    if let Some(updated) = repo.updated_at {
        println!("{} {updated}", "Updated:".bold());
    }
}
