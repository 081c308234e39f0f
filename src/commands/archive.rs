use anyhow::Result;
use colored::Colorize;

use ckli_hosting::GitHostingProvider;

use crate::commands::{coordinates, finish, provider_for};

pub fn execute(
    remote_url: &str,
    provider_name: Option<&str>,
    api_url: Option<&str>,
    restore: bool,
) -> Result<()> {
    let provider = provider_for(remote_url, provider_name, api_url)?;
    let (owner, name) = coordinates(provider.as_ref(), remote_url)?;

    finish(provider.archive_repository(&owner, &name, !restore))?;
    println!(
        "{} {} '{owner}/{name}' on {}.",
        "✓".green(),
        if restore { "Restored" } else { "Archived" },
        provider.instance_id()
    );
    Ok(())
}
