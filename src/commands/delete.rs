use anyhow::{bail, Result};
use colored::Colorize;

use ckli_hosting::GitHostingProvider;

use crate::commands::{coordinates, finish, provider_for};

pub fn execute(
    remote_url: &str,
    provider_name: Option<&str>,
    api_url: Option<&str>,
    yes: bool,
) -> Result<()> {
    let provider = provider_for(remote_url, provider_name, api_url)?;
    let (owner, name) = coordinates(provider.as_ref(), remote_url)?;

    if !yes {
        bail!(
            "Refusing to delete '{owner}/{name}' on {} without --yes.",
            provider.instance_id()
        );
    }
    finish(provider.delete_repository(&owner, &name))?;
    println!(
        "{} Deleted '{owner}/{name}' on {}.",
        "✓".green(),
        provider.instance_id()
    );
    Ok(())
}
