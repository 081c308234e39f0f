use anyhow::Result;
use colored::Colorize;

use ckli_hosting::hosting::CreateOptions;
use ckli_hosting::GitHostingProvider;

use crate::commands::{coordinates, finish, provider_for};

pub fn execute(
    remote_url: &str,
    provider_name: Option<&str>,
    api_url: Option<&str>,
    description: Option<String>,
    private: bool,
    auto_init: bool,
) -> Result<()> {
    let provider = provider_for(remote_url, provider_name, api_url)?;
    let (owner, name) = coordinates(provider.as_ref(), remote_url)?;

    // --private forces private; otherwise the provider default wins.
    let options = CreateOptions {
        owner: owner.clone(),
        name: name.clone(),
        description,
        private: private || !provider.is_default_public(),
        auto_init,
        ..Default::default()
    };
    finish(provider.create_repository(&options))?;
    println!(
        "{} Created '{owner}/{name}' on {}.",
        "✓".green(),
        provider.instance_id()
    );
    Ok(())
}
