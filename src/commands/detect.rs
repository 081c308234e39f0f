use anyhow::Result;
use colored::Colorize;

use ckli_hosting::GitHostingProvider;

use crate::commands::provider_for;

pub fn execute(remote_url: &str, provider_name: Option<&str>, api_url: Option<&str>) -> Result<()> {
    let provider = provider_for(remote_url, provider_name, api_url)?;

    println!("{} {}", "Provider:".bold(), provider.kind());
    println!("{} {}", "Instance:".bold(), provider.instance_id());
    println!("{} {}", "Cloud:".bold(), provider.cloud());
    println!("{} {}", "API base:".bold(), provider.base_api_url());
    println!(
        "{} default visibility {}, archiving {}",
        "Capabilities:".bold(),
        if provider.is_default_public() {
            "public"
        } else {
            "private"
        },
        if provider.can_archive() {
            "supported"
        } else {
            "unsupported"
        }
    );
    Ok(())
}
