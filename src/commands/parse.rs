use anyhow::{bail, Result};

use ckli_hosting::remote_url;

pub fn execute(remote_url_text: &str) -> Result<()> {
    let Some(parsed) = remote_url::parse(remote_url_text) else {
        bail!("'{remote_url_text}' is not a recognizable Git remote URL.");
    };
    println!("Host:  {}", parsed.host);
    println!("Owner: {}", parsed.owner);
    println!("Name:  {}", parsed.repo_name);
    println!(
        "HTTPS: {}",
        remote_url::normalize_to_https(remote_url_text)
            .map(|url| url.to_string())
            .unwrap_or_default()
    );
    Ok(())
}
