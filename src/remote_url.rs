//! Git remote URL parsing and normalization.
//!
//! "Do X": Reduce any supported remote-URL dialect to canonical hosting
//! coordinates.
//!
//! Supported dialects:
//! - `https://host/owner/repo[.git]` (and `http://`, upgraded to https)
//! - SCP-style `user@host:owner/repo[.git]`
//! - `ssh://user@host[:port]/owner/repo[.git]`
//! - schemeless `host/owner/repo[.git]`
//!
//! The https form is treated as already canonical: its `.git` suffix is kept
//! verbatim. The SSH-ish and schemeless forms strip `.git` and drop any SSH
//! port, so the normalized URL always addresses the default HTTPS port.

use url::Url;

/// A remote URL split into its hosting coordinates.
///
/// `owner` may contain `/` for nested group paths (GitLab subgroups).
/// Parsing either succeeds completely or yields nothing; a `ParsedRemote` is
/// never partially populated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRemote {
    pub host: String,
    pub owner: String,
    pub repo_name: String,
}

/// Normalize any supported dialect to an https URL.
///
/// Returns `None` for empty, whitespace-only, or unparseable input.
pub fn normalize_to_https(input: &str) -> Option<Url> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    let lower = input.to_ascii_lowercase();

    // Already-canonical web forms: upgrade the scheme, keep the path verbatim
    // (including a `.git` suffix).
    if lower.starts_with("https://") || lower.starts_with("http://") {
        let mut url = Url::parse(input).ok()?;
        url.host_str()?;
        if url.scheme() == "http" {
            url.set_scheme("https").ok()?;
        }
        return Some(url);
    }

    // ssh://user@host[:port]/owner/repo[.git] - user and port are discarded.
    if lower.starts_with("ssh://") {
        let url = Url::parse(input).ok()?;
        let host = url.host_str()?.to_ascii_lowercase();
        let path = clean_path(url.path());
        if path.is_empty() {
            return None;
        }
        return Url::parse(&format!("https://{}/{}", host, path)).ok();
    }

    // SCP-style user@host:owner/repo[.git].
    if let Some((user_host, path)) = input.split_once(':') {
        if let Some((_, host)) = user_host.split_once('@') {
            if !host.is_empty() && !host.contains('/') {
                let path = clean_path(path);
                if path.is_empty() {
                    return None;
                }
                return Url::parse(&format!("https://{}/{}", host.to_ascii_lowercase(), path))
                    .ok();
            }
        }
    }

    // Schemeless host/owner/repo[.git].
    let (host, path) = input.split_once('/')?;
    let host = host.trim();
    let path = clean_path(path);
    if host.is_empty() || host.contains('@') || path.is_empty() {
        return None;
    }
    Url::parse(&format!("https://{}/{}", host.to_ascii_lowercase(), path)).ok()
}

/// Extract the lowercased hostname from any supported dialect, port
/// stripped.
///
/// Returns `None` when no recognizable host+path structure exists (a bare
/// word, only punctuation, ...).
pub fn host_of(input: &str) -> Option<String> {
    let url = normalize_to_https(input)?;
    Some(url.host_str()?.to_ascii_lowercase())
}

/// Split a `/`-delimited path into `(owner, repo_name)`.
///
/// Leading/trailing slashes are ignored and a final `.git` suffix is
/// stripped. The owner is every segment but the last, joined with `/`; at
/// least two non-empty segments are required.
pub fn split_owner_repo(path: &str) -> Option<(String, String)> {
    let cleaned = clean_path(path);
    if cleaned.is_empty() {
        return None;
    }
    let mut segments: Vec<&str> = cleaned.split('/').collect();
    if segments.len() < 2 {
        return None;
    }
    let repo = segments.pop()?;
    Some((segments.join("/"), repo.to_string()))
}

/// Parse a remote URL straight into hosting coordinates.
pub fn parse(input: &str) -> Option<ParsedRemote> {
    let url = normalize_to_https(input)?;
    let host = url.host_str()?.to_ascii_lowercase();
    let (owner, repo_name) = split_owner_repo(url.path())?;
    Some(ParsedRemote {
        host,
        owner,
        repo_name,
    })
}

/// Trim surrounding slashes, strip a final `.git`, collapse empty segments.
fn clean_path(path: &str) -> String {
    let trimmed = path.trim().trim_matches('/');
    let trimmed = trimmed.strip_suffix(".git").unwrap_or(trimmed);
    trimmed
        .split('/')
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_https_keeps_git_suffix() {
        let url = normalize_to_https("https://github.com/owner/repo.git").unwrap();
        assert_eq!(url.as_str(), "https://github.com/owner/repo.git");
    }

    #[test]
    fn test_normalize_upgrades_http() {
        let url = normalize_to_https("http://gitlab.internal.org/group/repo").unwrap();
        assert_eq!(url.as_str(), "https://gitlab.internal.org/group/repo");
    }

    #[test]
    fn test_normalize_scp_style() {
        let url = normalize_to_https("git@github.com:owner/repo.git").unwrap();
        assert_eq!(url.as_str(), "https://github.com/owner/repo");
    }

    #[test]
    fn test_normalize_ssh_drops_user_and_port() {
        let url = normalize_to_https("ssh://git@gitea.company.com:2222/owner/repo.git").unwrap();
        assert_eq!(url.as_str(), "https://gitea.company.com/owner/repo");
    }

    #[test]
    fn test_normalize_schemeless() {
        let url = normalize_to_https("github.com/owner/repo.git").unwrap();
        assert_eq!(url.as_str(), "https://github.com/owner/repo");

        // Trailing slashes collapse.
        let url = normalize_to_https("github.com/owner/repo///").unwrap();
        assert_eq!(url.as_str(), "https://github.com/owner/repo");
    }

    #[test]
    fn test_normalize_trims_whitespace() {
        let url = normalize_to_https("  git@github.com:owner/repo.git\n").unwrap();
        assert_eq!(url.as_str(), "https://github.com/owner/repo");
    }

    #[test]
    fn test_normalize_rejects_garbage() {
        assert!(normalize_to_https("").is_none());
        assert!(normalize_to_https("   ").is_none());
        assert!(normalize_to_https("justaword").is_none());
        assert!(normalize_to_https("://").is_none());
        assert!(normalize_to_https("git@github.com:").is_none());
    }

    #[test]
    fn test_host_of_drops_port() {
        assert_eq!(
            host_of("https://github.company.com:8443/owner/repo").as_deref(),
            Some("github.company.com")
        );
        assert_eq!(
            host_of("ssh://git@gitlab.com:2222/group/repo.git").as_deref(),
            Some("gitlab.com")
        );
    }

    #[test]
    fn test_host_of_lowercases() {
        assert_eq!(
            host_of("GIT@GitHub.COM:Owner/Repo.git").as_deref(),
            Some("github.com")
        );
    }

    #[test]
    fn test_host_of_rejects_bare_word() {
        assert!(host_of("github").is_none());
        assert!(host_of("///").is_none());
    }

    #[test]
    fn test_split_owner_repo() {
        assert_eq!(
            split_owner_repo("/owner/repo.git"),
            Some(("owner".to_string(), "repo".to_string()))
        );
        assert_eq!(
            split_owner_repo("group/sub/repo"),
            Some(("group/sub".to_string(), "repo".to_string()))
        );
    }

    #[test]
    fn test_split_owner_repo_requires_two_segments() {
        assert!(split_owner_repo("").is_none());
        assert!(split_owner_repo("repo").is_none());
        assert!(split_owner_repo("/repo/").is_none());
        assert!(split_owner_repo("////").is_none());
    }

    #[test]
    fn test_parse_nested_groups() {
        let parsed = parse("git@gitlab.com:group/sub/repo.git").unwrap();
        assert_eq!(parsed.host, "gitlab.com");
        assert_eq!(parsed.owner, "group/sub");
        assert_eq!(parsed.repo_name, "repo");
    }

    #[test]
    fn test_round_trip_across_dialects() {
        // Normalize-then-split must agree with direct parsing for every
        // dialect of the same remote.
        let dialects = [
            "https://github.com/owner/repo.git",
            "http://github.com/owner/repo",
            "git@github.com:owner/repo.git",
            "ssh://git@github.com/owner/repo.git",
            "ssh://git@github.com:22/owner/repo",
            "github.com/owner/repo.git",
        ];
        for dialect in dialects {
            let normalized = normalize_to_https(dialect).unwrap();
            let (owner, repo) = split_owner_repo(normalized.path()).unwrap();
            assert_eq!(owner, "owner", "input: {dialect}");
            assert_eq!(repo, "repo", "input: {dialect}");

            let parsed = parse(dialect).unwrap();
            assert_eq!(parsed.owner, "owner", "input: {dialect}");
            assert_eq!(parsed.repo_name, "repo", "input: {dialect}");
            assert_eq!(parsed.host, "github.com", "input: {dialect}");
        }
    }
}
