//! Remote URL handling: short-notation expansion, validation, and the
//! mapping from a clone URL to its provider/owner/name path under the root.

use url::Url;

use crate::error::{AppError, Result};

const PROVIDERS: &[(&str, &str)] = &[
    ("github", "github.com"),
    ("gitlab", "gitlab.com"),
    ("bitbucket", "bitbucket.org"),
];

const ABBREVIATIONS: &[(&str, &str)] = &[
    ("gh", "github.com"),
    ("gl", "gitlab.com"),
    ("bb", "bitbucket.org"),
    // Bare "git" is ambiguous between providers; default to the most common.
    ("git", "github.com"),
];

/// Expand short notation like `gh:user/repo` into a full https URL.
///
/// Exact provider names match first, then unique provider prefixes
/// (`gitl:` → gitlab.com), then fixed abbreviations. Anything unrecognized
/// passes through unchanged.
pub fn expand_short_notation(input: &str) -> String {
    let Some((prefix, path)) = input.split_once(':') else {
        return input.to_string();
    };
    if prefix.is_empty() || path.is_empty() || input.contains("://") || input.starts_with("git@") {
        return input.to_string();
    }

    let prefix = prefix.to_lowercase();

    for (name, domain) in PROVIDERS {
        if prefix == *name {
            return format!("https://{}/{}", domain, path);
        }
    }

    let matches: Vec<&str> = PROVIDERS
        .iter()
        .filter(|(name, _)| name.starts_with(&prefix))
        .map(|(_, domain)| *domain)
        .collect();
    if matches.len() == 1 {
        return format!("https://{}/{}", matches[0], path);
    }

    for (abbr, domain) in ABBREVIATIONS {
        if prefix == *abbr {
            return format!("https://{}/{}", domain, path);
        }
    }

    input.to_string()
}

/// Validate a clone URL after short-notation expansion.
///
/// Accepts https/http, `git@` SSH, and SCP-style `host:path` forms.
pub fn validate_url(raw: &str) -> Result<()> {
    if raw.is_empty() {
        return Err(AppError::InvalidUrl("empty URL provided".to_string()));
    }

    let expanded = expand_short_notation(raw);

    if expanded.starts_with("git@") {
        return Ok(());
    }

    if expanded.starts_with("http://") || expanded.starts_with("https://") {
        Url::parse(&expanded).map_err(|e| AppError::InvalidUrl(e.to_string()))?;
        return Ok(());
    }

    if expanded.contains(':') && !expanded.contains("://") {
        return Ok(());
    }

    Err(AppError::InvalidUrl(format!("unsupported URL format: {}", expanded)))
}

/// Derive the provider/owner/name path for a URL, relative to the root.
pub fn clone_path(url: &str) -> String {
    let mut path = expand_short_notation(url);

    for prefix in ["https://", "http://", "git@"] {
        if let Some(rest) = path.strip_prefix(prefix) {
            path = rest.to_string();
            break;
        }
    }

    // SSH form host:user/repo becomes host/user/repo.
    if path.contains(':') && !path.contains("://") {
        path = path.replacen(':', "/", 1);
    }

    path.trim_end_matches(".git").trim_end_matches('/').to_string()
}

/// Heuristic: does this argument look like a clone URL rather than a
/// repository name?
pub fn looks_like_url(s: &str) -> bool {
    s.starts_with("http://")
        || s.starts_with("https://")
        || s.starts_with("git@")
        || (s.contains(':') && !s.contains("://"))
}
