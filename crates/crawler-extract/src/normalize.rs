//! Link normalization and the URL validity filter applied to every link and
//! image the Parser extracts.
//!
//! Distinct from (and lighter than) the Duplicate Detector's dedup
//! normalization: this step only lowercases the host and drops the
//! fragment, leaving query-parameter order untouched — reordering for
//! dedup purposes is the Duplicate Detector's job, not the Parser's.

const BLOCKED_EXTENSIONS: &[&str] = &[
    ".jpg", ".jpeg", ".png", ".gif", ".bmp", ".svg", ".webp", ".pdf", ".doc", ".docx", ".xls",
    ".xlsx", ".ppt", ".pptx", ".zip", ".rar", ".tar", ".gz", ".exe", ".dmg", ".iso", ".mp3",
    ".mp4", ".avi", ".mov", ".wmv", ".flv", ".css", ".js", ".ico", ".woff", ".woff2", ".ttf",
    ".eot",
];

/// Lowercase host, drop fragment, leave path/params/query as-is.
pub fn normalize_url(url: &str) -> Option<String> {
    let mut parsed = url::Url::parse(url).ok()?;
    parsed.set_fragment(None);
    let host = parsed.host_str()?.to_lowercase();
    parsed.set_host(Some(&host)).ok()?;
    Some(parsed.to_string())
}

/// Resolve `href` against `base`, then normalize. Returns `None` for
/// unresolvable or empty/pure-fragment hrefs.
pub fn resolve_and_normalize(base: &url::Url, href: &str) -> Option<String> {
    let trimmed = href.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return None;
    }
    let resolved = base.join(trimmed).ok()?;
    normalize_url(resolved.as_str())
}

/// Require http/https + non-empty host, reject blacklisted extensions,
/// apply allow-list (if non-empty, host substring must match one entry) and
/// block-list (host substring match rejects).
pub fn is_valid_url(url: &str, allowed_domains: &[String], blocked_domains: &[String]) -> bool {
    let Ok(parsed) = url::Url::parse(url) else {
        return false;
    };

    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return false;
    }
    let Some(host) = parsed.host_str() else {
        return false;
    };
    if host.is_empty() {
        return false;
    }

    let path_lower = parsed.path().to_lowercase();
    if BLOCKED_EXTENSIONS.iter().any(|ext| path_lower.ends_with(ext)) {
        return false;
    }

    if !allowed_domains.is_empty() && !allowed_domains.iter().any(|d| host.contains(d.as_str())) {
        return false;
    }
    if blocked_domains.iter().any(|d| host.contains(d.as_str())) {
        return false;
    }

    true
}
