//! Evidence domain normalization and allow-list checks.
//!
//! In domain allow-list mode the caller supplies the evidence URL, so its
//! host is the only thing standing between the oracle and arbitrary content.
//! Matching is exact host membership after normalization; a subdomain such as
//! `sport.bbc.com` does not match an allow-listed `bbc.com`.

use url::Url;

/// Host of a parsed URL with leading `www.` labels removed.
///
/// `Url` has already lowercased the host, converted IDNs to punycode and
/// split off any port, so allow-list entries and evidence URLs compare equal
/// whenever they name the same host.
fn bare_host(url: &Url) -> Option<String> {
    let mut host = url.host_str()?;
    while let Some(rest) = host.strip_prefix("www.") {
        host = rest;
    }
    if host.is_empty() {
        None
    } else {
        Some(host.to_string())
    }
}

/// Normalize an allow-list entry to a bare host.
///
/// Entries may be a bare domain (`bbc.com`), carry a scheme, `www.`, a port
/// or a path; all of that is dropped. Returns `None` for entries that are
/// blank or have no parseable host.
pub fn normalize_domain(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    // Any scheme is replaced so the host always gets web URL normalization.
    let rest = raw.split_once("://").map_or(raw, |(_, rest)| rest);
    bare_host(&Url::parse(&format!("https://{}", rest)).ok()?)
}

/// Normalize a list of allow-list entries, dropping blanks and repeats.
pub fn normalize_domains(raw: &[String]) -> Vec<String> {
    let mut domains: Vec<String> = Vec::with_capacity(raw.len());
    for domain in raw.iter().filter_map(|d| normalize_domain(d)) {
        if !domains.contains(&domain) {
            domains.push(domain);
        }
    }
    domains
}

/// Extract the normalized host of an evidence URL.
///
/// Returns `None` if the URL does not parse or has no host.
pub fn evidence_host(url: &str) -> Option<String> {
    bare_host(&Url::parse(url.trim()).ok()?)
}

/// Check an evidence URL against normalized allow-listed domains.
///
/// Never fails: malformed URLs are simply not allowed.
pub fn is_allowed_evidence(url: &str, domains: &[String]) -> bool {
    match evidence_host(url) {
        Some(host) => domains.iter().any(|d| *d == host),
        None => false,
    }
}
