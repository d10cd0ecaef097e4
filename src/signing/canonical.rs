//! Canonical request building for AWS Signature V4.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::collections::{BTreeMap, BTreeSet};

/// Characters that should NOT be percent-encoded.
const UNRESERVED_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// URI-encode a path segment or query component.
pub fn uri_encode(value: &str) -> String {
    utf8_percent_encode(value, UNRESERVED_SET).to_string()
}

/// Build the canonical URI from a path. Each segment is encoded, `/` kept.
pub fn build_canonical_uri(path: &str) -> String {
    if path.is_empty() || path == "/" {
        return "/".to_string();
    }

    let normalized = if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path)
    };

    normalized
        .split('/')
        .map(uri_encode)
        .collect::<Vec<_>>()
        .join("/")
}

/// Build the canonical query string: pairs encoded, sorted by key then value.
pub fn build_canonical_query_string(query_string: &str) -> String {
    let mut params: Vec<(String, String)> = query_string
        .split('&')
        .filter(|s| !s.is_empty())
        .map(|pair| {
            let mut parts = pair.splitn(2, '=');
            let key = parts.next().unwrap_or("");
            let value = parts.next().unwrap_or("");
            (uri_encode(key), uri_encode(value))
        })
        .collect();

    params.sort();

    params
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&")
}

/// Build the canonical headers block: lowercase names, collapsed whitespace,
/// sorted, one `name:value\n` line per header.
pub fn build_canonical_headers(headers: &[(String, String)]) -> String {
    let mut header_map: BTreeMap<String, Vec<String>> = BTreeMap::new();

    for (name, value) in headers {
        let name_lower = name.to_lowercase();
        if !super::should_sign_header(&name_lower) {
            continue;
        }

        let trimmed = value.split_whitespace().collect::<Vec<_>>().join(" ");
        header_map.entry(name_lower).or_default().push(trimmed);
    }

    header_map
        .iter()
        .map(|(name, values)| format!("{}:{}\n", name, values.join(",")))
        .collect()
}

/// Semicolon-separated list of signed header names.
pub fn build_signed_headers(headers: &[(String, String)]) -> String {
    let names: BTreeSet<String> = headers
        .iter()
        .map(|(name, _)| name.to_lowercase())
        .filter(|name| super::should_sign_header(name))
        .collect();

    names.into_iter().collect::<Vec<_>>().join(";")
}

/// Build the canonical request string.
///
/// ```text
/// HTTPMethod\n
/// CanonicalURI\n
/// CanonicalQueryString\n
/// CanonicalHeaders\n
/// SignedHeaders\n
/// HashedPayload
/// ```
pub fn build_canonical_request(
    method: &str,
    path: &str,
    query_string: &str,
    headers: &[(String, String)],
    payload_hash: &str,
) -> String {
    format!(
        "{}\n{}\n{}\n{}\n{}\n{}",
        method,
        build_canonical_uri(path),
        build_canonical_query_string(query_string),
        build_canonical_headers(headers),
        build_signed_headers(headers),
        payload_hash
    )
}
