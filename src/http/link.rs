//! RFC 5988 `Link` header parsing

use reqwest::header::{HeaderMap, LINK};

/// Continuation URLs advertised by a response
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Links {
    /// `rel="prev"`: the adjacent newer window
    pub prev: Option<String>,
    /// `rel="next"`: the adjacent older window
    pub next: Option<String>,
}

impl Links {
    /// Parse a raw `Link` header value
    pub fn parse(header: &str) -> Self {
        Self {
            prev: parse_link_header(header, "prev")
                .or_else(|| parse_link_header(header, "previous")),
            next: parse_link_header(header, "next"),
        }
    }

    /// Extract links from response headers
    pub fn from_headers(headers: &HeaderMap) -> Self {
        headers
            .get(LINK)
            .and_then(|v| v.to_str().ok())
            .map(Self::parse)
            .unwrap_or_default()
    }
}

/// Find the URL tagged with `target_rel` in a `Link` header
pub fn parse_link_header(header: &str, target_rel: &str) -> Option<String> {
    // Link header format: <url>; rel="next", <url>; rel="prev"
    for part in split_link_values(header) {
        let part = part.trim();
        let mut url = None;
        let mut rel = None;

        for segment in part.split(';') {
            let segment = segment.trim();
            if segment.starts_with('<') && segment.ends_with('>') {
                url = Some(&segment[1..segment.len() - 1]);
            } else if let Some(stripped) = segment.strip_prefix("rel=") {
                rel = Some(stripped.trim_matches('"').trim_matches('\''));
            }
        }

        if let (Some(u), Some(r)) = (url, rel) {
            if r.split_whitespace().any(|candidate| candidate == target_rel) {
                return Some(u.to_string());
            }
        }
    }

    None
}

/// Split a `Link` header on the commas that separate link values
///
/// Commas inside `<...>` targets and quoted parameters belong to the value.
fn split_link_values(header: &str) -> impl Iterator<Item = &str> {
    let mut parts = Vec::new();
    let mut in_target = false;
    let mut in_quotes = false;
    let mut start = 0;

    for (index, c) in header.char_indices() {
        match c {
            '<' if !in_quotes => in_target = true,
            '>' if !in_quotes => in_target = false,
            '"' if !in_target => in_quotes = !in_quotes,
            ',' if !in_target && !in_quotes => {
                parts.push(&header[start..index]);
                start = index + 1;
            }
            _ => {}
        }
    }
    parts.push(&header[start..]);
    parts.into_iter()
}
