use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::error::FetchError;

/// Where the next page comes from: the endpoint's base request, or an
/// absolute cursor URL handed back by the previous page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageRequest {
    Initial,
    Cursor(String),
}

impl PageRequest {
    /// Form safe to log: the cursor with any `key=` value masked.
    pub fn redacted(&self) -> String {
        match self {
            PageRequest::Initial => "initial".to_string(),
            PageRequest::Cursor(cursor) => redact_api_key(cursor),
        }
    }
}

/// Masks the value of every `key` query parameter. Works on raw strings so
/// cursors that fail to parse as URLs can still be shown.
pub fn redact_api_key(raw: &str) -> String {
    let (base, query) = match raw.split_once('?') {
        Some((base, query)) => (Some(base), query),
        None if raw.starts_with("key=") => (None, raw),
        None => return raw.to_string(),
    };
    let (query, fragment) = match query.split_once('#') {
        Some((query, fragment)) => (query, Some(fragment)),
        None => (query, None),
    };

    let query = query
        .split('&')
        .map(|param| if param.starts_with("key=") { "key=***" } else { param })
        .collect::<Vec<_>>()
        .join("&");

    let mut out = match base {
        Some(base) => format!("{base}?{query}"),
        None => query,
    };
    if let Some(fragment) = fragment {
        out.push('#');
        out.push_str(fragment);
    }
    out
}

/// One page of a remote collection. `next_cursor == None` means the
/// collection has no further pages.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next_cursor: Option<String>,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, next_cursor: Option<String>) -> Self {
        Self { items, next_cursor }
    }

    pub fn is_last(&self) -> bool {
        self.next_cursor.is_none()
    }
}

/// Wire shape of every paginated endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageEnvelope<T> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous: Option<String>,
    pub results: Vec<T>,
}

impl<T> From<PageEnvelope<T>> for Page<T> {
    fn from(value: PageEnvelope<T>) -> Self {
        let next_cursor = value.next.filter(|next| !next.trim().is_empty());
        Page {
            items: value.results,
            next_cursor,
        }
    }
}

pub fn decode_page<T: DeserializeOwned>(body: &[u8]) -> Result<Page<T>, FetchError> {
    let envelope: PageEnvelope<T> = serde_json::from_slice(body)?;
    Ok(envelope.into())
}

#[cfg(test)]
#[path = "tests/protocol_tests.rs"]
mod tests;
