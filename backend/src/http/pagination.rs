//! Pagination parameters and response headers.
//!
//! List endpoints accept `page`, `per_page` and `max_per_page` and answer
//! with `Total`, `Per-Page`, `Page` and a `Link` header holding the `first`,
//! `prev`, `next` and `last` relations that exist for the current page.

use axum::http::{HeaderMap, HeaderValue, Uri};
use std::collections::HashMap;

use super::error::AppError;
use crate::config::ApiConfig;
use crate::db::models::{Page, PageRequest};

/// Query keys reserved for pagination.
pub const PAGINATION_KEYS: [&str; 3] = ["page", "per_page", "max_per_page"];

fn positive(query: &HashMap<String, String>, key: &str) -> Result<Option<u64>, AppError> {
    match query.get(key).map(|v| v.trim()) {
        None | Some("") => Ok(None),
        Some(raw) => raw
            .parse::<u64>()
            .ok()
            .filter(|n| *n > 0)
            .map(Some)
            .ok_or_else(|| AppError::BadRequest(format!("{} must be a positive integer", key))),
    }
}

/// Resolve the requested window.
///
/// The client may lower the cap through `max_per_page` but never raise it
/// above the server maximum; `per_page` is clamped to the effective cap.
pub fn page_request(
    query: &HashMap<String, String>,
    config: &ApiConfig,
) -> Result<PageRequest, AppError> {
    let cap = positive(query, "max_per_page")?
        .map(|client| client.min(config.max_per_page))
        .unwrap_or(config.max_per_page);
    let per_page = positive(query, "per_page")?
        .unwrap_or(config.default_per_page)
        .clamp(1, cap.max(1));
    let page = positive(query, "page")?.unwrap_or(1);
    Ok(PageRequest::new(page, per_page))
}

fn page_url(path: &str, kept: &[&str], page: u64) -> String {
    let mut query: Vec<String> = kept.iter().map(|pair| pair.to_string()).collect();
    query.push(format!("page={}", page));
    format!("{}?{}", path, query.join("&"))
}

/// `Link` header value for `page`, or `None` when there is a single page.
pub fn link_header<T>(uri: &Uri, page: &Page<T>) -> Option<String> {
    let kept: Vec<&str> = uri
        .query()
        .unwrap_or_default()
        .split('&')
        .filter(|pair| !pair.is_empty())
        .filter(|pair| pair.split('=').next() != Some("page"))
        .collect();
    let path = uri.path();
    let last = page.total_pages();
    let current = page.page;

    let mut links = Vec::new();
    if current > 1 {
        links.push((1, "first"));
        links.push(((current - 1).min(last), "prev"));
    }
    if current < last {
        links.push((current + 1, "next"));
        links.push((last, "last"));
    }
    if links.is_empty() {
        return None;
    }
    Some(
        links
            .into_iter()
            .map(|(n, rel)| format!("<{}>; rel=\"{}\"", page_url(path, &kept, n), rel))
            .collect::<Vec<_>>()
            .join(", "),
    )
}

pub fn pagination_headers<T>(uri: &Uri, page: &Page<T>) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert("Total", HeaderValue::from(page.total));
    headers.insert("Per-Page", HeaderValue::from(page.per_page));
    headers.insert("Page", HeaderValue::from(page.page));
    if let Some(value) = link_header(uri, page).and_then(|link| HeaderValue::from_str(&link).ok()) {
        headers.insert("Link", value);
    }
    headers
}
