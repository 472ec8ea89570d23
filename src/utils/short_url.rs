//! Builds the absolute short URL echoed back on link creation.

use axum::http::HeaderMap;
use axum::http::header::HOST;

/// Builds `{scheme}://{host}/{code}` from request headers.
///
/// The scheme comes from the first `X-Forwarded-Proto` value when a proxy
/// set one, otherwise `http`. The host comes from the `Host` header,
/// falling back to `localhost` for clients that omitted it.
pub fn build_short_url(headers: &HeaderMap, code: &str) -> String {
    let scheme = headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or("http");

    let host = headers
        .get(HOST)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .unwrap_or("localhost");

    format!("{scheme}://{host}/{code}")
}
