//! Handler for short URL redirect.

use axum::{
    body::Body,
    extract::{Path, State},
    http::{StatusCode, header},
    response::Response,
};
use tracing::debug;

use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short code to its target URL and counts the click.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// The click increment is awaited before the response goes out, so a
/// successful redirect implies the count was durably bumped.
///
/// # Errors
///
/// Returns 404 Not Found if the short code doesn't exist.
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    let url = state.links.resolve_and_count(&code).await?;

    debug!(code, url, "redirecting");

    // Built by hand: axum's Redirect helpers emit 303/307/308, this
    // endpoint's contract is 302 Found.
    Response::builder()
        .status(StatusCode::FOUND)
        .header(header::LOCATION, url.as_str())
        .body(Body::empty())
        .map_err(|e| AppError::backend(format!("redirect to {url}: {e}")))
}
