//! Handlers for the link management endpoints.

use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
};

use crate::api::dto::links::{
    CreateLinkRequest, CreateLinkResponse, DeleteLinkRequest, DeleteLinkResponse, LinkView,
};
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::short_url::build_short_url;

/// Creates a short link.
///
/// # Endpoint
///
/// `POST /api/links`
///
/// # Request Body
///
/// ```json
/// {
///   "url": "https://example.com/very/long/path",
///   "customCode": "my-link"   // optional
/// }
/// ```
///
/// A request without a JSON body is treated as an empty one, so the
/// service reports the missing URL instead of a content-type rejection.
///
/// # Response
///
/// `201 Created` with the assigned code, the absolute short URL derived
/// from this request's `Host` / `X-Forwarded-Proto` headers, and the
/// deletion secret (returned only here, never again).
///
/// # Errors
///
/// - 400 `Invalid URL` / `Invalid custom code`
/// - 409 `Code already exists`
/// - 500 `Failed to generate code`
pub async fn create_link_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Option<Json<CreateLinkRequest>>,
) -> Result<(StatusCode, Json<CreateLinkResponse>), AppError> {
    let body = payload.map(|Json(b)| b).unwrap_or_default();

    let link = state.links.create_link(body.url, body.custom_code).await?;

    let short_url = build_short_url(&headers, &link.code);

    Ok((
        StatusCode::CREATED,
        Json(CreateLinkResponse {
            code: link.code,
            short_url,
            secret: link.secret,
        }),
    ))
}

/// Returns one link record, without its secret.
///
/// # Endpoint
///
/// `GET /api/links/{code}`
pub async fn get_link_handler(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<LinkView>, AppError> {
    let link = state.links.get_link(&code).await?;

    Ok(Json(LinkView::from_link(link, false)))
}

/// Lists the most recent links, newest first, capped at the store's
/// listing limit.
///
/// # Endpoint
///
/// `GET /api/links`
///
/// Secrets are stripped unless the process was started with
/// `LIST_INCLUDE_SECRETS=true`.
pub async fn list_links_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<LinkView>>, AppError> {
    let include_secret = state.include_secrets_in_list;

    let links = state.links.list_links().await?;

    Ok(Json(
        links
            .into_iter()
            .map(|link| LinkView::from_link(link, include_secret))
            .collect(),
    ))
}

/// Deletes a link; the body must carry the secret issued at creation.
///
/// # Endpoint
///
/// `DELETE /api/links/{code}`
///
/// # Errors
///
/// - 400 `Secret required`
/// - 403 `Forbidden`
/// - 404 `Not found`
pub async fn delete_link_handler(
    State(state): State<AppState>,
    Path(code): Path<String>,
    payload: Option<Json<DeleteLinkRequest>>,
) -> Result<Json<DeleteLinkResponse>, AppError> {
    let body = payload.map(|Json(b)| b).unwrap_or_default();

    state.links.delete_link(&code, body.secret).await?;

    Ok(Json(DeleteLinkResponse { ok: true }))
}
