//! DTOs for link creation, retrieval, listing, and deletion.

use serde::{Deserialize, Serialize};

use crate::domain::entities::Link;

/// Request to create a short link.
///
/// Both fields are optional at the wire level so that missing input
/// produces the service's own validation errors instead of a
/// deserialization rejection. Unknown fields are ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLinkRequest {
    /// Target URL; required by the service, must be http(s).
    pub url: Option<String>,

    /// Optional caller-chosen code; generated when absent or blank.
    pub custom_code: Option<String>,
}

/// Response for a successfully created link.
///
/// This is the only place the deletion secret is handed out; losing it
/// means the link can no longer be deleted.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLinkResponse {
    pub code: String,
    pub short_url: String,
    pub secret: String,
}

/// Public view of a link record.
///
/// `expires_at` is always present (`null` when unset) so both storage
/// backends serialize identically. The secret is omitted unless the
/// caller explicitly opted in on the listing endpoint.
#[derive(Debug, Serialize)]
pub struct LinkView {
    pub code: String,
    pub url: String,
    pub clicks: i64,
    pub created_at: i64,
    pub expires_at: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,
}

impl LinkView {
    /// Projects a stored record into its public shape, keeping the secret
    /// only when asked to.
    pub fn from_link(link: Link, include_secret: bool) -> Self {
        Self {
            code: link.code,
            url: link.url,
            clicks: link.clicks,
            created_at: link.created_at,
            expires_at: link.expires_at,
            secret: include_secret.then_some(link.secret),
        }
    }
}

/// Request body for link deletion; carries the creation secret.
#[derive(Debug, Default, Deserialize)]
pub struct DeleteLinkRequest {
    pub secret: Option<String>,
}

/// Confirmation body for a completed deletion.
#[derive(Debug, Serialize)]
pub struct DeleteLinkResponse {
    pub ok: bool,
}
