//! Link entity representing a short code to target URL mapping.

use serde::{Deserialize, Serialize};

/// A stored short link.
///
/// `code` is the unique key. Timestamps are milliseconds since the Unix
/// epoch, matching both the relational column type (`BIGINT`) and the
/// on-disk JSON written by the file backend. `secret` authorizes deletion
/// and is stripped from public views at the DTO layer.
///
/// `expires_at` is stored but never enforced; it is reserved for a future
/// expiry feature.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Link {
    pub code: String,
    pub url: String,
    pub secret: String,
    pub clicks: i64,
    pub created_at: i64,
    /// Data files written by older deployments may omit this key entirely.
    #[serde(default)]
    pub expires_at: Option<i64>,
}

/// Input data for creating a new link.
///
/// `clicks` is absent on purpose: every backend inserts the record with a
/// zero counter.
#[derive(Debug, Clone)]
pub struct NewLink {
    pub code: String,
    pub url: String,
    pub secret: String,
    pub created_at: i64,
    pub expires_at: Option<i64>,
}
