//! Storage trait for link records.

use crate::domain::entities::{Link, NewLink};
use crate::error::AppError;
use async_trait::async_trait;

/// Maximum number of records a [`LinkStore::get_all`] listing returns.
pub const LIST_LIMIT: usize = 100;

/// Storage interface for link records.
///
/// Both backends expose identical semantics; callers must not be able to
/// tell them apart through this trait (ordering, duplicate handling, and
/// absence behavior included). The backend is chosen once at process
/// construction and never switched at runtime.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkStore`] - PostgreSQL,
///   pool injected at construction
/// - [`crate::infrastructure::persistence::FileLinkStore`] - single JSON
///   file, whole-file rewrite per mutation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkStore: Send + Sync {
    /// Ensures the persistent structure (table and index, or data file)
    /// exists.
    ///
    /// Idempotent and cheap enough to double as the health probe; calling
    /// it on an already-initialized backend must succeed without side
    /// effects.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::BackendUnavailable`] when the backend cannot be
    /// reached or the structure cannot be created.
    async fn init(&self) -> Result<(), AppError>;

    /// Looks up a record by exact code.
    ///
    /// Absence is not an error: returns `Ok(None)` for unknown codes.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::BackendUnavailable`] on backend failures.
    async fn get(&self, code: &str) -> Result<Option<Link>, AppError>;

    /// Lists at most [`LIST_LIMIT`] records, newest first.
    ///
    /// Ordered by `created_at` descending with ties broken by `code`
    /// ascending, identically in every backend.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::BackendUnavailable`] on backend failures.
    async fn get_all(&self) -> Result<Vec<Link>, AppError>;

    /// Inserts a new record and returns the stored copy.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::DuplicateCode`] when the code already exists
    /// (primary-key violation in Postgres, map-key check in the file
    /// backend). Returns [`AppError::BackendUnavailable`] on other backend
    /// failures.
    async fn create(&self, link: NewLink) -> Result<Link, AppError>;

    /// Deletes a record if present.
    ///
    /// Returns whether a record was actually deleted; absence is not an
    /// error.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::BackendUnavailable`] on backend failures.
    async fn remove(&self, code: &str) -> Result<bool, AppError>;

    /// Atomically increments the click counter by one.
    ///
    /// Returns the new count, or `Ok(None)` when the code does not exist.
    /// For Postgres this is a single server-side
    /// `UPDATE … SET clicks = clicks + 1`, never a read-modify-write from
    /// the caller.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::BackendUnavailable`] on backend failures.
    async fn increment_clicks(&self, code: &str) -> Result<Option<i64>, AppError>;

    /// Releases the underlying resources (connection pool for Postgres,
    /// nothing for the file backend). Safe to call multiple times.
    async fn close(&self);

    /// Short backend name for logs and the health endpoint.
    fn backend(&self) -> &'static str;
}
