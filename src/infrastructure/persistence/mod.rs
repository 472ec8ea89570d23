//! Concrete [`crate::domain::repositories::LinkStore`] backends.

pub mod file_link_store;
pub mod pg_link_store;

pub use file_link_store::FileLinkStore;
pub use pg_link_store::PgLinkStore;
