//! Data Transfer Objects for API requests and responses.
//!
//! All DTOs use Serde for JSON serialization; validation happens in the
//! service layer so its error ordering stays in one place.

pub mod health;
pub mod links;
