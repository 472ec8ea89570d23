//! Core domain entities representing the business data model.
//!
//! The service has a single entity: the [`Link`] record mapping a short
//! code to a target URL. Entities are plain data structures without
//! business logic; [`NewLink`] is the creation-input companion type.

pub mod link;

pub use link::{Link, NewLink};
