//! Storage traits implemented by the infrastructure layer.
//!
//! The application layer depends on these abstractions only; concrete
//! backends live under [`crate::infrastructure::persistence`].

pub mod link_store;

pub use link_store::{LinkStore, LIST_LIMIT};

#[cfg(test)]
pub use link_store::MockLinkStore;
