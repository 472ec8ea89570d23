//! Domain layer: entities and storage abstractions.
//!
//! Nothing in this module performs I/O. Entities are plain data,
//! repositories are traits; everything concrete lives in
//! [`crate::infrastructure`].

pub mod entities;
pub mod repositories;
