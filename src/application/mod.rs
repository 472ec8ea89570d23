//! Application layer: use cases composed from domain abstractions.

pub mod services;
