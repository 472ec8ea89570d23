//! Shared helpers with no layer of their own.

pub mod code_generator;
pub mod short_url;
