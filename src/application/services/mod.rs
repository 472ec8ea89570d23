//! Business services orchestrating domain logic over the storage traits.

pub mod link_service;

pub use link_service::LinkService;
