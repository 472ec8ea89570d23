//! Shared application state injected into all handlers.

use std::sync::Arc;

use crate::application::services::LinkService;
use crate::domain::repositories::LinkStore;

/// Handler-visible state. Cloned per request; everything inside is cheap
/// to clone.
#[derive(Clone)]
pub struct AppState {
    /// Link lifecycle service, the one entry point for business logic.
    pub links: Arc<LinkService>,

    /// Direct store handle, used by the health probe and shutdown only;
    /// request handlers go through [`AppState::links`].
    pub store: Arc<dyn LinkStore>,

    /// When true, the listing endpoint keeps deletion secrets in its
    /// output. Off by default.
    pub include_secrets_in_list: bool,
}

impl AppState {
    /// Assembles state around a storage backend.
    pub fn new(store: Arc<dyn LinkStore>, include_secrets_in_list: bool) -> Self {
        Self {
            links: Arc::new(LinkService::new(store.clone())),
            store,
            include_secrets_in_list,
        }
    }
}
