#![allow(dead_code)]

use std::sync::Arc;
use tempfile::TempDir;
use tinylink::domain::repositories::LinkStore;
use tinylink::infrastructure::persistence::FileLinkStore;
use tinylink::state::AppState;

/// Builds application state over a file store inside `dir`.
///
/// The caller owns the `TempDir`; it must outlive the returned state or
/// the data file disappears mid-test.
pub async fn create_test_state(dir: &TempDir) -> AppState {
    build_state(dir, false).await
}

/// Same as [`create_test_state`] but with `LIST_INCLUDE_SECRETS` behavior
/// enabled.
pub async fn create_test_state_with_secrets(dir: &TempDir) -> AppState {
    build_state(dir, true).await
}

async fn build_state(dir: &TempDir, include_secrets: bool) -> AppState {
    let store = FileLinkStore::new(dir.path().join("links.json"));
    store.init().await.unwrap();

    AppState::new(Arc::new(store), include_secrets)
}
