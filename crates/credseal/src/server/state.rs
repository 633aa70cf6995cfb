//! Shared application state injected into every Axum handler.

use crate::store::CredentialStore;

/// Application state shared across all request handlers.
///
/// The store handle is `Arc`-backed, so Axum can clone the state per request
/// without copying any credential data.
#[derive(Clone)]
pub struct AppState {
    /// Shared handle to the credential store.
    pub store: CredentialStore,
}

impl AppState {
    /// Create a new [`AppState`] around an opened store.
    pub fn new(store: CredentialStore) -> Self {
        Self { store }
    }
}
