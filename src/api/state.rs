//! Application state for the backend API.
//!
//! This module defines the shared application state that is available
//! to all request handlers. Both collaborators are created once at startup
//! and injected here; handlers never reach for ambient globals.

use std::sync::Arc;

use crate::auth::IdentityProvider;
use crate::store::DocumentStore;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    store: Arc<DocumentStore>,
    auth: Arc<IdentityProvider>,
}

impl AppState {
    /// Creates a new application state around the given collaborators.
    pub fn new(store: DocumentStore, auth: IdentityProvider) -> Self {
        Self {
            store: Arc::new(store),
            auth: Arc::new(auth),
        }
    }

    /// Returns a reference to the document store.
    pub fn store(&self) -> &DocumentStore {
        &self.store
    }

    /// Returns a reference to the identity provider.
    pub fn auth(&self) -> &IdentityProvider {
        &self.auth
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_is_clone() {
        // Required for axum state
        fn assert_clone<T: Clone>() {}
        assert_clone::<AppState>();
    }
}
