/*
[INPUT]:  Session tokens issued by the auth server
[OUTPUT]: Token retrieval per auth type
[POS]:    Auth layer - token lifecycle management
[UPDATE]: When adding token refresh or changing storage strategy
*/

use std::sync::{Arc, RwLock};

use crate::types::AuthType;

/// Thread-safe store for the two platform sessions.
///
/// The dashboard user session and the embedded wallet session are held in
/// separate slots; a flow only ever reads the slot matching its auth type.
/// Clones share the same underlying storage.
#[derive(Debug, Clone)]
pub struct SessionTokenStore {
    user: Arc<RwLock<Option<String>>>,
    wallet: Arc<RwLock<Option<String>>>,
}

impl SessionTokenStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self {
            user: Arc::new(RwLock::new(None)),
            wallet: Arc::new(RwLock::new(None)),
        }
    }

    fn slot(&self, auth_type: AuthType) -> &Arc<RwLock<Option<String>>> {
        match auth_type {
            AuthType::User => &self.user,
            AuthType::Wallet => &self.wallet,
        }
    }

    /// Store a token for the given session
    pub fn set_token(&self, auth_type: AuthType, token: impl Into<String>) {
        let mut guard = self.slot(auth_type).write().unwrap();
        *guard = Some(token.into());
    }

    /// Get the current token for the given session if available
    pub fn token(&self, auth_type: AuthType) -> Option<String> {
        let guard = self.slot(auth_type).read().unwrap();
        guard.clone()
    }

    /// Clear the token for the given session
    pub fn clear(&self, auth_type: AuthType) {
        let mut guard = self.slot(auth_type).write().unwrap();
        *guard = None;
    }
}

impl Default for SessionTokenStore {
    fn default() -> Self {
        Self::new()
    }
}
