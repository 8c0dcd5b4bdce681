//! Identity provider integration.
//!
//! The engine treats authentication as an external collaborator that
//! verifies bearer tokens into claims, mints custom tokens, and manages the
//! user directory. [`IdentityProvider`] implements that contract with an
//! in-process token registry; it is constructed once at startup and injected
//! through [`crate::api::AppState`], mirroring the document store lifecycle.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};

/// The claims carried by a verified bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthClaims {
    /// The subject id.
    pub uid: String,
    /// Display name, when the provider knows it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Email address, when the provider knows it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Phone number, when the provider knows it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    /// Avatar URL, when the provider knows it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
}

impl AuthClaims {
    /// Claims carrying only a subject id.
    pub fn for_uid(uid: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            name: None,
            email: None,
            phone_number: None,
            picture: None,
        }
    }
}

/// An in-process identity provider.
///
/// Tokens are opaque strings registered against claims. Verification is a
/// lookup; unknown tokens are unauthorized.
#[derive(Debug, Default)]
pub struct IdentityProvider {
    tokens: RwLock<HashMap<String, AuthClaims>>,
    users_by_email: RwLock<HashMap<String, String>>,
}

impl IdentityProvider {
    /// Creates an empty provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a token against claims, e.g. when installing an
    /// externally-minted credential.
    pub async fn register_token(&self, token: impl Into<String>, claims: AuthClaims) {
        self.tokens.write().await.insert(token.into(), claims);
    }

    /// Verifies a bearer token, returning its claims.
    pub async fn verify_id_token(&self, token: &str) -> EngineResult<AuthClaims> {
        self.tokens
            .read()
            .await
            .get(token)
            .cloned()
            .ok_or_else(|| EngineError::Unauthorized {
                message: "invalid or expired token".to_string(),
            })
    }

    /// Issues a custom token for a subject and registers it.
    pub async fn issue_custom_token(&self, uid: &str) -> String {
        let token = Uuid::new_v4().to_string();
        self.register_token(token.clone(), AuthClaims::for_uid(uid))
            .await;
        token
    }

    /// Creates a user for an email address, returning the new subject id.
    /// Fails when the email is already registered.
    pub async fn create_user(&self, email: &str) -> EngineResult<String> {
        let mut users = self.users_by_email.write().await;
        if users.contains_key(email) {
            return Err(EngineError::validation("email", "already registered"));
        }
        let uid = Uuid::new_v4().to_string();
        users.insert(email.to_string(), uid.clone());
        Ok(uid)
    }

    /// Looks up a subject id by email address.
    pub async fn lookup_by_email(&self, email: &str) -> Option<String> {
        self.users_by_email.read().await.get(email).cloned()
    }
}
