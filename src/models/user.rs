//! Authenticated user profile.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default avatar used when the identity provider supplies no picture.
pub const DEFAULT_PICTURE: &str = "https://static.buildtrack.app/avatar/default.png";

/// A user profile document, created on first token verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// The identity provider's subject id.
    pub uid: String,
    /// Display name, when the provider supplies one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Email address, when the provider supplies one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Phone number, from the provider or the registration request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    /// Avatar URL.
    pub picture: String,
    /// When the profile was created.
    pub created_at: DateTime<Utc>,
}
