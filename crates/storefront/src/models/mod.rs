//! Session-stored domain types.

use serde::{Deserialize, Serialize};

use etar_core::{Email, UserId};

/// Session-stored user identity.
///
/// Holds the backend access token so user-scoped writes can re-check the
/// session at the moment of use instead of trusting page-load state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// Auth service user ID.
    pub id: UserId,
    /// User's email address.
    pub email: Email,
    /// Display name from sign-up metadata.
    pub name: Option<String>,
    /// Backend access token for row-level-security scoped calls.
    pub access_token: String,
}

/// Session keys for stored state.
pub mod session_keys {
    /// Key for the current logged-in user.
    pub const CURRENT_USER: &str = "current_user";

    /// Key for the active display locale ("ar" or "en").
    pub const LOCALE: &str = "locale";
}
