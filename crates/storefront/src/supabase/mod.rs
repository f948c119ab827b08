//! Hosted backend clients: auth (GoTrue), tables (PostgREST), storage.
//!
//! # Architecture
//!
//! - Plain `reqwest` JSON calls against the platform's REST surface
//! - The platform is the source of truth - NO local sync, direct calls
//! - In-memory caching via `moka` for catalog reads (5 minute TTL)
//!
//! # Clients
//!
//! ## [`AuthClient`]
//! - Password sign-in, sign-up, sign-out, session introspection
//! - Carries the anon key; user calls add the session bearer token
//!
//! ## [`Db`]
//! - Product reads, order/custom-order inserts, profile updates
//! - `has_role` RPC for the dashboard gate
//!
//! ## [`StorageClient`]
//! - Binary uploads into the `custom-images` bucket

mod auth;
mod db;
mod storage;
pub mod types;

pub use auth::{AuthClient, AuthSession, AuthUser, SignUpProfile};
pub use db::{Db, ProductFilter};
pub use storage::{CUSTOM_IMAGES_BUCKET, StorageClient};

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when talking to the hosted backend.
#[derive(Debug, Error)]
pub enum SupabaseError {
    /// HTTP transport failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with an error payload. The message is kept
    /// verbatim because the submission flows surface it to the user.
    #[error("{message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Service-reported message.
        message: String,
    },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),
}

/// Error body shape shared by GoTrue, PostgREST, and Storage.
///
/// The three services disagree on the field name, so all known spellings
/// are tried in order.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: Option<String>,
    msg: Option<String>,
    error_description: Option<String>,
    error: Option<String>,
}

/// Convert a non-success response into [`SupabaseError::Api`], preserving
/// the service message.
async fn error_from_response(response: reqwest::Response) -> SupabaseError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();

    let message = serde_json::from_str::<ApiErrorBody>(&body)
        .ok()
        .and_then(|e| e.message.or(e.msg).or(e.error_description).or(e.error))
        .unwrap_or_else(|| {
            if body.is_empty() {
                format!("HTTP {status}")
            } else {
                body.chars().take(200).collect()
            }
        });

    SupabaseError::Api { status, message }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display_is_verbatim_message() {
        let err = SupabaseError::Api {
            status: 409,
            message: "duplicate key value violates unique constraint".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "duplicate key value violates unique constraint"
        );
    }

    #[test]
    fn test_not_found_display() {
        let err = SupabaseError::NotFound("product classic-car".to_string());
        assert_eq!(err.to_string(), "Not found: product classic-car");
    }

    #[test]
    fn test_error_body_field_fallbacks() {
        let gotrue: ApiErrorBody =
            serde_json::from_str(r#"{"error_description":"Invalid login credentials"}"#)
                .expect("valid json");
        assert_eq!(
            gotrue.error_description.as_deref(),
            Some("Invalid login credentials")
        );

        let postgrest: ApiErrorBody =
            serde_json::from_str(r#"{"message":"permission denied","code":"42501"}"#)
                .expect("valid json");
        assert_eq!(postgrest.message.as_deref(), Some("permission denied"));
    }
}
