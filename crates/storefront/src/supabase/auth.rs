//! GoTrue auth client: password sign-in, sign-up, sign-out.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::instrument;

use etar_core::{Email, UserId};

use super::{SupabaseError, error_from_response};
use crate::config::SupabaseConfig;

/// Profile attributes captured at sign-up and stored as user metadata.
#[derive(Debug, Clone, Serialize)]
pub struct SignUpProfile {
    pub name: String,
    pub phone1: String,
    pub phone2: String,
}

/// The authenticated user as reported by the auth service.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthUser {
    pub id: UserId,
    pub email: Email,
    #[serde(default)]
    pub user_metadata: serde_json::Value,
}

impl AuthUser {
    /// Display name from the sign-up metadata, if present.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.user_metadata.get("name").and_then(|v| v.as_str())
    }

    /// Phone number from the sign-up metadata, if present.
    #[must_use]
    pub fn phone(&self, key: &str) -> Option<&str> {
        self.user_metadata.get(key).and_then(|v| v.as_str())
    }
}

/// An access token plus the user it belongs to.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    pub user: AuthUser,
}

/// Client for the auth service.
#[derive(Clone)]
pub struct AuthClient {
    inner: Arc<AuthClientInner>,
}

struct AuthClientInner {
    client: reqwest::Client,
    base_url: String,
    anon_key: String,
}

impl AuthClient {
    /// Create a new auth client.
    #[must_use]
    pub fn new(config: &SupabaseConfig) -> Self {
        Self {
            inner: Arc::new(AuthClientInner {
                client: reqwest::Client::new(),
                base_url: format!("{}/auth/v1", config.url),
                anon_key: config.anon_key.clone(),
            }),
        }
    }

    /// Sign in with email and password.
    ///
    /// # Errors
    ///
    /// Returns the service-reported error on invalid credentials or
    /// transport failure.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, SupabaseError> {
        let response = self
            .inner
            .client
            .post(format!(
                "{}/token?grant_type=password",
                self.inner.base_url
            ))
            .header("apikey", &self.inner.anon_key)
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        Ok(response.json().await?)
    }

    /// Create a new account with profile metadata.
    ///
    /// The service sends the confirmation email itself; when confirmation
    /// is disabled it returns a usable session straight away.
    ///
    /// # Errors
    ///
    /// Returns the service-reported error (e.g. duplicate account).
    #[instrument(skip(self, password, profile), fields(email = %email))]
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        profile: &SignUpProfile,
    ) -> Result<AuthSession, SupabaseError> {
        let response = self
            .inner
            .client
            .post(format!("{}/signup", self.inner.base_url))
            .header("apikey", &self.inner.anon_key)
            .json(&json!({
                "email": email,
                "password": password,
                "data": profile,
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        Ok(response.json().await?)
    }

    /// Revoke the given session token.
    ///
    /// # Errors
    ///
    /// Returns the service-reported error; an already-expired token is not
    /// treated as a failure by the caller.
    #[instrument(skip_all)]
    pub async fn sign_out(&self, access_token: &str) -> Result<(), SupabaseError> {
        let response = self
            .inner
            .client
            .post(format!("{}/logout", self.inner.base_url))
            .header("apikey", &self.inner.anon_key)
            .bearer_auth(access_token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        Ok(())
    }

    /// Fetch the user behind an access token.
    ///
    /// Used to re-check session validity at the moment of use rather than
    /// trusting what was cached at page load.
    ///
    /// # Errors
    ///
    /// Returns an error when the token is expired or revoked.
    #[instrument(skip_all)]
    pub async fn get_user(&self, access_token: &str) -> Result<AuthUser, SupabaseError> {
        let response = self
            .inner
            .client
            .get(format!("{}/user", self.inner.base_url))
            .header("apikey", &self.inner.anon_key)
            .bearer_auth(access_token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        Ok(response.json().await?)
    }

    /// Liveness probe for the auth service, used by the readiness endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error when the service is unreachable.
    pub async fn health(&self) -> Result<(), SupabaseError> {
        let response = self
            .inner
            .client
            .get(format!("{}/health", self.inner.base_url))
            .header("apikey", &self.inner.anon_key)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_session_deserializes_token_payload() {
        let json = r#"{
            "access_token": "header.payload.signature",
            "token_type": "bearer",
            "expires_in": 3600,
            "user": {
                "id": "4b4a8d7e-8f0a-4f87-9f2b-2f8f6a0b7c1d",
                "email": "user@example.com",
                "user_metadata": {"name": "Nour", "phone1": "01012345678"}
            }
        }"#;
        let session: AuthSession = serde_json::from_str(json).unwrap();
        assert_eq!(session.access_token, "header.payload.signature");
        assert_eq!(session.user.email.as_str(), "user@example.com");
        assert_eq!(session.user.name(), Some("Nour"));
        assert_eq!(session.user.phone("phone1"), Some("01012345678"));
        assert_eq!(session.user.phone("phone2"), None);
    }

    #[tokio::test]
    async fn test_get_user_transport_failure_is_http_error() {
        // The token re-check must surface transport failures instead of
        // silently treating the session as valid.
        let client = AuthClient::new(&crate::config::SupabaseConfig {
            url: "http://127.0.0.1:9".to_string(),
            anon_key: "test-anon-key-test-anon-key".to_string(),
            service_role_key: secrecy::SecretString::from("test-service-key-test-service-key"),
        });
        let err = client.get_user("token").await.unwrap_err();
        assert!(matches!(err, SupabaseError::Http(_)));
    }

    #[test]
    fn test_auth_user_without_metadata() {
        let json = r#"{
            "id": "4b4a8d7e-8f0a-4f87-9f2b-2f8f6a0b7c1d",
            "email": "user@example.com"
        }"#;
        let user: AuthUser = serde_json::from_str(json).unwrap();
        assert_eq!(user.name(), None);
    }
}
