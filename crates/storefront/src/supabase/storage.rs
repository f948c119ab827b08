//! Object storage client for uploaded custom-order images.

use std::sync::Arc;

use tracing::instrument;

use super::{SupabaseError, error_from_response};
use crate::config::SupabaseConfig;

/// Bucket that holds customer-uploaded frame images.
pub const CUSTOM_IMAGES_BUCKET: &str = "custom-images";

/// Client for the storage service.
#[derive(Clone)]
pub struct StorageClient {
    inner: Arc<StorageClientInner>,
}

struct StorageClientInner {
    client: reqwest::Client,
    base_url: String,
    anon_key: String,
}

impl StorageClient {
    /// Create a new storage client.
    #[must_use]
    pub fn new(config: &SupabaseConfig) -> Self {
        Self {
            inner: Arc::new(StorageClientInner {
                client: reqwest::Client::new(),
                base_url: format!("{}/storage/v1", config.url),
                anon_key: config.anon_key.clone(),
            }),
        }
    }

    /// Upload an object under the user's bearer token.
    ///
    /// The path must already be namespaced by the uploading user (see the
    /// intake service); bucket policies enforce the prefix.
    ///
    /// # Errors
    ///
    /// Returns the service-reported error verbatim; the caller aborts the
    /// submission flow on failure, so nothing else has been written yet.
    #[instrument(skip(self, bearer, bytes), fields(bucket = %bucket, path = %path, len = bytes.len()))]
    pub async fn upload(
        &self,
        bearer: &str,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), SupabaseError> {
        let response = self
            .inner
            .client
            .post(format!("{}/object/{bucket}/{path}", self.inner.base_url))
            .header("apikey", &self.inner.anon_key)
            .header("Content-Type", content_type)
            .bearer_auth(bearer)
            .body(bytes)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        Ok(())
    }
}
