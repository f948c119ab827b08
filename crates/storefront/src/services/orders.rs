//! The order submission flow.
//!
//! One state machine covers both intake paths:
//!
//! ```text
//! Idle -> Validating -> (Uploading) -> Persisting -> Succeeded | Failed
//! ```
//!
//! - Session presence is re-checked on entry; without it nothing is
//!   submitted and the caller redirects to sign-in.
//! - The first validation failure aborts before any network call.
//! - On the custom path the image uploads before the record insert; an
//!   upload failure means no record exists, so there is nothing to clean
//!   up. An insert failure leaves the uploaded object orphaned - the
//!   dashboard can reap those, the flow does not compensate.
//! - A per-user in-flight set rejects a second concurrent submission
//!   (double-click protection); the slot is released on every exit path
//!   via an RAII guard.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use thiserror::Error;
use tracing::{info, instrument, warn};

use etar_core::{OrderStatus, Price, UserId};

use super::delivery::resolve_fee_price;
use super::intake::{AcceptedImage, IntakeError, PreviewSlot};
use super::validation::{
    AddressForm, CustomOrderForm, FieldError, validate_address, validate_custom_order,
};
use crate::models::CurrentUser;
use crate::supabase::types::{CustomOrderInsert, OrderInsert};
use crate::supabase::{CUSTOM_IMAGES_BUCKET, Db, StorageClient, SupabaseError};

/// How a submission failed. Every variant maps to one localized flash
/// message; backend errors keep the raw service message as a detail.
#[derive(Debug, Error)]
pub enum SubmissionError {
    /// No active session at the moment of submission.
    #[error("not authenticated")]
    NotAuthenticated,

    /// A form field failed validation; nothing was sent.
    #[error("validation failed: {0}")]
    Validation(#[from] FieldError),

    /// The uploaded file was rejected before any state changed.
    #[error("image rejected: {0}")]
    Image(#[from] IntakeError),

    /// Custom order submitted without an image. Checked after form
    /// validation because the image is not a schema field.
    #[error("no image supplied")]
    MissingImage,

    /// The same user already has a submission in flight.
    #[error("submission already in progress")]
    AlreadyInFlight,

    /// The image upload failed; no record was created.
    #[error("upload failed: {0}")]
    Upload(#[source] SupabaseError),

    /// The record insert failed; the uploaded image (if any) is orphaned.
    #[error("order insert failed: {0}")]
    Persist(#[source] SupabaseError),
}

impl SubmissionError {
    /// Stable flash code rendered as a localized message.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotAuthenticated => "login_required",
            Self::Validation(field) => field.code(),
            Self::Image(IntakeError::TooLarge) => "image_too_large",
            Self::MissingImage => "image_required",
            Self::AlreadyInFlight => "submission_in_progress",
            Self::Upload(_) => "upload_failed",
            Self::Persist(_) => "order_failed",
        }
    }

    /// Raw service message for backend failures, surfaced verbatim next
    /// to the flash message.
    #[must_use]
    pub fn detail(&self) -> Option<String> {
        match self {
            Self::Upload(err) | Self::Persist(err) => Some(err.to_string()),
            _ => None,
        }
    }

    /// Query-string fragment for the redirect back to the form.
    #[must_use]
    pub fn flash_query(&self) -> String {
        match self.detail() {
            Some(detail) => format!(
                "error={}&detail={}",
                self.code(),
                urlencoding::encode(&detail)
            ),
            None => format!("error={}", self.code()),
        }
    }
}

/// Orchestrates checkout and custom-order submissions.
pub struct OrderIntake {
    db: Db,
    storage: StorageClient,
    inflight: Mutex<HashSet<UserId>>,
    previews: Mutex<HashMap<UserId, Arc<PreviewSlot>>>,
}

/// RAII slot in the in-flight set; released on drop so every exit path
/// (success, validation failure, backend error) frees the user.
struct InFlightGuard<'a> {
    inflight: &'a Mutex<HashSet<UserId>>,
    user_id: UserId,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        let mut set = self.inflight.lock().unwrap_or_else(|e| e.into_inner());
        set.remove(&self.user_id);
    }
}

impl OrderIntake {
    /// Create the intake service over the backend clients.
    #[must_use]
    pub fn new(db: Db, storage: StorageClient) -> Self {
        Self {
            db,
            storage,
            inflight: Mutex::new(HashSet::new()),
            previews: Mutex::new(HashMap::new()),
        }
    }

    fn preview_slot(&self, user_id: UserId) -> Arc<PreviewSlot> {
        let mut map = self.previews.lock().unwrap_or_else(|e| e.into_inner());
        Arc::clone(map.entry(user_id).or_default())
    }

    /// Decode an accepted upload into a staged preview for the user's form.
    ///
    /// The ticket is issued before the encode starts, so when the user
    /// swaps images quickly the slower first encode finishing late cannot
    /// overwrite the newer preview. Returns `false` when the result
    /// arrived stale and was dropped.
    pub async fn stage_preview(&self, user_id: UserId, image: AcceptedImage) -> bool {
        let slot = self.preview_slot(user_id);
        let ticket = slot.issue();
        match tokio::task::spawn_blocking(move || image.preview_data_uri()).await {
            Ok(data_uri) => slot.apply(ticket, data_uri),
            Err(e) => {
                warn!(error = %e, "preview encode task failed");
                false
            }
        }
    }

    /// The user's staged preview, if any.
    #[must_use]
    pub fn latest_preview(&self, user_id: UserId) -> Option<String> {
        let map = self.previews.lock().unwrap_or_else(|e| e.into_inner());
        map.get(&user_id).and_then(|slot| slot.latest())
    }

    /// Drop the user's staged preview.
    pub fn clear_preview(&self, user_id: UserId) {
        let mut map = self.previews.lock().unwrap_or_else(|e| e.into_inner());
        map.remove(&user_id);
    }

    /// Claim the user's in-flight slot.
    fn begin(&self, user_id: UserId) -> Result<InFlightGuard<'_>, SubmissionError> {
        let mut set = self.inflight.lock().unwrap_or_else(|e| e.into_inner());
        if !set.insert(user_id) {
            return Err(SubmissionError::AlreadyInFlight);
        }
        Ok(InFlightGuard {
            inflight: &self.inflight,
            user_id,
        })
    }

    /// Run the checkout path: validate the address, resolve the delivery
    /// fee from the submitted governorate, insert the order.
    ///
    /// The total price is zero until cart integration lands; the delivery
    /// fee is recomputed here rather than trusted from the page.
    ///
    /// # Errors
    ///
    /// See [`SubmissionError`]; on any error no order row exists.
    #[instrument(skip_all, fields(user = ?user.map(|u| u.id)))]
    pub async fn submit_checkout(
        &self,
        user: Option<&CurrentUser>,
        form: &AddressForm,
    ) -> Result<(), SubmissionError> {
        let user = user.ok_or(SubmissionError::NotAuthenticated)?;
        let _guard = self.begin(user.id)?;

        let address = validate_address(form)?;
        let delivery_fee = resolve_fee_price(&address.governorate);

        let order = OrderInsert {
            user_id: user.id,
            total_price: Price::zero(),
            delivery_fee,
            address_json: address,
            status: OrderStatus::Pending,
        };

        self.db
            .insert_order(&user.access_token, &order)
            .await
            .map_err(|e| {
                warn!(error = %e, "order insert failed");
                SubmissionError::Persist(e)
            })?;

        info!(user = %user.id, fee = %order.delivery_fee, "order placed");
        Ok(())
    }

    /// Run the custom-order path: validate the selection, require an
    /// image, upload it, then insert the record.
    ///
    /// # Errors
    ///
    /// See [`SubmissionError`]. The upload happens strictly before the
    /// insert, so an upload failure leaves no record; an insert failure
    /// leaves the uploaded object orphaned (deliberately uncompensated).
    #[instrument(skip_all, fields(user = ?user.map(|u| u.id)))]
    pub async fn submit_custom_order(
        &self,
        user: Option<&CurrentUser>,
        form: &CustomOrderForm,
        image: Option<AcceptedImage>,
    ) -> Result<(), SubmissionError> {
        let user = user.ok_or(SubmissionError::NotAuthenticated)?;
        let _guard = self.begin(user.id)?;

        let spec = validate_custom_order(form)?;
        let image = image.ok_or(SubmissionError::MissingImage)?;

        let image_path = image.storage_path(user.id, chrono::Utc::now().timestamp_millis());

        self.storage
            .upload(
                &user.access_token,
                CUSTOM_IMAGES_BUCKET,
                &image_path,
                image.bytes,
                image.content_type,
            )
            .await
            .map_err(|e| {
                warn!(error = %e, "image upload failed");
                SubmissionError::Upload(e)
            })?;

        let order = CustomOrderInsert {
            user_id: user.id,
            image_path,
            size: spec.size,
            frame_type: spec.frame_type,
            notes: spec.notes,
            quantity: spec.quantity,
            led_option: spec.led_option,
            status: OrderStatus::Pending,
        };

        self.db
            .insert_custom_order(&user.access_token, &order)
            .await
            .map_err(|e| {
                warn!(error = %e, image_path = %order.image_path, "custom order insert failed, upload orphaned");
                SubmissionError::Persist(e)
            })?;

        self.clear_preview(user.id);
        info!(user = %user.id, "custom order placed");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::SecretString;

    use super::*;
    use crate::config::SupabaseConfig;

    fn intake() -> OrderIntake {
        let config = SupabaseConfig {
            url: "http://127.0.0.1:9".to_string(),
            anon_key: "test-anon-key-test-anon-key".to_string(),
            service_role_key: SecretString::from("test-service-key-test-service-key"),
        };
        OrderIntake::new(Db::new(&config), StorageClient::new(&config))
    }

    fn signed_in() -> CurrentUser {
        CurrentUser {
            id: UserId::random(),
            email: "user@example.com".parse().unwrap(),
            name: Some("Nour".to_string()),
            access_token: "token".to_string(),
        }
    }

    fn checkout_form() -> AddressForm {
        AddressForm {
            governorate: "Giza".to_string(),
            city: "Dokki".to_string(),
            street: "12 Tahrir St".to_string(),
            postal_code: String::new(),
        }
    }

    #[tokio::test]
    async fn test_checkout_without_session_makes_no_call() {
        // The backend URL is unroutable; reaching it would error with
        // Http, so NotAuthenticated proves the flow aborted first.
        let err = intake()
            .submit_checkout(None, &checkout_form())
            .await
            .unwrap_err();
        assert!(matches!(err, SubmissionError::NotAuthenticated));
        assert_eq!(err.code(), "login_required");
    }

    #[tokio::test]
    async fn test_checkout_validation_aborts_before_network() {
        let user = signed_in();
        let form = AddressForm {
            city: String::new(),
            ..checkout_form()
        };
        let err = intake()
            .submit_checkout(Some(&user), &form)
            .await
            .unwrap_err();
        assert!(matches!(err, SubmissionError::Validation(_)));
        assert_eq!(err.flash_query(), "error=city_required");
    }

    #[tokio::test]
    async fn test_custom_order_missing_image_after_validation() {
        let user = signed_in();
        let form = CustomOrderForm {
            size: "small".to_string(),
            frame_type: "metal".to_string(),
            notes: String::new(),
            quantity: 2,
            led_option: false,
        };
        let err = intake()
            .submit_custom_order(Some(&user), &form, None)
            .await
            .unwrap_err();
        assert!(matches!(err, SubmissionError::MissingImage));
        assert_eq!(err.code(), "image_required");
    }

    #[tokio::test]
    async fn test_custom_order_validation_reported_before_missing_image() {
        let user = signed_in();
        let form = CustomOrderForm {
            size: String::new(),
            frame_type: "metal".to_string(),
            notes: String::new(),
            quantity: 1,
            led_option: false,
        };
        let err = intake()
            .submit_custom_order(Some(&user), &form, None)
            .await
            .unwrap_err();
        assert_eq!(err.code(), "size_required");
    }

    #[test]
    fn test_inflight_guard_blocks_second_submission() {
        let service = intake();
        let user_id = UserId::random();

        let guard = service.begin(user_id).expect("first claim");
        assert!(matches!(
            service.begin(user_id),
            Err(SubmissionError::AlreadyInFlight)
        ));

        // Releasing the slot allows the next submission.
        drop(guard);
        assert!(service.begin(user_id).is_ok());
    }

    #[tokio::test]
    async fn test_preview_staged_then_cleared() {
        let service = intake();
        let user_id = UserId::random();
        let image = AcceptedImage::accept("a.png", vec![0, 1, 2]).unwrap();

        assert!(service.stage_preview(user_id, image).await);
        assert_eq!(
            service.latest_preview(user_id).as_deref(),
            Some("data:image/png;base64,AAEC")
        );

        service.clear_preview(user_id);
        assert_eq!(service.latest_preview(user_id), None);
    }

    #[test]
    fn test_flash_query_encodes_backend_detail() {
        let err = SubmissionError::Persist(SupabaseError::Api {
            status: 500,
            message: "duplicate key".to_string(),
        });
        assert_eq!(err.flash_query(), "error=order_failed&detail=duplicate%20key");
    }
}
