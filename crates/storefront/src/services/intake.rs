//! Image intake: size gate, preview generation, and the storage path
//! convention for uploaded custom-order images.

use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use thiserror::Error;

use etar_core::UserId;

/// Maximum accepted upload size: 10 MiB, boundary inclusive.
pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

/// Why an uploaded file was rejected before any state changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum IntakeError {
    /// File exceeds [`MAX_IMAGE_BYTES`].
    #[error("image larger than 10 MiB")]
    TooLarge,
}

/// An upload that passed the size gate.
#[derive(Debug, Clone)]
pub struct AcceptedImage {
    /// Raw file bytes; the upload payload is the original file, never the
    /// preview.
    pub bytes: Vec<u8>,
    /// Lowercased file extension, defaulting to `jpg`.
    pub extension: String,
    /// MIME type derived from the extension.
    pub content_type: &'static str,
}

impl AcceptedImage {
    /// Gate an upload on size and capture its metadata.
    ///
    /// The file picker already restricts the type filter to JPEG/PNG; no
    /// further content sniffing happens here, matching the storage bucket
    /// policy which re-checks server-side.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::TooLarge`] when the payload exceeds 10 MiB.
    /// A file of exactly 10 MiB is accepted.
    pub fn accept(file_name: &str, bytes: Vec<u8>) -> Result<Self, IntakeError> {
        if bytes.len() > MAX_IMAGE_BYTES {
            return Err(IntakeError::TooLarge);
        }

        let extension = extension_of(file_name);
        let content_type = content_type_for(&extension);

        Ok(Self {
            bytes,
            extension,
            content_type,
        })
    }

    /// Render the image as a `data:` URI for inline preview display.
    #[must_use]
    pub fn preview_data_uri(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.content_type,
            BASE64.encode(&self.bytes)
        )
    }

    /// Storage object path: `{user_id}/{user_id}-{epoch_millis}.{ext}`.
    ///
    /// The user-id prefix gives coarse access isolation (bucket policies
    /// match on it) and the timestamp makes the name unique per upload.
    #[must_use]
    pub fn storage_path(&self, user_id: UserId, epoch_millis: i64) -> String {
        format!("{user_id}/{user_id}-{epoch_millis}.{}", self.extension)
    }
}

fn extension_of(file_name: &str) -> String {
    file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .filter(|ext| !ext.is_empty())
        .unwrap_or_else(|| "jpg".to_string())
}

fn content_type_for(extension: &str) -> &'static str {
    // Only jpeg/png pass the picker filter; anything else is opaque.
    match extension {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        _ => "application/octet-stream",
    }
}

// =============================================================================
// Preview slot
// =============================================================================

/// Ticket identifying one preview decode request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviewTicket(u64);

/// Holder for the latest image preview.
///
/// Decoding races with later user actions ("Change Image" before the first
/// decode lands), so each decode takes a ticket and only the result
/// matching the **latest issued** ticket is applied; stale results are
/// dropped instead of overwriting a newer preview.
#[derive(Debug, Default)]
pub struct PreviewSlot {
    issued: AtomicU64,
    current: Mutex<Option<(u64, String)>>,
}

impl PreviewSlot {
    /// Create an empty slot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a ticket for a decode that is about to start. Issuing
    /// invalidates every earlier ticket.
    pub fn issue(&self) -> PreviewTicket {
        PreviewTicket(self.issued.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Apply a decode result. Returns `true` when the ticket is still the
    /// latest and the preview was stored, `false` when the result was
    /// stale and dropped.
    pub fn apply(&self, ticket: PreviewTicket, data_uri: String) -> bool {
        if ticket.0 != self.issued.load(Ordering::SeqCst) {
            return false;
        }

        let mut current = self.current.lock().unwrap_or_else(|e| e.into_inner());
        *current = Some((ticket.0, data_uri));
        true
    }

    /// Discard any stored preview without issuing a new ticket.
    pub fn clear(&self) {
        let mut current = self.current.lock().unwrap_or_else(|e| e.into_inner());
        *current = None;
    }

    /// The latest applied preview, if any.
    #[must_use]
    pub fn latest(&self) -> Option<String> {
        let current = self.current.lock().unwrap_or_else(|e| e.into_inner());
        current.as_ref().map(|(_, uri)| uri.clone())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_accept_at_boundary() {
        // Exactly 10 MiB passes.
        let bytes = vec![0_u8; MAX_IMAGE_BYTES];
        assert!(AcceptedImage::accept("photo.png", bytes).is_ok());
    }

    #[test]
    fn test_reject_over_boundary() {
        let bytes = vec![0_u8; MAX_IMAGE_BYTES + 1];
        assert_eq!(
            AcceptedImage::accept("photo.png", bytes).unwrap_err(),
            IntakeError::TooLarge
        );
    }

    #[test]
    fn test_extension_and_content_type() {
        let image = AcceptedImage::accept("My Photo.JPEG", vec![1, 2, 3]).unwrap();
        assert_eq!(image.extension, "jpeg");
        assert_eq!(image.content_type, "image/jpeg");

        let image = AcceptedImage::accept("scan.png", vec![1]).unwrap();
        assert_eq!(image.content_type, "image/png");

        // No extension falls back to jpg.
        let image = AcceptedImage::accept("photo", vec![1]).unwrap();
        assert_eq!(image.extension, "jpg");
    }

    #[test]
    fn test_preview_data_uri() {
        let image = AcceptedImage::accept("a.png", vec![0, 1, 2]).unwrap();
        assert_eq!(image.preview_data_uri(), "data:image/png;base64,AAEC");
    }

    #[test]
    fn test_storage_path_convention() {
        let user_id: UserId = "4b4a8d7e-8f0a-4f87-9f2b-2f8f6a0b7c1d".parse().unwrap();
        let image = AcceptedImage::accept("photo.png", vec![1]).unwrap();
        assert_eq!(
            image.storage_path(user_id, 1_700_000_000_123),
            "4b4a8d7e-8f0a-4f87-9f2b-2f8f6a0b7c1d/\
             4b4a8d7e-8f0a-4f87-9f2b-2f8f6a0b7c1d-1700000000123.png"
        );
    }

    #[test]
    fn test_preview_slot_latest_ticket_wins() {
        let slot = PreviewSlot::new();
        let first = slot.issue();
        let second = slot.issue();

        // The late-arriving result of the first decode is dropped.
        assert!(!slot.apply(first, "data:stale".to_string()));
        assert!(slot.apply(second, "data:fresh".to_string()));
        assert_eq!(slot.latest().as_deref(), Some("data:fresh"));
    }

    #[test]
    fn test_preview_slot_out_of_order_arrival() {
        let slot = PreviewSlot::new();
        let first = slot.issue();
        let second = slot.issue();

        // Fresh result lands first; stale one must not clobber it.
        assert!(slot.apply(second, "data:fresh".to_string()));
        assert!(!slot.apply(first, "data:stale".to_string()));
        assert_eq!(slot.latest().as_deref(), Some("data:fresh"));
    }

    #[test]
    fn test_preview_slot_clear() {
        let slot = PreviewSlot::new();
        let ticket = slot.issue();
        assert!(slot.apply(ticket, "data:x".to_string()));
        slot.clear();
        assert_eq!(slot.latest(), None);
    }
}
