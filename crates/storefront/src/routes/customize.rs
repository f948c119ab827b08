//! Custom-order routes: the form and its multipart submission.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Multipart, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use etar_core::{FrameSize, FrameType};

use crate::filters;
use crate::i18n::PageContext;
use crate::middleware::{OptionalAuth, RequireAuth};
use crate::services::intake::{AcceptedImage, IntakeError};
use crate::services::validation::CustomOrderForm;
use crate::state::AppState;

use super::page_context;

/// Query parameters for flash display.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
    pub notice: Option<String>,
    pub detail: Option<String>,
}

/// A size option in the form's select.
#[derive(Clone)]
pub struct SizeOption {
    pub value: &'static str,
    pub label: &'static str,
}

/// A frame material option in the form's select.
#[derive(Clone)]
pub struct FrameOption {
    pub value: &'static str,
    pub label: &'static str,
}

/// Custom-order page template.
#[derive(Template, WebTemplate)]
#[template(path = "customize.html")]
pub struct CustomizeTemplate {
    pub ctx: PageContext,
    pub sizes: Vec<SizeOption>,
    pub frames: Vec<FrameOption>,
    /// Staged preview of the chosen photo, as a `data:` URI.
    pub preview: Option<String>,
}

/// Display the custom-order form.
#[instrument(skip_all)]
pub async fn page(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(user): OptionalAuth,
    Query(query): Query<MessageQuery>,
) -> CustomizeTemplate {
    let ctx = page_context(&session, user.as_ref()).await.with_flash(
        query.error.as_deref(),
        query.notice.as_deref(),
        query.detail,
    );

    let sizes = FrameSize::ALL
        .iter()
        .map(|&size| SizeOption {
            value: size.as_str(),
            label: size.format_label(),
        })
        .collect();

    let frames = FrameType::ALL
        .iter()
        .map(|&frame| FrameOption {
            value: frame.as_str(),
            label: match frame {
                FrameType::Wood => ctx.t.frame_wood,
                FrameType::Metal => ctx.t.frame_metal,
                FrameType::Acrylic => ctx.t.frame_acrylic,
            },
        })
        .collect();

    let preview = user
        .as_ref()
        .and_then(|u| state.intake().latest_preview(u.id));

    CustomizeTemplate {
        ctx,
        sizes,
        frames,
        preview,
    }
}

/// Stage a photo preview without submitting the order.
///
/// The preview form posts here when the user picks a photo; the staged
/// data URI is shown on the next page load. A quick second pick
/// supersedes a still-encoding first one, and the "change image" button
/// posts the `clear` field to discard the staged preview.
#[instrument(skip_all)]
pub async fn preview(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    mut multipart: Multipart,
) -> Response {
    let mut image: Option<AcceptedImage> = None;
    let mut clear = false;

    while let Ok(Some(field)) = multipart.next_field().await {
        let Some(name) = field.name().map(String::from) else {
            continue;
        };

        match name.as_str() {
            "image" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                match field.bytes().await {
                    Ok(bytes) if bytes.is_empty() => {}
                    Ok(bytes) => match AcceptedImage::accept(&file_name, bytes.to_vec()) {
                        Ok(accepted) => image = Some(accepted),
                        Err(IntakeError::TooLarge) => {
                            return Redirect::to("/customize?error=image_too_large")
                                .into_response();
                        }
                    },
                    Err(e) => {
                        tracing::warn!(error = %e, "reading preview upload failed");
                        return Redirect::to("/customize?error=image_too_large").into_response();
                    }
                }
            }
            "clear" => clear = true,
            _ => {}
        }
    }

    match image {
        Some(image) => {
            state.intake().stage_preview(user.id, image).await;
            Redirect::to("/customize").into_response()
        }
        None if clear => {
            state.intake().clear_preview(user.id);
            Redirect::to("/customize").into_response()
        }
        None => Redirect::to("/customize?error=image_required").into_response(),
    }
}

/// Handle the custom-order submission.
///
/// The multipart body carries the form fields and the image. The image is
/// size-gated while the body streams in; an oversized file redirects back
/// immediately without reaching the submission flow.
#[instrument(skip_all)]
pub async fn submit(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    mut multipart: Multipart,
) -> Response {
    let mut form = CustomOrderForm::default();
    let mut image: Option<AcceptedImage> = None;

    while let Ok(Some(field)) = multipart.next_field().await {
        let Some(name) = field.name().map(String::from) else {
            continue;
        };

        match name.as_str() {
            "image" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                match field.bytes().await {
                    Ok(bytes) if bytes.is_empty() => {}
                    Ok(bytes) => match AcceptedImage::accept(&file_name, bytes.to_vec()) {
                        Ok(accepted) => image = Some(accepted),
                        Err(IntakeError::TooLarge) => {
                            return Redirect::to("/customize?error=image_too_large")
                                .into_response();
                        }
                    },
                    Err(e) => {
                        tracing::warn!(error = %e, "reading upload failed");
                        return Redirect::to("/customize?error=image_too_large").into_response();
                    }
                }
            }
            other => {
                let Ok(value) = field.text().await else {
                    continue;
                };
                match other {
                    "size" => form.size = value,
                    "frame_type" => form.frame_type = value,
                    "notes" => form.notes = value,
                    "quantity" => form.quantity = value.trim().parse().unwrap_or(0),
                    "led_option" => form.led_option = value == "on" || value == "true",
                    _ => {}
                }
            }
        }
    }

    match state
        .intake()
        .submit_custom_order(Some(&user), &form, image)
        .await
    {
        Ok(()) => Redirect::to("/account?notice=custom_order_placed").into_response(),
        Err(e) => Redirect::to(&format!("/customize?{}", e.flash_query())).into_response(),
    }
}
