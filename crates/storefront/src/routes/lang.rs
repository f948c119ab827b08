//! Language switch route.

use axum::{
    extract::Path,
    http::HeaderMap,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;
use tracing::instrument;

use crate::i18n::{Locale, set_locale};

/// Switch the display language and redirect back to the referring page.
///
/// Unknown codes leave the stored locale untouched. Only local paths are
/// accepted as the return target; anything else (absolute URLs,
/// scheme-relative `//host` forms) falls back to the home page so the
/// Referer header cannot steer visitors off-site.
#[instrument(skip(session, headers))]
pub async fn switch(session: Session, headers: HeaderMap, Path(code): Path<String>) -> Response {
    if let Some(locale) = Locale::from_code(&code) {
        if let Err(e) = set_locale(&session, locale).await {
            tracing::error!(error = %e, "failed to store locale");
        }
    }

    let back = headers
        .get(axum::http::header::REFERER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| v.starts_with('/') && !v.starts_with("//"))
        .unwrap_or("/");

    Redirect::to(back).into_response()
}
