//! Authentication route handlers.
//!
//! Handles login, registration, and logout against the hosted auth
//! service. Failures redirect back to the form with a flash code; the
//! localized text is resolved at render time.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::i18n::PageContext;
use crate::middleware::{OptionalAuth, clear_current_user, set_current_user};
use crate::models::CurrentUser;
use crate::state::AppState;
use crate::supabase::{AuthSession, SignUpProfile};
use crate::services::validation::validate_phone;
use crate::supabase::types::ProfilePatch;

use super::page_context;

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Registration form data.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone1: String,
    #[serde(default)]
    pub phone2: String,
}

/// Query parameters for flash display.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
    pub notice: Option<String>,
    pub detail: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub ctx: PageContext,
}

/// Register page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub ctx: PageContext,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the login page.
pub async fn login_page(
    session: Session,
    OptionalAuth(user): OptionalAuth,
    Query(query): Query<MessageQuery>,
) -> LoginTemplate {
    let ctx = page_context(&session, user.as_ref()).await.with_flash(
        query.error.as_deref(),
        query.notice.as_deref(),
        query.detail,
    );
    LoginTemplate { ctx }
}

/// Handle login form submission.
#[instrument(skip_all, fields(email = %form.email))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Response {
    match state.auth().sign_in(&form.email, &form.password).await {
        Ok(auth) => establish_session(&session, auth).await,
        Err(e) => {
            tracing::warn!(error = %e, "login failed");
            Redirect::to("/auth/login?error=invalid_credentials").into_response()
        }
    }
}

/// Display the registration page.
pub async fn register_page(
    session: Session,
    OptionalAuth(user): OptionalAuth,
    Query(query): Query<MessageQuery>,
) -> RegisterTemplate {
    let ctx = page_context(&session, user.as_ref()).await.with_flash(
        query.error.as_deref(),
        query.notice.as_deref(),
        query.detail,
    );
    RegisterTemplate { ctx }
}

/// Handle registration form submission.
///
/// Both phone numbers must be valid Egyptian mobile numbers (the second
/// is optional and only checked when supplied); the checks run before any
/// network call. After the account is created the profile row is patched
/// with the contact details so the dashboard can read them without going
/// through user metadata.
#[instrument(skip_all, fields(email = %form.email))]
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RegisterForm>,
) -> Response {
    if validate_phone("phone1", &form.phone1).is_err() {
        return Redirect::to("/auth/register?error=phone1_invalid").into_response();
    }
    if !form.phone2.trim().is_empty() && validate_phone("phone2", form.phone2.trim()).is_err() {
        return Redirect::to("/auth/register?error=phone2_invalid").into_response();
    }

    let profile = SignUpProfile {
        name: form.name.trim().to_string(),
        phone1: form.phone1.trim().to_string(),
        phone2: form.phone2.trim().to_string(),
    };

    let auth = match state
        .auth()
        .sign_up(&form.email, &form.password, &profile)
        .await
    {
        Ok(auth) => auth,
        Err(e) => {
            tracing::warn!(error = %e, "sign-up failed");
            return Redirect::to("/auth/register?error=signup_failed").into_response();
        }
    };

    // Best effort: the account exists even if the profile patch fails.
    let patch = ProfilePatch {
        name: profile.name.clone(),
        phone1: profile.phone1.clone(),
        phone2: profile.phone2.clone(),
    };
    if let Err(e) = state
        .db()
        .update_profile(&auth.access_token, auth.user.id, &patch)
        .await
    {
        tracing::warn!(error = %e, "profile patch after sign-up failed");
    }

    establish_session(&session, auth).await
}

/// Handle logout.
///
/// The backend token is revoked best-effort; the local session is always
/// cleared.
#[instrument(skip_all)]
pub async fn logout(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(user): OptionalAuth,
) -> Response {
    if let Some(user) = user {
        if let Err(e) = state.auth().sign_out(&user.access_token).await {
            tracing::warn!(error = %e, "token revocation failed");
        }
    }

    if let Err(e) = clear_current_user(&session).await {
        tracing::error!(error = %e, "failed to clear session");
    }
    clear_sentry_user();

    Redirect::to("/").into_response()
}

/// Store the authenticated user in the session and redirect home.
async fn establish_session(session: &Session, auth: AuthSession) -> Response {
    let user = CurrentUser {
        id: auth.user.id,
        email: auth.user.email.clone(),
        name: auth.user.name().map(String::from),
        access_token: auth.access_token,
    };

    if let Err(e) = set_current_user(session, &user).await {
        tracing::error!(error = %e, "failed to store session");
        return Redirect::to("/auth/login?error=login_failed").into_response();
    }

    set_sentry_user(&user.id, Some(user.email.as_str()));
    Redirect::to("/").into_response()
}
