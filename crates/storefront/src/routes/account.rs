//! Account page: profile summary plus order history.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{Result, clear_sentry_user};
use crate::filters;
use crate::i18n::PageContext;
use crate::middleware::{RequireAuth, clear_current_user};
use crate::state::AppState;
use crate::supabase::SupabaseError;
use crate::supabase::types::{CustomOrderRow, OrderRow};

use super::page_context;

/// An order row prepared for display.
#[derive(Clone)]
pub struct OrderView {
    pub placed_at: String,
    pub governorate: String,
    pub delivery_fee: String,
    pub total: String,
    pub status: &'static str,
}

/// A custom order row prepared for display.
#[derive(Clone)]
pub struct CustomOrderView {
    pub placed_at: String,
    pub size_label: &'static str,
    pub frame_type: &'static str,
    pub quantity: u32,
    pub led_option: bool,
    pub status: &'static str,
}

impl OrderView {
    pub(crate) fn from_row(row: &OrderRow) -> Self {
        Self {
            placed_at: row.created_at.format("%Y-%m-%d").to_string(),
            governorate: row.address_json.governorate.clone(),
            delivery_fee: row.delivery_fee.to_string(),
            total: row.total_price.to_string(),
            status: row.status.as_str(),
        }
    }
}

impl CustomOrderView {
    pub(crate) fn from_row(row: &CustomOrderRow) -> Self {
        Self {
            placed_at: row.created_at.format("%Y-%m-%d").to_string(),
            size_label: row.size.format_label(),
            frame_type: row.frame_type.as_str(),
            quantity: row.quantity,
            led_option: row.led_option,
            status: row.status.as_str(),
        }
    }
}

/// Account page template.
#[derive(Template, WebTemplate)]
#[template(path = "account.html")]
pub struct AccountTemplate {
    pub ctx: PageContext,
    pub name: Option<String>,
    pub email: String,
    pub phone: Option<String>,
    pub orders: Vec<OrderView>,
    pub custom_orders: Vec<CustomOrderView>,
}

/// Display the account page with both order histories.
///
/// The stored token is re-checked against the auth service before any
/// data is read; a rejected token clears the session and sends the
/// visitor back to sign-in instead of rendering with stale identity.
#[instrument(skip_all)]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(user): RequireAuth,
) -> Result<Response> {
    let auth_user = match state.auth().get_user(&user.access_token).await {
        Ok(auth_user) => auth_user,
        Err(SupabaseError::Api { status, message }) => {
            tracing::warn!(status, %message, "stored token rejected, clearing session");
            if let Err(e) = clear_current_user(&session).await {
                tracing::error!(error = %e, "failed to clear session");
            }
            clear_sentry_user();
            return Ok(Redirect::to("/auth/login?error=login_required").into_response());
        }
        Err(e) => return Err(e.into()),
    };

    let ctx = page_context(&session, Some(&user)).await;
    let phone = auth_user.phone("phone1").map(String::from);

    let orders = state.db().list_orders(&user.access_token, user.id).await?;
    let custom_orders = state
        .db()
        .list_custom_orders(&user.access_token, user.id)
        .await?;

    Ok(AccountTemplate {
        ctx,
        name: user.name.clone(),
        email: user.email.to_string(),
        phone,
        orders: orders.iter().map(OrderView::from_row).collect(),
        custom_orders: custom_orders
            .iter()
            .map(CustomOrderView::from_row)
            .collect(),
    }
    .into_response())
}
