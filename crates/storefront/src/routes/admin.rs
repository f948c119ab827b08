//! Dashboard route: a recent-orders overview gated by the `admin` role.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::filters;
use crate::i18n::PageContext;
use crate::middleware::RequireAuth;
use crate::state::AppState;

use super::account::{CustomOrderView, OrderView};
use super::page_context;

/// Rows per dashboard panel.
const RECENT_LIMIT: u32 = 20;

/// Dashboard page template.
#[derive(Template, WebTemplate)]
#[template(path = "admin.html")]
pub struct AdminTemplate {
    pub ctx: PageContext,
    pub orders: Vec<OrderView>,
    pub custom_orders: Vec<CustomOrderView>,
}

/// Display the dashboard.
///
/// The role check runs against the backend on every request; a failed
/// check (including RPC errors) renders as not-found so the page does not
/// advertise its existence.
#[instrument(skip_all)]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(user): RequireAuth,
) -> Result<AdminTemplate> {
    let is_admin = state
        .db()
        .has_role(&user.access_token, user.id, "admin")
        .await
        .unwrap_or(false);
    if !is_admin {
        return Err(AppError::NotFound("page".to_string()));
    }

    let ctx = page_context(&session, Some(&user)).await;

    let orders = state.db().recent_orders(RECENT_LIMIT).await?;
    let custom_orders = state.db().recent_custom_orders(RECENT_LIMIT).await?;

    Ok(AdminTemplate {
        ctx,
        orders: orders.iter().map(OrderView::from_row).collect(),
        custom_orders: custom_orders
            .iter()
            .map(CustomOrderView::from_row)
            .collect(),
    })
}
