//! Checkout routes: the address form with its live delivery fee, and the
//! order submission.

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

use crate::filters;
use crate::i18n::PageContext;
use crate::middleware::{OptionalAuth, RequireAuth};
use crate::services::delivery::resolve_fee;
use crate::services::validation::AddressForm;
use crate::state::AppState;

use super::page_context;

/// Query parameters for the checkout page.
///
/// `governorate` comes from the form's own select, submitted as a GET so
/// the fee line refreshes without script.
#[derive(Debug, Deserialize)]
pub struct CheckoutQuery {
    pub governorate: Option<String>,
    pub error: Option<String>,
    pub notice: Option<String>,
    pub detail: Option<String>,
}

/// Governorate options shown in the checkout select, per locale. The
/// submitted name is what the fee lookup normalizes, so the two lists do
/// not need to stay in lockstep with the fee table.
const GOVERNORATES_EN: &[&str] = &[
    "Cairo",
    "Giza",
    "Alexandria",
    "Dakahlia",
    "Sharqia",
    "Gharbia",
    "Qalyubia",
    "Aswan",
    "Luxor",
    "Suez",
];
const GOVERNORATES_AR: &[&str] = &[
    "القاهرة",
    "الجيزة",
    "الإسكندرية",
    "الدقهلية",
    "الشرقية",
    "الغربية",
    "القليوبية",
    "أسوان",
    "الأقصر",
    "السويس",
];

/// A governorate option in the checkout select.
#[derive(Clone)]
pub struct GovernorateOption {
    pub name: &'static str,
    pub selected: bool,
}

/// Checkout page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout.html")]
pub struct CheckoutTemplate {
    pub ctx: PageContext,
    /// Governorate options for the active locale.
    pub governorates: Vec<GovernorateOption>,
    /// Selected governorate, carried back into the form.
    pub governorate: String,
    /// Fee for the current selection, recomputed server-side on POST.
    pub delivery_fee: u32,
}

/// Display the checkout form.
///
/// The fee shown here is advisory; the submission recomputes it from the
/// posted governorate.
#[instrument(skip_all)]
pub async fn page(
    session: Session,
    OptionalAuth(user): OptionalAuth,
    Query(query): Query<CheckoutQuery>,
) -> CheckoutTemplate {
    let ctx = page_context(&session, user.as_ref()).await.with_flash(
        query.error.as_deref(),
        query.notice.as_deref(),
        query.detail,
    );

    let governorate = query.governorate.unwrap_or_default();
    let delivery_fee = resolve_fee(&governorate);
    let names = match ctx.locale {
        crate::i18n::Locale::Ar => GOVERNORATES_AR,
        crate::i18n::Locale::En => GOVERNORATES_EN,
    };
    let governorates = names
        .iter()
        .map(|&name| GovernorateOption {
            name,
            selected: name == governorate,
        })
        .collect();

    CheckoutTemplate {
        ctx,
        governorates,
        governorate,
        delivery_fee,
    }
}

/// Handle the order submission.
#[instrument(skip_all)]
pub async fn place_order(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Form(form): Form<AddressForm>,
) -> Response {
    match state.intake().submit_checkout(Some(&user), &form).await {
        Ok(()) => Redirect::to("/account?notice=order_placed").into_response(),
        Err(e) => {
            Redirect::to(&format!("/checkout?{}", e.flash_query())).into_response()
        }
    }
}
