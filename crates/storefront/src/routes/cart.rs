//! Cart page.
//!
//! Persistent carts are not built yet; the page explains that and links
//! to checkout for manual orders. The route exists so navigation and the
//! checkout entry point do not change when carts land.

use askama::Template;
use askama_web::WebTemplate;
use tower_sessions::Session;

use crate::filters;
use crate::i18n::PageContext;
use crate::middleware::OptionalAuth;

use super::page_context;

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart.html")]
pub struct CartTemplate {
    pub ctx: PageContext,
}

/// Display the cart page.
pub async fn show(session: Session, OptionalAuth(user): OptionalAuth) -> CartTemplate {
    let ctx = page_context(&session, user.as_ref()).await;
    CartTemplate { ctx }
}
