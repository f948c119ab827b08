//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tower_sessions::Session;
use tracing::instrument;

use crate::filters;
use crate::i18n::PageContext;
use crate::middleware::OptionalAuth;
use crate::state::AppState;
use crate::supabase::ProductFilter;

use super::page_context;
use super::products::ProductView;

/// Number of trending products on the home page strip.
const TRENDING_LIMIT: u32 = 8;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub ctx: PageContext,
    /// Trending products for the strip under the hero.
    pub trending: Vec<ProductView>,
}

/// Display the home page.
///
/// The trending strip degrades to empty when the backend is unreachable;
/// the page itself always renders.
#[instrument(skip_all)]
pub async fn home(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(user): OptionalAuth,
) -> HomeTemplate {
    let ctx = page_context(&session, user.as_ref()).await;

    let filter = ProductFilter {
        trending_only: true,
        limit: Some(TRENDING_LIMIT),
        ..ProductFilter::default()
    };

    let trending = match state.db().list_products(filter).await {
        Ok(products) => products
            .iter()
            .map(|p| ProductView::from_product(p, &ctx))
            .collect(),
        Err(e) => {
            tracing::error!("Failed to fetch trending products: {e}");
            Vec::new()
        }
    };

    HomeTemplate { ctx, trending }
}
