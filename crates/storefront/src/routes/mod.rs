//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (pings the auth service)
//!
//! # Catalog
//! GET  /explore                - Full catalog, category tabs
//! GET  /category/{category}    - Catalog filtered to one category
//! GET  /trends                 - Trending products
//! GET  /products/{slug}        - Product detail with size-based pricing
//!
//! # Cart and checkout
//! GET  /cart                   - Cart page (stub)
//! GET  /checkout               - Address form with live delivery fee
//! POST /checkout               - Place the order
//!
//! # Custom orders
//! GET  /customize              - Custom-order form
//! POST /customize              - Submit with image upload (multipart)
//! POST /customize/preview      - Stage a photo preview (multipart)
//!
//! # Auth
//! GET  /auth/login             - Login page
//! POST /auth/login             - Login action
//! GET  /auth/register          - Register page
//! POST /auth/register          - Register action
//! POST /auth/logout            - Logout action
//!
//! # Account (requires auth)
//! GET  /account                - Profile, orders, custom orders
//!
//! # Dashboard (requires auth + admin role)
//! GET  /admin                  - Recent orders overview
//!
//! # Language
//! GET  /lang/{code}            - Switch display language, redirect back
//! ```

pub mod account;
pub mod admin;
pub mod auth;
pub mod cart;
pub mod checkout;
pub mod customize;
pub mod health;
pub mod home;
pub mod lang;
pub mod products;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use tower_sessions::Session;

use crate::i18n::{self, PageContext};
use crate::models::CurrentUser;
use crate::state::AppState;

/// Multipart body limit for the custom-order upload: the 10 MiB image
/// plus headroom for the other form fields and boundary overhead. The
/// exact image gate lives in the intake service.
const CUSTOMIZE_BODY_LIMIT: usize = 12 * 1024 * 1024;

/// Build the shared page context from the session and the optional user.
pub(crate) async fn page_context(session: &Session, user: Option<&CurrentUser>) -> PageContext {
    let locale = i18n::locale_from_session(session).await;
    PageContext::new(locale, user.is_some())
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/logout", post(auth::logout))
}

/// Create the catalog routes router (mounted at the root).
pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/explore", get(products::explore))
        .route("/category/{category}", get(products::category))
        .route("/trends", get(products::trends))
        .route("/products/{slug}", get(products::show))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Home page
        .route("/", get(home::home))
        // Catalog routes
        .merge(catalog_routes())
        // Cart and checkout
        .route("/cart", get(cart::show))
        .route("/checkout", get(checkout::page).post(checkout::place_order))
        // Custom orders (multipart upload)
        .route(
            "/customize",
            get(customize::page)
                .post(customize::submit)
                .layer(DefaultBodyLimit::max(CUSTOMIZE_BODY_LIMIT)),
        )
        .route(
            "/customize/preview",
            post(customize::preview).layer(DefaultBodyLimit::max(CUSTOMIZE_BODY_LIMIT)),
        )
        // Auth routes
        .nest("/auth", auth_routes())
        // Account
        .route("/account", get(account::index))
        // Dashboard
        .route("/admin", get(admin::index))
        // Language switch
        .route("/lang/{code}", get(lang::switch))
        // Health checks
        .route("/health", get(health::liveness))
        .route("/health/ready", get(health::readiness))
}
