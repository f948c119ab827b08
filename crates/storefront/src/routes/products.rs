//! Catalog route handlers: explore, category listings, trends, and the
//! product detail page.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, State};
use tower_sessions::Session;
use tracing::instrument;

use etar_core::Category;

use crate::error::{AppError, Result};
use crate::filters;
use crate::i18n::{Messages, PageContext};
use crate::middleware::OptionalAuth;
use crate::state::AppState;
use crate::supabase::ProductFilter;
use crate::supabase::types::Product;

use super::page_context;

// =============================================================================
// View types
// =============================================================================

/// Product display data for listing templates.
#[derive(Clone)]
pub struct ProductView {
    pub slug: String,
    pub title: String,
    pub thumbnail: Option<String>,
    pub category_label: &'static str,
    pub min_price: String,
    pub is_trending: bool,
}

impl ProductView {
    pub(crate) fn from_product(product: &Product, ctx: &PageContext) -> Self {
        Self {
            slug: product.slug.clone(),
            title: product.title_for(ctx.locale == crate::i18n::Locale::Ar).to_string(),
            thumbnail: product.thumbnail().map(String::from),
            category_label: category_label(ctx.t, product.category),
            min_price: product.min_price().to_string(),
            is_trending: product.is_trending,
        }
    }
}

/// One row of the size/price table on the detail page.
#[derive(Clone)]
pub struct PriceRow {
    /// Paper-format size label like "A4".
    pub label: String,
    pub price: String,
}

/// Product detail display data.
#[derive(Clone)]
pub struct ProductDetailView {
    pub title: String,
    pub images: Vec<String>,
    pub category_label: &'static str,
    pub prices: Vec<PriceRow>,
    pub is_trending: bool,
}

/// A category tab on the listing pages.
#[derive(Clone)]
pub struct CategoryTab {
    pub href: String,
    pub label: &'static str,
    pub active: bool,
}

/// Localized label for a category.
fn category_label(t: &'static Messages, category: Category) -> &'static str {
    match category {
        Category::Cars => t.category_cars,
        Category::Motorbikes => t.category_motorbikes,
        Category::Art => t.category_art,
        Category::Misc => t.category_misc,
    }
}

/// Build the category tab row, marking the active one.
fn category_tabs(ctx: &PageContext, active: Option<Category>) -> Vec<CategoryTab> {
    Category::ALL
        .iter()
        .map(|&category| CategoryTab {
            href: format!("/category/{category}"),
            label: category_label(ctx.t, category),
            active: active == Some(category),
        })
        .collect()
}

// =============================================================================
// Templates
// =============================================================================

/// Product listing page template, shared by explore/category/trends.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub ctx: PageContext,
    pub heading: &'static str,
    pub tabs: Vec<CategoryTab>,
    pub products: Vec<ProductView>,
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub ctx: PageContext,
    pub product: ProductDetailView,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the full catalog with category tabs.
#[instrument(skip_all)]
pub async fn explore(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(user): OptionalAuth,
) -> Result<ProductsIndexTemplate> {
    let ctx = page_context(&session, user.as_ref()).await;
    let products = state.db().list_products(ProductFilter::default()).await?;

    Ok(ProductsIndexTemplate {
        heading: ctx.t.nav_explore,
        tabs: category_tabs(&ctx, None),
        products: products
            .iter()
            .map(|p| ProductView::from_product(p, &ctx))
            .collect(),
        ctx,
    })
}

/// Display one category's products.
#[instrument(skip_all, fields(category = %category))]
pub async fn category(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(user): OptionalAuth,
    Path(category): Path<String>,
) -> Result<ProductsIndexTemplate> {
    let category: Category = category
        .parse()
        .map_err(|_| AppError::NotFound(format!("category {category}")))?;

    let ctx = page_context(&session, user.as_ref()).await;
    let filter = ProductFilter {
        category: Some(category),
        ..ProductFilter::default()
    };
    let products = state.db().list_products(filter).await?;

    Ok(ProductsIndexTemplate {
        heading: category_label(ctx.t, category),
        tabs: category_tabs(&ctx, Some(category)),
        products: products
            .iter()
            .map(|p| ProductView::from_product(p, &ctx))
            .collect(),
        ctx,
    })
}

/// Display the trending products.
#[instrument(skip_all)]
pub async fn trends(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(user): OptionalAuth,
) -> Result<ProductsIndexTemplate> {
    let ctx = page_context(&session, user.as_ref()).await;
    let filter = ProductFilter {
        trending_only: true,
        ..ProductFilter::default()
    };
    let products = state.db().list_products(filter).await?;

    Ok(ProductsIndexTemplate {
        heading: ctx.t.nav_trends,
        tabs: category_tabs(&ctx, None),
        products: products
            .iter()
            .map(|p| ProductView::from_product(p, &ctx))
            .collect(),
        ctx,
    })
}

/// Display the product detail page with its per-size price table.
#[instrument(skip_all, fields(slug = %slug))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(user): OptionalAuth,
    Path(slug): Path<String>,
) -> Result<ProductShowTemplate> {
    let ctx = page_context(&session, user.as_ref()).await;
    let product = state.db().product_by_slug(&slug).await?;

    // The price table iterates sizes smallest-first.
    let prices = product
        .base_price
        .iter()
        .map(|(&size, &price)| PriceRow {
            label: size.format_label().to_string(),
            price: etar_core::Price::new(price).to_string(),
        })
        .collect();

    let detail = ProductDetailView {
        title: product
            .title_for(ctx.locale == crate::i18n::Locale::Ar)
            .to_string(),
        images: product.images.clone(),
        category_label: category_label(ctx.t, product.category),
        prices,
        is_trending: product.is_trending,
    };

    Ok(ProductShowTemplate {
        ctx,
        product: detail,
    })
}
