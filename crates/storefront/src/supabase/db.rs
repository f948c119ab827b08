//! PostgREST table client.
//!
//! Catalog reads go through a `moka` cache (5-minute TTL) because product
//! rows change rarely and every page renders some of them. Writes are
//! never cached and always carry the signed-in user's bearer token so
//! row-level security applies.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use secrecy::ExposeSecret;
use serde_json::json;
use tracing::{debug, instrument};

use etar_core::{Category, UserId};

use super::types::{CustomOrderInsert, CustomOrderRow, OrderInsert, OrderRow, Product, ProfilePatch};
use super::{SupabaseError, error_from_response};
use crate::config::SupabaseConfig;

/// Catalog read filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProductFilter {
    /// Restrict to one category.
    pub category: Option<Category>,
    /// Only rows flagged as trending.
    pub trending_only: bool,
    /// Maximum rows to return.
    pub limit: Option<u32>,
}

impl ProductFilter {
    fn cache_key(self) -> String {
        format!(
            "products:{}:{}:{}",
            self.category.map_or("all", Category::as_str),
            self.trending_only,
            self.limit.unwrap_or(0)
        )
    }
}

/// Cached catalog values.
#[derive(Clone)]
enum CacheValue {
    Products(Arc<Vec<Product>>),
    Product(Arc<Product>),
}

/// Client for the relational tables.
#[derive(Clone)]
pub struct Db {
    inner: Arc<DbInner>,
}

struct DbInner {
    client: reqwest::Client,
    base_url: String,
    anon_key: String,
    service_role_key: String,
    cache: Cache<String, CacheValue>,
}

impl Db {
    /// Create a new table client.
    #[must_use]
    pub fn new(config: &SupabaseConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        Self {
            inner: Arc::new(DbInner {
                client: reqwest::Client::new(),
                base_url: format!("{}/rest/v1", config.url),
                anon_key: config.anon_key.clone(),
                service_role_key: config.service_role_key.expose_secret().to_string(),
                cache,
            }),
        }
    }

    /// GET a table with query string, anon-scoped.
    async fn select<T: serde::de::DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, String)],
        bearer: Option<&str>,
    ) -> Result<T, SupabaseError> {
        let response = self
            .inner
            .client
            .get(format!("{}/{table}", self.inner.base_url))
            .header("apikey", &self.inner.anon_key)
            .bearer_auth(bearer.unwrap_or(&self.inner.anon_key))
            .query(query)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        Ok(response.json().await?)
    }

    /// POST a row into a table under the given bearer token.
    async fn insert<B: serde::Serialize>(
        &self,
        table: &str,
        bearer: &str,
        body: &B,
    ) -> Result<(), SupabaseError> {
        let response = self
            .inner
            .client
            .post(format!("{}/{table}", self.inner.base_url))
            .header("apikey", &self.inner.anon_key)
            .header("Prefer", "return=minimal")
            .bearer_auth(bearer)
            .json(body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        Ok(())
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// List catalog products, cached for five minutes.
    ///
    /// # Errors
    ///
    /// Returns an error when the backend request fails.
    #[instrument(skip(self))]
    pub async fn list_products(
        &self,
        filter: ProductFilter,
    ) -> Result<Arc<Vec<Product>>, SupabaseError> {
        let cache_key = filter.cache_key();

        if let Some(CacheValue::Products(products)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for product listing");
            return Ok(products);
        }

        let mut query: Vec<(&str, String)> = vec![
            ("select", "*".to_string()),
            ("order", "created_at.desc".to_string()),
        ];
        if let Some(category) = filter.category {
            query.push(("category", format!("eq.{category}")));
        }
        if filter.trending_only {
            query.push(("is_trending", "eq.true".to_string()));
        }
        if let Some(limit) = filter.limit {
            query.push(("limit", limit.to_string()));
        }

        let products: Vec<Product> = self.select("products", &query, None).await?;
        let products = Arc::new(products);

        self.inner
            .cache
            .insert(cache_key, CacheValue::Products(Arc::clone(&products)))
            .await;

        Ok(products)
    }

    /// Fetch one product by slug, cached for five minutes.
    ///
    /// # Errors
    ///
    /// Returns [`SupabaseError::NotFound`] when no row matches.
    #[instrument(skip(self), fields(slug = %slug))]
    pub async fn product_by_slug(&self, slug: &str) -> Result<Arc<Product>, SupabaseError> {
        let cache_key = format!("product:{slug}");

        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for product");
            return Ok(product);
        }

        let query = [
            ("select", "*".to_string()),
            ("slug", format!("eq.{slug}")),
            ("limit", "1".to_string()),
        ];
        let mut rows: Vec<Product> = self.select("products", &query, None).await?;

        let product = rows
            .pop()
            .ok_or_else(|| SupabaseError::NotFound(format!("product {slug}")))?;
        let product = Arc::new(product);

        self.inner
            .cache
            .insert(cache_key, CacheValue::Product(Arc::clone(&product)))
            .await;

        Ok(product)
    }

    // =========================================================================
    // Orders
    // =========================================================================

    /// Insert a checkout order under the user's token.
    ///
    /// # Errors
    ///
    /// Returns the service-reported error verbatim.
    #[instrument(skip(self, bearer, order))]
    pub async fn insert_order(&self, bearer: &str, order: &OrderInsert) -> Result<(), SupabaseError> {
        self.insert("orders", bearer, order).await
    }

    /// Insert a custom order under the user's token.
    ///
    /// # Errors
    ///
    /// Returns the service-reported error verbatim.
    #[instrument(skip(self, bearer, order))]
    pub async fn insert_custom_order(
        &self,
        bearer: &str,
        order: &CustomOrderInsert,
    ) -> Result<(), SupabaseError> {
        self.insert("custom_orders", bearer, order).await
    }

    /// List the user's orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error when the backend request fails.
    #[instrument(skip(self, bearer))]
    pub async fn list_orders(
        &self,
        bearer: &str,
        user_id: UserId,
    ) -> Result<Vec<OrderRow>, SupabaseError> {
        let query = [
            ("select", "*".to_string()),
            ("user_id", format!("eq.{user_id}")),
            ("order", "created_at.desc".to_string()),
        ];
        self.select("orders", &query, Some(bearer)).await
    }

    /// List the user's custom orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error when the backend request fails.
    #[instrument(skip(self, bearer))]
    pub async fn list_custom_orders(
        &self,
        bearer: &str,
        user_id: UserId,
    ) -> Result<Vec<CustomOrderRow>, SupabaseError> {
        let query = [
            ("select", "*".to_string()),
            ("user_id", format!("eq.{user_id}")),
            ("order", "created_at.desc".to_string()),
        ];
        self.select("custom_orders", &query, Some(bearer)).await
    }

    // =========================================================================
    // Profiles
    // =========================================================================

    /// Patch the user's profile row with the sign-up attributes.
    ///
    /// # Errors
    ///
    /// Returns the service-reported error verbatim.
    #[instrument(skip(self, bearer, patch))]
    pub async fn update_profile(
        &self,
        bearer: &str,
        user_id: UserId,
        patch: &ProfilePatch,
    ) -> Result<(), SupabaseError> {
        let response = self
            .inner
            .client
            .patch(format!("{}/profiles", self.inner.base_url))
            .header("apikey", &self.inner.anon_key)
            .header("Prefer", "return=minimal")
            .bearer_auth(bearer)
            .query(&[("id", format!("eq.{user_id}"))])
            .json(patch)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        Ok(())
    }

    // =========================================================================
    // Roles
    // =========================================================================

    /// Call the `has_role` database function, used to gate the dashboard.
    ///
    /// # Errors
    ///
    /// Returns an error when the RPC fails; callers treat that as a denied
    /// check, not as membership.
    #[instrument(skip(self, bearer))]
    pub async fn has_role(
        &self,
        bearer: &str,
        user_id: UserId,
        role: &str,
    ) -> Result<bool, SupabaseError> {
        let response = self
            .inner
            .client
            .post(format!("{}/rpc/has_role", self.inner.base_url))
            .header("apikey", &self.inner.anon_key)
            .bearer_auth(bearer)
            .json(&json!({ "_user_id": user_id, "_role": role }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        Ok(response.json().await?)
    }

    // =========================================================================
    // Dashboard reads (service-role scoped)
    // =========================================================================

    /// List the newest orders across all users for the dashboard.
    ///
    /// # Errors
    ///
    /// Returns an error when the backend request fails.
    #[instrument(skip(self))]
    pub async fn recent_orders(&self, limit: u32) -> Result<Vec<OrderRow>, SupabaseError> {
        let query = [
            ("select", "*".to_string()),
            ("order", "created_at.desc".to_string()),
            ("limit", limit.to_string()),
        ];
        self.select("orders", &query, Some(self.inner.service_role_key.as_str()))
            .await
    }

    /// List the newest custom orders across all users for the dashboard.
    ///
    /// # Errors
    ///
    /// Returns an error when the backend request fails.
    #[instrument(skip(self))]
    pub async fn recent_custom_orders(
        &self,
        limit: u32,
    ) -> Result<Vec<CustomOrderRow>, SupabaseError> {
        let query = [
            ("select", "*".to_string()),
            ("order", "created_at.desc".to_string()),
            ("limit", limit.to_string()),
        ];
        self.select(
            "custom_orders",
            &query,
            Some(self.inner.service_role_key.as_str()),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_key_distinguishes_filters() {
        let all = ProductFilter::default();
        let trending = ProductFilter {
            trending_only: true,
            ..ProductFilter::default()
        };
        let cars = ProductFilter {
            category: Some(Category::Cars),
            limit: Some(8),
            ..ProductFilter::default()
        };

        assert_ne!(all.cache_key(), trending.cache_key());
        assert_ne!(all.cache_key(), cars.cache_key());
        assert_eq!(cars.cache_key(), "products:cars:false:8");
    }
}
