//! Row and payload types for the hosted backend tables.
//!
//! Field names match the backend's snake_case columns; the domain enums
//! from `etar-core` serialize to the same lowercase strings the tables
//! store.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use etar_core::{Category, FrameSize, FrameType, OrderStatus, Price, ProductId, UserId};

// =============================================================================
// Products (read-only)
// =============================================================================

/// A catalog product row.
#[derive(Debug, Clone, Deserialize)]
pub struct Product {
    /// Row ID.
    pub id: ProductId,
    /// URL handle, unique.
    pub slug: String,
    /// English title.
    pub title: String,
    /// Arabic title.
    pub title_ar: String,
    /// Ordered image URLs; the first one is the listing thumbnail.
    #[serde(default)]
    pub images: Vec<String>,
    /// Price per frame size in EGP.
    #[serde(default)]
    pub base_price: BTreeMap<FrameSize, Decimal>,
    /// Whether the product appears in the trending listing.
    #[serde(default)]
    pub is_trending: bool,
    /// Curated catalog section.
    pub category: Category,
}

impl Product {
    /// Cheapest size price, shown as "starting from" on listings.
    #[must_use]
    pub fn min_price(&self) -> Price {
        self.base_price
            .values()
            .copied()
            .min()
            .map_or_else(Price::zero, Price::new)
    }

    /// Title for the given locale.
    #[must_use]
    pub fn title_for(&self, arabic: bool) -> &str {
        if arabic { &self.title_ar } else { &self.title }
    }

    /// First image URL, if any.
    #[must_use]
    pub fn thumbnail(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }
}

// =============================================================================
// Orders
// =============================================================================

/// Delivery address captured at checkout.
///
/// Stored as a JSON column on the order row; not persisted anywhere else.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Address {
    pub governorate: String,
    pub city: String,
    pub street: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
}

/// Insert payload for the `orders` table.
#[derive(Debug, Clone, Serialize)]
pub struct OrderInsert {
    pub user_id: UserId,
    /// Always zero until cart integration lands; the column exists so the
    /// dashboard schema does not change when it does.
    pub total_price: Price,
    pub delivery_fee: Price,
    pub address_json: Address,
    pub status: OrderStatus,
}

/// An order row as read back for the account page.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderRow {
    pub id: etar_core::OrderId,
    pub total_price: Price,
    pub delivery_fee: Price,
    pub address_json: Address,
    pub status: OrderStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

// =============================================================================
// Custom orders
// =============================================================================

/// Insert payload for the `custom_orders` table.
#[derive(Debug, Clone, Serialize)]
pub struct CustomOrderInsert {
    pub user_id: UserId,
    /// Storage object path of the uploaded image.
    pub image_path: String,
    pub size: FrameSize,
    pub frame_type: FrameType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub quantity: u32,
    pub led_option: bool,
    pub status: OrderStatus,
}

/// A custom order row as read back for the account page.
#[derive(Debug, Clone, Deserialize)]
pub struct CustomOrderRow {
    pub id: etar_core::CustomOrderId,
    pub image_path: String,
    pub size: FrameSize,
    pub frame_type: FrameType,
    pub quantity: u32,
    pub led_option: bool,
    pub status: OrderStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

// =============================================================================
// Profiles
// =============================================================================

/// Patch payload for the `profiles` table, written once after sign-up.
#[derive(Debug, Clone, Serialize)]
pub struct ProfilePatch {
    pub name: String,
    pub phone1: String,
    pub phone2: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample_product(prices: &[(FrameSize, i64)]) -> Product {
        Product {
            id: ProductId::random(),
            slug: "classic-car".to_string(),
            title: "Classic Car".to_string(),
            title_ar: "سيارة كلاسيكية".to_string(),
            images: vec!["https://cdn.example/one.jpg".to_string()],
            base_price: prices
                .iter()
                .map(|&(size, p)| (size, Decimal::from(p)))
                .collect(),
            is_trending: true,
            category: Category::Cars,
        }
    }

    #[test]
    fn test_min_price_picks_cheapest_size() {
        let product = sample_product(&[
            (FrameSize::Small, 250),
            (FrameSize::Medium, 350),
            (FrameSize::Xlarge, 700),
        ]);
        assert_eq!(product.min_price(), Price::from_pounds(250));
    }

    #[test]
    fn test_min_price_empty_table_is_zero() {
        let product = sample_product(&[]);
        assert_eq!(product.min_price(), Price::zero());
    }

    #[test]
    fn test_product_row_deserializes_backend_shape() {
        let json = r#"{
            "id": "4b4a8d7e-8f0a-4f87-9f2b-2f8f6a0b7c1d",
            "slug": "sunset-art",
            "title": "Sunset",
            "title_ar": "غروب",
            "images": ["https://cdn.example/a.png", "https://cdn.example/b.png"],
            "base_price": {"small": 200, "large": 450},
            "is_trending": false,
            "category": "art"
        }"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.category, Category::Art);
        assert_eq!(product.thumbnail(), Some("https://cdn.example/a.png"));
        assert_eq!(product.min_price(), Price::from_pounds(200));
        assert_eq!(product.title_for(true), "غروب");
    }

    #[test]
    fn test_order_insert_serializes_address_inline() {
        let insert = OrderInsert {
            user_id: UserId::random(),
            total_price: Price::zero(),
            delivery_fee: Price::from_pounds(75),
            address_json: Address {
                governorate: "Giza".to_string(),
                city: "Dokki".to_string(),
                street: "12 Tahrir St".to_string(),
                postal_code: None,
            },
            status: OrderStatus::Pending,
        };
        let value = serde_json::to_value(&insert).unwrap();
        assert_eq!(value["status"], "pending");
        assert_eq!(value["address_json"]["governorate"], "Giza");
        // Optional postal code is omitted, not null.
        assert!(value["address_json"].get("postal_code").is_none());
    }
}
