use serde::{Deserialize, Serialize};

use crate::domain::category::Category;
use crate::pagination::Pagination;

/// Catalog product shared by every shop that lists it.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Product {
    /// Unique identifier of the product.
    pub id: i32,
    /// Human-readable name of the product.
    pub name: String,
    /// Category the product belongs to.
    pub category_id: i32,
    /// Optional longer description shown to users.
    pub description: Option<String>,
    /// Optional stock keeping unit identifier, unique when present.
    pub sku: Option<String>,
}

/// Named attribute value attached to a listing, e.g. `color = red`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ProductParameterValue {
    pub parameter: String,
    pub value: String,
}

/// Compact shop reference embedded into listings.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ShopSummary {
    pub id: i32,
    pub name: String,
    pub state: bool,
}

/// Shop-specific offer of a product (a `ProductInfo` row) with its parameters.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ProductInfo {
    /// Identifier of the listing; this is what carts refer to.
    pub id: i32,
    pub product: Product,
    pub category: Category,
    pub shop: ShopSummary,
    /// Name of the offer as given by the supplier.
    pub name: String,
    pub model: Option<String>,
    /// Supplier-side identifier from the catalog feed.
    pub external_id: Option<i32>,
    /// Units in stock.
    pub quantity: i32,
    pub price: i32,
    /// Recommended retail price.
    pub price_rrc: i32,
    pub parameters: Vec<ProductParameterValue>,
}

/// Query definition used to filter and paginate listings.
#[derive(Debug, Clone, Default)]
pub struct ProductListQuery {
    pub shop_id: Option<i32>,
    pub category_id: Option<i32>,
    /// Hide listings of inactive shops and listings without stock.
    pub only_available: bool,
    pub pagination: Option<Pagination>,
}

impl ProductListQuery {
    /// Listings that can currently be ordered.
    pub fn available() -> Self {
        Self {
            only_available: true,
            ..Self::default()
        }
    }

    pub fn shop(mut self, shop_id: i32) -> Self {
        self.shop_id = Some(shop_id);
        self
    }

    pub fn category(mut self, category_id: i32) -> Self {
        self.category_id = Some(category_id);
        self
    }

    /// Apply pagination to the query with the given page number and page size.
    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}
