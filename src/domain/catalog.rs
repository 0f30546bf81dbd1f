use serde::Serialize;

use crate::domain::category::Category;
use crate::domain::product::ProductParameterValue;

/// One offer of a validated supplier feed.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportGood {
    pub external_id: Option<i32>,
    pub model: Option<String>,
    pub name: String,
    pub category_id: i32,
    pub price: i32,
    pub price_rrc: i32,
    pub quantity: i32,
    pub parameters: Vec<ProductParameterValue>,
}

/// A validated supplier feed ready to replace a shop's listings.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogImport {
    pub shop_name: String,
    pub url: String,
    pub categories: Vec<Category>,
    pub goods: Vec<ImportGood>,
}

/// Counts reported after a successful import.
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq, Default)]
pub struct ImportSummary {
    pub shop_id: i32,
    pub categories: usize,
    pub products: usize,
    pub listings: usize,
    pub parameters: usize,
}
