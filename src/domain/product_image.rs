use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Uploaded product picture with the variants produced by the image pipeline.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ProductImage {
    pub id: i32,
    pub product_id: i32,
    /// Path of the original upload relative to the media root.
    pub image: String,
    /// 100×100 cropped variant.
    pub thumbnail: Option<String>,
    /// Fits into 500×500.
    pub medium: Option<String>,
    /// Fits into 800×800.
    pub large: Option<String>,
    pub webp: Option<String>,
    pub alt_text: String,
    pub is_main: bool,
    pub display_order: i32,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone)]
pub struct NewProductImage {
    pub product_id: i32,
    pub image: String,
    pub alt_text: String,
    pub is_main: bool,
    pub display_order: i32,
    pub created_at: NaiveDateTime,
}

impl NewProductImage {
    pub fn new(product_id: i32, image: impl Into<String>) -> Self {
        Self {
            product_id,
            image: image.into(),
            alt_text: String::new(),
            is_main: false,
            display_order: 0,
            created_at: Local::now().naive_utc(),
        }
    }

    pub fn with_alt_text(mut self, alt_text: impl Into<String>) -> Self {
        self.alt_text = alt_text.into();
        self
    }

    pub fn with_display_order(mut self, display_order: i32) -> Self {
        self.display_order = display_order;
        self
    }

    /// Request promotion to main image once inserted.
    pub fn main(mut self) -> Self {
        self.is_main = true;
        self
    }
}

/// Partial update; variant paths are written back by the image pipeline.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateProductImage {
    pub alt_text: Option<String>,
    pub display_order: Option<i32>,
    pub thumbnail: Option<String>,
    pub medium: Option<String>,
    pub large: Option<String>,
    pub webp: Option<String>,
}
