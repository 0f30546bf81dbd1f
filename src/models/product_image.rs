use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::product_image::{
    NewProductImage as DomainNewProductImage, ProductImage as DomainProductImage,
    UpdateProductImage as DomainUpdateProductImage,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::product_images)]
pub struct ProductImage {
    pub id: i32,
    pub product_id: i32,
    pub image: String,
    pub thumbnail: Option<String>,
    pub medium: Option<String>,
    pub large: Option<String>,
    pub webp: Option<String>,
    pub alt_text: String,
    pub is_main: bool,
    pub display_order: i32,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::product_images)]
pub struct NewProductImage<'a> {
    pub product_id: i32,
    pub image: &'a str,
    pub alt_text: &'a str,
    pub display_order: i32,
    pub created_at: NaiveDateTime,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::product_images)]
pub struct UpdateProductImage<'a> {
    pub alt_text: Option<&'a str>,
    pub display_order: Option<i32>,
    pub thumbnail: Option<&'a str>,
    pub medium: Option<&'a str>,
    pub large: Option<&'a str>,
    pub webp: Option<&'a str>,
}

impl From<ProductImage> for DomainProductImage {
    fn from(value: ProductImage) -> Self {
        Self {
            id: value.id,
            product_id: value.product_id,
            image: value.image,
            thumbnail: value.thumbnail,
            medium: value.medium,
            large: value.large,
            webp: value.webp,
            alt_text: value.alt_text,
            is_main: value.is_main,
            display_order: value.display_order,
            created_at: value.created_at,
        }
    }
}

impl<'a> From<&'a DomainNewProductImage> for NewProductImage<'a> {
    fn from(value: &'a DomainNewProductImage) -> Self {
        Self {
            product_id: value.product_id,
            image: value.image.as_str(),
            alt_text: value.alt_text.as_str(),
            display_order: value.display_order,
            created_at: value.created_at,
        }
    }
}

impl<'a> From<&'a DomainUpdateProductImage> for UpdateProductImage<'a> {
    fn from(value: &'a DomainUpdateProductImage) -> Self {
        Self {
            alt_text: value.alt_text.as_deref(),
            display_order: value.display_order,
            thumbnail: value.thumbnail.as_deref(),
            medium: value.medium.as_deref(),
            large: value.large.as_deref(),
            webp: value.webp.as_deref(),
        }
    }
}
