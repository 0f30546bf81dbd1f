use diesel::prelude::*;

use crate::domain::product::Product as DomainProduct;

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::products)]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub category_id: i32,
    pub description: Option<String>,
    pub sku: Option<String>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::products)]
pub struct NewProduct<'a> {
    pub name: &'a str,
    pub category_id: i32,
}

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::product_infos)]
pub struct ProductInfo {
    pub id: i32,
    pub product_id: i32,
    pub shop_id: i32,
    pub name: String,
    pub model: Option<String>,
    pub external_id: Option<i32>,
    pub quantity: i32,
    pub price: i32,
    pub price_rrc: i32,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::product_infos)]
pub struct NewProductInfo<'a> {
    pub product_id: i32,
    pub shop_id: i32,
    pub name: &'a str,
    pub model: Option<&'a str>,
    pub external_id: Option<i32>,
    pub quantity: i32,
    pub price: i32,
    pub price_rrc: i32,
}

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::parameters)]
pub struct Parameter {
    pub id: i32,
    pub name: String,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::parameters)]
pub struct NewParameter<'a> {
    pub name: &'a str,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::product_parameters)]
pub struct NewProductParameter<'a> {
    pub product_info_id: i32,
    pub parameter_id: i32,
    pub value: &'a str,
}

impl From<Product> for DomainProduct {
    fn from(value: Product) -> Self {
        Self {
            id: value.id,
            name: value.name,
            category_id: value.category_id,
            description: value.description,
            sku: value.sku,
        }
    }
}
