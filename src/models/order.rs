use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::order::Order as DomainOrder;

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::orders)]
pub struct Order {
    pub id: i32,
    pub user_id: i32,
    pub status: String,
    pub contact_id: Option<i32>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::orders)]
pub struct NewOrder<'a> {
    pub user_id: i32,
    pub status: &'a str,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Identifiable, Queryable, Selectable, Associations)]
#[diesel(table_name = crate::schema::order_items)]
#[diesel(belongs_to(Order, foreign_key = order_id))]
pub struct OrderItem {
    pub id: i32,
    pub order_id: i32,
    pub product_info_id: Option<i32>,
    pub shop_id: i32,
    pub product_name: String,
    pub price: i32,
    pub quantity: i32,
}

/// Cart line with the listing's name and price copied at the time it is added.
#[derive(Insertable)]
#[diesel(table_name = crate::schema::order_items)]
pub struct NewOrderItem<'a> {
    pub order_id: i32,
    pub product_info_id: i32,
    pub shop_id: i32,
    pub product_name: &'a str,
    pub price: i32,
    pub quantity: i32,
}

impl From<Order> for DomainOrder {
    fn from(value: Order) -> Self {
        Self {
            id: value.id,
            user_id: value.user_id,
            status: value.status.as_str().into(),
            contact_id: value.contact_id,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}
