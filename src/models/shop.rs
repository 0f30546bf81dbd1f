use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::shop::Shop as DomainShop;

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::shops)]
pub struct Shop {
    pub id: i32,
    pub name: String,
    pub url: Option<String>,
    pub user_id: Option<i32>,
    pub state: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::shops)]
pub struct NewShop<'a> {
    pub name: &'a str,
    pub url: Option<&'a str>,
    pub user_id: Option<i32>,
    pub updated_at: NaiveDateTime,
}

impl From<Shop> for DomainShop {
    fn from(value: Shop) -> Self {
        Self {
            id: value.id,
            name: value.name,
            url: value.url,
            user_id: value.user_id,
            state: value.state,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}
