use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A vendor that lists products and fulfils orders.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Shop {
    pub id: i32,
    pub name: String,
    pub url: Option<String>,
    /// Owning account, if the shop has been claimed by a vendor user.
    pub user_id: Option<i32>,
    /// Whether the shop currently accepts orders.
    pub state: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}
