use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::contact::Contact;
use crate::pagination::Pagination;

/// Lifecycle states of an order.
///
/// `Cart` is the mutable basket; every other state is a placed order.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Cart,
    New,
    Confirmed,
    Assembled,
    Sent,
    Delivered,
    Canceled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Cart => "cart",
            OrderStatus::New => "new",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Assembled => "assembled",
            OrderStatus::Sent => "sent",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Canceled => "canceled",
        }
    }

    /// Human readable label used in customer and admin emails.
    pub fn label(&self) -> &'static str {
        match self {
            OrderStatus::Cart => "Корзина",
            OrderStatus::New => "Новый",
            OrderStatus::Confirmed => "Подтверждён",
            OrderStatus::Assembled => "Собран",
            OrderStatus::Sent => "Отправлен",
            OrderStatus::Delivered => "Доставлен",
            OrderStatus::Canceled => "Отменён",
        }
    }

    /// Parse a stored or submitted status value.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "cart" => Some(OrderStatus::Cart),
            "new" => Some(OrderStatus::New),
            "confirmed" => Some(OrderStatus::Confirmed),
            "assembled" => Some(OrderStatus::Assembled),
            "sent" => Some(OrderStatus::Sent),
            "delivered" => Some(OrderStatus::Delivered),
            "canceled" | "cancelled" => Some(OrderStatus::Canceled),
            _ => None,
        }
    }

    /// `Delivered` and `Canceled` accept no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Canceled)
    }

    /// Whether the order may move from `self` to `next`.
    ///
    /// The forward path is `cart → new → confirmed → assembled → sent → delivered`,
    /// one step at a time; `canceled` is reachable from every non-terminal state.
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        if self.is_terminal() {
            return false;
        }
        if next == OrderStatus::Canceled {
            return true;
        }
        self.next() == Some(next)
    }

    fn next(&self) -> Option<OrderStatus> {
        match self {
            OrderStatus::Cart => Some(OrderStatus::New),
            OrderStatus::New => Some(OrderStatus::Confirmed),
            OrderStatus::Confirmed => Some(OrderStatus::Assembled),
            OrderStatus::Assembled => Some(OrderStatus::Sent),
            OrderStatus::Sent => Some(OrderStatus::Delivered),
            OrderStatus::Delivered | OrderStatus::Canceled => None,
        }
    }
}

impl From<&str> for OrderStatus {
    fn from(value: &str) -> Self {
        OrderStatus::parse(value).unwrap_or_default()
    }
}

impl From<OrderStatus> for &'static str {
    fn from(value: OrderStatus) -> Self {
        value.as_str()
    }
}

/// Bare order row.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Order {
    pub id: i32,
    pub user_id: i32,
    pub status: OrderStatus,
    pub contact_id: Option<i32>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// One priced line of an order, denormalised for display.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct OrderLine {
    /// Identifier of the order item row.
    pub id: i32,
    /// `None` once a catalog import has removed the listing.
    pub product_info_id: Option<i32>,
    pub product_name: String,
    pub shop_id: i32,
    pub shop_name: String,
    /// Unit price copied from the listing when the line was added.
    pub price: i32,
    pub quantity: i32,
}

impl OrderLine {
    pub fn total_price(&self) -> i64 {
        i64::from(self.price) * i64::from(self.quantity)
    }
}

/// An order with its lines and delivery contact.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct OrderDetails {
    pub order: Order,
    pub items: Vec<OrderLine>,
    pub contact: Option<Contact>,
}

impl OrderDetails {
    /// Sum of quantity × unit price over every line.
    pub fn total(&self) -> i64 {
        self.items.iter().map(OrderLine::total_price).sum()
    }

    /// Keep only the lines fulfilled by `shop_id`.
    pub fn restricted_to_shop(mut self, shop_id: i32) -> Self {
        self.items.retain(|line| line.shop_id == shop_id);
        self
    }
}

/// Requested cart line: a listing and the quantity to hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartItemInput {
    pub product_info_id: i32,
    pub quantity: i32,
}

/// Quantity change for an existing cart line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartItemUpdate {
    pub order_item_id: i32,
    pub quantity: i32,
}

/// Which orders a status transition may touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderScope {
    /// Orders placed by this user.
    Customer(i32),
    /// Orders that contain at least one line from this shop.
    Shop(i32),
    /// Any order.
    Staff,
}

/// Query definition used to list placed orders.
#[derive(Debug, Clone)]
pub struct OrderListQuery {
    pub user_id: Option<i32>,
    pub shop_id: Option<i32>,
    pub status: Option<OrderStatus>,
    pub pagination: Option<Pagination>,
}

impl OrderListQuery {
    /// Orders placed by `user_id`.
    pub fn for_user(user_id: i32) -> Self {
        Self {
            user_id: Some(user_id),
            shop_id: None,
            status: None,
            pagination: None,
        }
    }

    /// Orders containing items fulfilled by `shop_id`.
    pub fn for_shop(shop_id: i32) -> Self {
        Self {
            user_id: None,
            shop_id: Some(shop_id),
            status: None,
            pagination: None,
        }
    }

    pub fn status(mut self, status: OrderStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_path_advances_one_step_at_a_time() {
        assert!(OrderStatus::Cart.can_transition_to(OrderStatus::New));
        assert!(OrderStatus::New.can_transition_to(OrderStatus::Confirmed));
        assert!(OrderStatus::Confirmed.can_transition_to(OrderStatus::Assembled));
        assert!(OrderStatus::Assembled.can_transition_to(OrderStatus::Sent));
        assert!(OrderStatus::Sent.can_transition_to(OrderStatus::Delivered));

        assert!(!OrderStatus::Cart.can_transition_to(OrderStatus::Confirmed));
        assert!(!OrderStatus::Sent.can_transition_to(OrderStatus::New));
    }

    #[test]
    fn cancel_is_allowed_until_delivery() {
        for status in [
            OrderStatus::Cart,
            OrderStatus::New,
            OrderStatus::Confirmed,
            OrderStatus::Assembled,
            OrderStatus::Sent,
        ] {
            assert!(status.can_transition_to(OrderStatus::Canceled), "{status:?}");
        }

        assert!(!OrderStatus::Delivered.can_transition_to(OrderStatus::Canceled));
        assert!(!OrderStatus::Canceled.can_transition_to(OrderStatus::New));
    }

    #[test]
    fn parse_accepts_both_spellings_of_canceled() {
        assert_eq!(OrderStatus::parse(" Cancelled "), Some(OrderStatus::Canceled));
        assert_eq!(OrderStatus::parse("collected"), None);
        assert_eq!(OrderStatus::from("bogus"), OrderStatus::Cart);
    }

    #[test]
    fn details_total_sums_lines() {
        let line = |id, shop_id, price, quantity| OrderLine {
            id,
            product_info_id: Some(id),
            product_name: format!("Item {id}"),
            shop_id,
            shop_name: "Shop".to_string(),
            price,
            quantity,
        };
        let details = OrderDetails {
            order: Order {
                id: 1,
                user_id: 1,
                status: OrderStatus::New,
                contact_id: None,
                created_at: NaiveDateTime::default(),
                updated_at: NaiveDateTime::default(),
            },
            items: vec![line(1, 1, 500, 2), line(2, 2, 250, 4)],
            contact: None,
        };

        assert_eq!(details.total(), 2000);
        assert_eq!(details.restricted_to_shop(2).total(), 1000);
    }
}
