use serde::Deserialize;
use thiserror::Error;

use crate::domain::order::OrderStatus;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum OrderFormError {
    #[error("unknown order status `{0}`")]
    UnknownStatus(String),
    #[error("an order cannot be moved back to the cart")]
    CartStatus,
}

/// `POST /orders/` body: turn the cart `id` into an order.
#[derive(Debug, Deserialize)]
pub struct CheckoutForm {
    #[serde(deserialize_with = "crate::forms::int_or_string")]
    pub id: i32,
    /// Delivery contact; must belong to the caller.
    #[serde(default, deserialize_with = "crate::forms::opt_int_or_string")]
    pub contact: Option<i32>,
}

/// `POST /partner/orders/{id}/status/` body.
#[derive(Debug, Deserialize)]
pub struct OrderStatusForm {
    pub status: String,
}

impl OrderStatusForm {
    pub fn into_status(self) -> Result<OrderStatus, OrderFormError> {
        match OrderStatus::parse(&self.status) {
            Some(OrderStatus::Cart) => Err(OrderFormError::CartStatus),
            Some(status) => Ok(status),
            None => Err(OrderFormError::UnknownStatus(self.status)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checkout_accepts_string_ids() {
        let form: CheckoutForm =
            serde_json::from_str(r#"{"id": "12", "contact": 4}"#).unwrap();
        assert_eq!(form.id, 12);
        assert_eq!(form.contact, Some(4));

        let form: CheckoutForm = serde_json::from_str(r#"{"id": 12, "contact": ""}"#).unwrap();
        assert_eq!(form.contact, None);

        let form: CheckoutForm = serde_json::from_str(r#"{"id": 12}"#).unwrap();
        assert_eq!(form.contact, None);
    }

    #[test]
    fn status_form_parses_known_states() {
        let form = OrderStatusForm {
            status: "confirmed".to_string(),
        };
        assert_eq!(form.into_status(), Ok(OrderStatus::Confirmed));

        let form = OrderStatusForm {
            status: "cart".to_string(),
        };
        assert_eq!(form.into_status(), Err(OrderFormError::CartStatus));

        let form = OrderStatusForm {
            status: "lost".to_string(),
        };
        assert!(matches!(
            form.into_status(),
            Err(OrderFormError::UnknownStatus(_))
        ));
    }
}
