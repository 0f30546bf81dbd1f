//! Cart payloads.
//!
//! Clients send `items` either as a JSON list or as a string holding one.

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::domain::order::{CartItemInput, CartItemUpdate};
use crate::forms::{ListFormError, id_list, json_list};

pub type CartFormResult<T> = Result<T, CartFormError>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartFormError {
    #[error(transparent)]
    List(#[from] ListFormError),
    #[error("items[{index}]: {reason}")]
    InvalidItem { index: usize, reason: String },
}

#[derive(Debug, Deserialize)]
struct AddItem {
    #[serde(deserialize_with = "crate::forms::int_or_string")]
    product_id: i32,
    #[serde(deserialize_with = "crate::forms::int_or_string")]
    quantity: i32,
}

/// Only JSON integers are accepted here; string-encoded pairs are skipped.
#[derive(Debug, Deserialize)]
struct UpdateItem {
    id: i32,
    quantity: i32,
}

/// `POST /cart/` body.
#[derive(Debug, Default, Deserialize)]
pub struct AddCartItemsForm {
    #[serde(default)]
    pub items: Option<Value>,
}

impl AddCartItemsForm {
    /// Decode every element; one bad element rejects the whole batch.
    pub fn into_items(self) -> CartFormResult<Vec<CartItemInput>> {
        let values = json_list(self.items)?;
        if values.is_empty() {
            return Err(ListFormError::Empty.into());
        }

        values
            .into_iter()
            .enumerate()
            .map(|(index, value)| {
                let item: AddItem =
                    serde_json::from_value(value).map_err(|err| CartFormError::InvalidItem {
                        index,
                        reason: err.to_string(),
                    })?;
                if item.quantity < 1 {
                    return Err(CartFormError::InvalidItem {
                        index,
                        reason: "quantity must be at least 1".to_string(),
                    });
                }
                Ok(CartItemInput {
                    product_info_id: item.product_id,
                    quantity: item.quantity,
                })
            })
            .collect()
    }
}

/// `PUT /cart/` body.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateCartItemsForm {
    #[serde(default)]
    pub items: Option<Value>,
}

impl UpdateCartItemsForm {
    /// Well-typed `{id, quantity}` pairs with a positive quantity; the rest is skipped.
    pub fn into_updates(self) -> CartFormResult<Vec<CartItemUpdate>> {
        let values = json_list(self.items)?;

        Ok(values
            .into_iter()
            .filter_map(|value| serde_json::from_value::<UpdateItem>(value).ok())
            .filter(|item| item.quantity >= 1)
            .map(|item| CartItemUpdate {
                order_item_id: item.id,
                quantity: item.quantity,
            })
            .collect())
    }
}

/// `DELETE /cart/` body.
#[derive(Debug, Default, Deserialize)]
pub struct DeleteCartItemsForm {
    #[serde(default)]
    pub items: Option<Value>,
}

impl DeleteCartItemsForm {
    pub fn into_ids(self) -> CartFormResult<Vec<i32>> {
        Ok(id_list(self.items)?)
    }
}
