use crate::domain::user::AuthenticatedUser;
use crate::forms::cart::{AddCartItemsForm, DeleteCartItemsForm, UpdateCartItemsForm};
use crate::repository::{CartWriter, OrderReader};
use crate::services::orders::OrderView;
use crate::services::{ServiceError, ServiceResult};

/// The caller's cart, or `None` before the first item is added.
pub fn get_cart<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<Option<OrderView>>
where
    R: OrderReader + ?Sized,
{
    Ok(repo.get_cart(user.id)?.map(OrderView::from))
}

/// Put listings into the cart, overwriting quantities of lines already there.
pub fn add_items<R>(repo: &R, user: &AuthenticatedUser, form: AddCartItemsForm) -> ServiceResult<usize>
where
    R: CartWriter + ?Sized,
{
    let items = form
        .into_items()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    Ok(repo.add_cart_items(user.id, &items)?)
}

pub fn update_items<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: UpdateCartItemsForm,
) -> ServiceResult<usize>
where
    R: CartWriter + ?Sized,
{
    let updates = form
        .into_updates()
        .map_err(|err| ServiceError::Form(err.to_string()))?;
    if updates.is_empty() {
        return Ok(0);
    }

    Ok(repo.update_cart_items(user.id, &updates)?)
}

pub fn delete_items<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: DeleteCartItemsForm,
) -> ServiceResult<usize>
where
    R: CartWriter + ?Sized,
{
    let ids = form
        .into_ids()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    Ok(repo.delete_cart_items(user.id, &ids)?)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::domain::order::CartItemInput;
    use crate::domain::user::UserRole;
    use crate::repository::errors::RepositoryError;
    use crate::repository::mock::MockRepository;

    fn buyer() -> AuthenticatedUser {
        AuthenticatedUser {
            id: 7,
            email: "buyer@example.com".to_string(),
            role: UserRole::Buyer,
        }
    }

    #[test]
    fn malformed_batch_never_reaches_the_repository() {
        let mut repo = MockRepository::new();
        repo.expect_add_cart_items().never();

        let form = AddCartItemsForm {
            items: Some(json!([{"product_id": 1, "quantity": 1}, {"product_id": "x"}])),
        };
        let result = add_items(&repo, &buyer(), form);
        assert!(matches!(result, Err(ServiceError::Form(message)) if message.contains("items[1]")));
    }

    #[test]
    fn items_are_added_to_the_callers_cart() {
        let mut repo = MockRepository::new();
        repo.expect_add_cart_items()
            .withf(|user_id, items| {
                *user_id == 7
                    && items
                        == [CartItemInput {
                            product_info_id: 5,
                            quantity: 2,
                        }]
            })
            .returning(|_, items| Ok(items.len()));

        let form = AddCartItemsForm {
            items: Some(json!([{"product_id": 5, "quantity": 2}])),
        };
        assert_eq!(add_items(&repo, &buyer(), form).unwrap(), 1);
    }

    #[test]
    fn unknown_product_is_a_form_error() {
        let mut repo = MockRepository::new();
        repo.expect_add_cart_items()
            .returning(|_, _| Err(RepositoryError::Rejected("Product 99 not found".to_string())));

        let form = AddCartItemsForm {
            items: Some(json!([{"product_id": 99, "quantity": 1}])),
        };
        assert!(matches!(
            add_items(&repo, &buyer(), form),
            Err(ServiceError::Form(_))
        ));
    }

    #[test]
    fn update_without_valid_pairs_is_a_no_op() {
        let mut repo = MockRepository::new();
        repo.expect_update_cart_items().never();

        let form = UpdateCartItemsForm {
            items: Some(json!([{"id": "x", "quantity": 1}])),
        };
        assert_eq!(update_items(&repo, &buyer(), form).unwrap(), 0);
    }

    #[test]
    fn delete_rejects_bad_ids_before_touching_storage() {
        let mut repo = MockRepository::new();
        repo.expect_delete_cart_items().never();

        let form = DeleteCartItemsForm {
            items: Some(json!("1,two")),
        };
        assert!(matches!(
            delete_items(&repo, &buyer(), form),
            Err(ServiceError::Form(_))
        ));
    }
}
