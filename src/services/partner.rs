//! Vendor operations: shop state, catalog import and incoming orders.

use crate::domain::catalog::ImportSummary;
use crate::domain::order::{Order, OrderListQuery, OrderScope};
use crate::domain::shop::Shop;
use crate::domain::user::{AuthenticatedUser, UserRole};
use crate::feed::CatalogFetcher;
use crate::forms::orders::OrderStatusForm;
use crate::forms::partner::{CatalogFeed, FeedError, PartnerStateForm, PartnerUpdateForm};
use crate::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use crate::repository::{CatalogWriter, OrderReader, OrderWriter, ShopReader, ShopWriter};
use crate::services::orders::{OrderView, OrdersQuery};
use crate::services::{ServiceError, ServiceResult, check_role, total_pages};

const PARTNER_ROLES: &[UserRole] = &[UserRole::Shop];

fn owned_shop<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<Shop>
where
    R: ShopReader + ?Sized,
{
    repo.get_shop_by_owner(user.id)?
        .ok_or(ServiceError::NotFound)
}

/// The caller's shop with its accepting-orders flag.
pub fn get_state<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<Shop>
where
    R: ShopReader + ?Sized,
{
    check_role(user, PARTNER_ROLES)?;
    owned_shop(repo, user)
}

pub fn set_state<R>(repo: &R, user: &AuthenticatedUser, form: PartnerStateForm) -> ServiceResult<Shop>
where
    R: ShopWriter + ?Sized,
{
    check_role(user, PARTNER_ROLES)?;

    let state = form.into_state()?;

    Ok(repo.set_shop_state(user.id, state)?)
}

/// Download the supplier feed at `url` and replace the caller's catalog with it.
///
/// The import runs in a single transaction: a failure leaves the previous
/// catalog untouched.
pub async fn update_catalog<R, F>(
    repo: &R,
    fetcher: &F,
    user: &AuthenticatedUser,
    form: PartnerUpdateForm,
) -> ServiceResult<ImportSummary>
where
    R: CatalogWriter + ?Sized,
    F: CatalogFetcher,
{
    check_role(user, PARTNER_ROLES)?;

    let url = form.into_url()?;

    let body = fetcher.fetch(&url).await.map_err(|err| {
        log::warn!("Failed to download feed {url}: {err}");
        ServiceError::Upstream(format!("Не удалось загрузить прайс-лист: {err}"))
    })?;

    let import = CatalogFeed::parse(&body)
        .and_then(|feed| feed.into_import(&url))
        .map_err(|err| match err {
            FeedError::Malformed(err) => {
                ServiceError::Upstream(format!("Некорректный формат прайс-листа: {err}"))
            }
            FeedError::Invalid(message) => ServiceError::Form(message),
        })?;

    let summary = repo.import_catalog(user.id, &import)?;
    log::info!(
        "Imported {} listings into shop {} from {url}",
        summary.listings,
        summary.shop_id
    );

    Ok(summary)
}

/// Placed orders containing the caller's goods; other shops' lines are hidden.
pub fn list_orders<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: OrdersQuery,
) -> ServiceResult<Paginated<OrderView>>
where
    R: ShopReader + OrderReader + ?Sized,
{
    check_role(user, PARTNER_ROLES)?;
    let shop = owned_shop(repo, user)?;

    let (page, list_query) = query.apply(OrderListQuery::for_shop(shop.id));
    let (total, orders) = repo.list_orders(list_query)?;

    Ok(Paginated::new(
        orders
            .into_iter()
            .map(|details| OrderView::from(details.restricted_to_shop(shop.id)))
            .collect(),
        page,
        total_pages(total, DEFAULT_ITEMS_PER_PAGE),
    ))
}

/// Move an order containing the caller's goods to its next state.
pub fn advance_order<R>(
    repo: &R,
    user: &AuthenticatedUser,
    order_id: i32,
    form: OrderStatusForm,
) -> ServiceResult<Order>
where
    R: ShopReader + OrderWriter + ?Sized,
{
    check_role(user, PARTNER_ROLES)?;
    let shop = owned_shop(repo, user)?;

    let next = form
        .into_status()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    Ok(repo.transition_order(order_id, OrderScope::Shop(shop.id), next)?)
}

#[cfg(test)]
mod tests {
    use std::future::Future;
    use std::pin::pin;
    use std::task::{Context, Poll, Waker};

    use chrono::NaiveDateTime;
    use serde_json::json;

    use super::*;
    use crate::domain::order::{OrderDetails, OrderLine, OrderStatus};
    use crate::feed::FetchError;
    use crate::repository::errors::RepositoryError;
    use crate::repository::mock::MockRepository;

    struct StaticFetcher(Result<&'static str, u16>);

    impl CatalogFetcher for StaticFetcher {
        async fn fetch(&self, _url: &str) -> Result<String, FetchError> {
            match self.0 {
                Ok(body) => Ok(body.to_string()),
                Err(status) => Err(FetchError::Status(status)),
            }
        }
    }

    /// Drive a future that never actually waits.
    fn block_on<F: Future>(future: F) -> F::Output {
        let mut future = pin!(future);
        let mut cx = Context::from_waker(Waker::noop());
        loop {
            if let Poll::Ready(output) = future.as_mut().poll(&mut cx) {
                return output;
            }
        }
    }

    fn vendor() -> AuthenticatedUser {
        AuthenticatedUser {
            id: 3,
            email: "vendor@example.com".to_string(),
            role: UserRole::Shop,
        }
    }

    fn buyer() -> AuthenticatedUser {
        AuthenticatedUser {
            id: 4,
            email: "buyer@example.com".to_string(),
            role: UserRole::Buyer,
        }
    }

    fn shop() -> Shop {
        Shop {
            id: 9,
            name: "Acme".to_string(),
            url: None,
            user_id: Some(3),
            state: true,
            created_at: NaiveDateTime::default(),
            updated_at: NaiveDateTime::default(),
        }
    }

    fn update_form() -> PartnerUpdateForm {
        PartnerUpdateForm {
            url: Some("https://example.com/acme.yaml".to_string()),
        }
    }

    const FEED: &str = "shop: Acme\ncategories:\n  - {id: 1, name: Tools}\ngoods:\n  - {category: 1, name: Hammer, price: 500, price_rrc: 600, quantity: 3}\n";

    #[test]
    fn buyers_cannot_import() {
        let mut repo = MockRepository::new();
        repo.expect_import_catalog().never();
        let fetcher = StaticFetcher(Ok(FEED));

        let result = block_on(update_catalog(&repo, &fetcher, &buyer(), update_form()));
        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }

    #[test]
    fn feed_is_imported_for_the_vendor() {
        let mut repo = MockRepository::new();
        repo.expect_import_catalog()
            .withf(|owner_id, import| {
                *owner_id == 3 && import.shop_name == "Acme" && import.goods.len() == 1
            })
            .returning(|_, import| {
                Ok(ImportSummary {
                    shop_id: 9,
                    categories: import.categories.len(),
                    products: 1,
                    listings: import.goods.len(),
                    parameters: 0,
                })
            });
        let fetcher = StaticFetcher(Ok(FEED));

        let summary = block_on(update_catalog(&repo, &fetcher, &vendor(), update_form())).unwrap();
        assert_eq!(summary.listings, 1);
    }

    #[test]
    fn download_failure_is_an_upstream_error() {
        let mut repo = MockRepository::new();
        repo.expect_import_catalog().never();
        let fetcher = StaticFetcher(Err(503));

        let result = block_on(update_catalog(&repo, &fetcher, &vendor(), update_form()));
        assert!(matches!(result, Err(ServiceError::Upstream(_))));
    }

    #[test]
    fn unparsable_feed_is_an_upstream_error() {
        let mut repo = MockRepository::new();
        repo.expect_import_catalog().never();
        let fetcher = StaticFetcher(Ok("goods: {"));

        let result = block_on(update_catalog(&repo, &fetcher, &vendor(), update_form()));
        assert!(matches!(result, Err(ServiceError::Upstream(_))));
    }

    #[test]
    fn rejected_import_is_a_form_error() {
        let mut repo = MockRepository::new();
        repo.expect_import_catalog().returning(|_, _| {
            Err(RepositoryError::Rejected(
                "goods[0]: unknown category 1".to_string(),
            ))
        });
        let fetcher = StaticFetcher(Ok(FEED));

        let result = block_on(update_catalog(&repo, &fetcher, &vendor(), update_form()));
        assert!(matches!(result, Err(ServiceError::Form(message)) if message.contains("goods[0]")));
    }

    #[test]
    fn missing_url_is_rejected_before_fetching() {
        let repo = MockRepository::new();
        let fetcher = StaticFetcher(Err(500));

        let result = block_on(update_catalog(
            &repo,
            &fetcher,
            &vendor(),
            PartnerUpdateForm::default(),
        ));
        assert!(matches!(result, Err(ServiceError::Form(_))));
    }

    #[test]
    fn state_toggle_parses_truthy_values() {
        let mut repo = MockRepository::new();
        repo.expect_set_shop_state()
            .withf(|user_id, state| *user_id == 3 && !*state)
            .returning(|_, state| {
                Ok(Shop {
                    state,
                    ..shop()
                })
            });

        let form = PartnerStateForm {
            state: Some(json!("off")),
        };
        assert!(!set_state(&repo, &vendor(), form).unwrap().state);

        let form = PartnerStateForm {
            state: Some(json!("perhaps")),
        };
        assert!(matches!(
            set_state(&repo, &vendor(), form),
            Err(ServiceError::Form(_))
        ));
    }

    #[test]
    fn vendor_sees_only_its_own_lines() {
        let mut repo = MockRepository::new();
        repo.expect_get_shop_by_owner()
            .returning(|_| Ok(Some(shop())));
        repo.expect_list_orders()
            .withf(|query| query.shop_id == Some(9))
            .returning(|_| {
                let line = |id: i32, shop_id: i32| OrderLine {
                    id,
                    product_info_id: Some(id),
                    product_name: format!("Item {id}"),
                    shop_id,
                    shop_name: String::new(),
                    price: 100,
                    quantity: 1,
                };
                Ok((
                    1,
                    vec![OrderDetails {
                        order: Order {
                            id: 5,
                            user_id: 4,
                            status: OrderStatus::New,
                            contact_id: None,
                            created_at: NaiveDateTime::default(),
                            updated_at: NaiveDateTime::default(),
                        },
                        items: vec![line(1, 9), line(2, 10)],
                        contact: None,
                    }],
                ))
            });

        let page = list_orders(&repo, &vendor(), OrdersQuery::default()).unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].items.len(), 1);
        assert_eq!(page.items[0].total, 100);
    }

    #[test]
    fn vendor_advances_orders_within_its_scope() {
        let mut repo = MockRepository::new();
        repo.expect_get_shop_by_owner()
            .returning(|_| Ok(Some(shop())));
        repo.expect_transition_order()
            .withf(|id, scope, next| {
                *id == 5 && *scope == OrderScope::Shop(9) && *next == OrderStatus::Confirmed
            })
            .returning(|id, _, next| {
                Ok(Order {
                    id,
                    user_id: 4,
                    status: next,
                    contact_id: None,
                    created_at: NaiveDateTime::default(),
                    updated_at: NaiveDateTime::default(),
                })
            });

        let form = OrderStatusForm {
            status: "confirmed".to_string(),
        };
        let order = advance_order(&repo, &vendor(), 5, form).unwrap();
        assert_eq!(order.status, OrderStatus::Confirmed);
    }
}
