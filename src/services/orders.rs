use serde::{Deserialize, Serialize};

use crate::domain::contact::Contact;
use crate::domain::order::{
    Order, OrderDetails, OrderLine, OrderListQuery, OrderScope, OrderStatus,
};
use crate::domain::user::AuthenticatedUser;
use crate::forms::orders::CheckoutForm;
use crate::notifications::{Notification, NotificationDispatcher};
use crate::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use crate::repository::{OrderReader, OrderWriter};
use crate::services::{ServiceError, ServiceResult, total_pages};

/// Order line as returned to clients.
#[derive(Debug, Serialize)]
pub struct OrderLineView {
    #[serde(flatten)]
    pub line: OrderLine,
    pub total_price: i64,
}

/// Order with computed totals as returned to clients.
#[derive(Debug, Serialize)]
pub struct OrderView {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderLineView>,
    pub contact: Option<Contact>,
    pub total: i64,
}

impl From<OrderDetails> for OrderView {
    fn from(details: OrderDetails) -> Self {
        let total = details.total();
        Self {
            order: details.order,
            items: details
                .items
                .into_iter()
                .map(|line| OrderLineView {
                    total_price: line.total_price(),
                    line,
                })
                .collect(),
            contact: details.contact,
            total,
        }
    }
}

/// Query string of order list endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct OrdersQuery {
    pub page: Option<usize>,
    pub status: Option<String>,
}

impl OrdersQuery {
    pub(crate) fn apply(&self, mut query: OrderListQuery) -> (usize, OrderListQuery) {
        let page = self.page.unwrap_or(1).max(1);
        if let Some(status) = self.status.as_deref().and_then(OrderStatus::parse) {
            query = query.status(status);
        }
        (page, query.paginate(page, DEFAULT_ITEMS_PER_PAGE))
    }
}

/// Place the caller's cart and queue the confirmation and invoice emails.
///
/// Queueing failures are logged; the order is placed regardless.
pub fn checkout<R, D>(
    repo: &R,
    dispatcher: &D,
    user: &AuthenticatedUser,
    form: CheckoutForm,
) -> ServiceResult<Order>
where
    R: OrderWriter + ?Sized,
    D: NotificationDispatcher + ?Sized,
{
    let order = repo.checkout(user.id, form.id, form.contact)?;

    for job in [
        Notification::OrderConfirmation { order_id: order.id },
        Notification::AdminInvoice { order_id: order.id },
    ] {
        if let Err(err) = dispatcher.dispatch(job) {
            log::error!("Failed to queue {job:?}: {err}");
        }
    }

    Ok(order)
}

/// Placed orders of the caller, newest first.
pub fn list_orders<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: OrdersQuery,
) -> ServiceResult<Paginated<OrderView>>
where
    R: OrderReader + ?Sized,
{
    let (page, list_query) = query.apply(OrderListQuery::for_user(user.id));
    let (total, orders) = repo.list_orders(list_query)?;

    Ok(Paginated::new(
        orders.into_iter().map(OrderView::from).collect(),
        page,
        total_pages(total, DEFAULT_ITEMS_PER_PAGE),
    ))
}

pub fn get_order<R>(repo: &R, user: &AuthenticatedUser, order_id: i32) -> ServiceResult<OrderView>
where
    R: OrderReader + ?Sized,
{
    repo.get_user_order(user.id, order_id)?
        .map(OrderView::from)
        .ok_or(ServiceError::NotFound)
}

/// Cancel one of the caller's orders that has not been delivered yet.
pub fn cancel_order<R>(repo: &R, user: &AuthenticatedUser, order_id: i32) -> ServiceResult<Order>
where
    R: OrderWriter + ?Sized,
{
    Ok(repo.transition_order(order_id, OrderScope::Customer(user.id), OrderStatus::Canceled)?)
}
