use actix_web::http::StatusCode;
use actix_web::{Responder, get, post, web};

use crate::domain::user::AuthenticatedUser;
use crate::forms::orders::CheckoutForm;
use crate::notifications::NotificationQueue;
use crate::repository::DieselRepository;
use crate::routes::{failure, ok, service_error};
use crate::services::ServiceError;
use crate::services::orders::{self, OrdersQuery};

#[get("/orders/")]
pub async fn list_orders(
    params: web::Query<OrdersQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match orders::list_orders(repo.get_ref(), &user, params.into_inner()) {
        Ok(page) => ok(page),
        Err(err) => service_error(err, "list orders"),
    }
}

#[get("/orders/{order_id}/")]
pub async fn show_order(
    order_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match orders::get_order(repo.get_ref(), &user, order_id.into_inner()) {
        Ok(order) => ok(order),
        Err(ServiceError::NotFound) => failure(StatusCode::NOT_FOUND, "Order not found"),
        Err(err) => service_error(err, "load order"),
    }
}

#[post("/orders/")]
pub async fn checkout(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    queue: web::Data<NotificationQueue>,
    form: web::Json<CheckoutForm>,
) -> impl Responder {
    match orders::checkout(repo.get_ref(), queue.get_ref(), &user, form.into_inner()) {
        Ok(order) => {
            log::info!("User {} placed order {}", user.id, order.id);
            ok(order)
        }
        Err(ServiceError::NotFound) => failure(StatusCode::NOT_FOUND, "Order not found"),
        Err(err) => service_error(err, "check out"),
    }
}

#[post("/orders/{order_id}/cancel/")]
pub async fn cancel_order(
    order_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match orders::cancel_order(repo.get_ref(), &user, order_id.into_inner()) {
        Ok(order) => ok(order),
        Err(ServiceError::NotFound) => failure(StatusCode::NOT_FOUND, "Order not found"),
        Err(err) => service_error(err, "cancel order"),
    }
}
