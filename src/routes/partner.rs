use actix_web::{HttpResponse, Responder, get, post, web};

use crate::domain::user::AuthenticatedUser;
use crate::feed::HttpCatalogFetcher;
use crate::forms::orders::OrderStatusForm;
use crate::forms::partner::{PartnerStateForm, PartnerUpdateForm};
use crate::repository::DieselRepository;
use crate::routes::{ok, service_error};
use crate::services::orders::OrdersQuery;
use crate::services::partner;
use crate::throttle::{ThrottleScope, Throttles};

fn throttle(throttles: &Throttles, user: &AuthenticatedUser, action: &str) -> Option<HttpResponse> {
    throttles
        .check(ThrottleScope::Partner, &format!("user:{}", user.id))
        .err()
        .map(|err| service_error(err, action))
}

#[get("/partner/state/")]
pub async fn show_state(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    throttles: web::Data<Throttles>,
) -> impl Responder {
    if let Some(response) = throttle(&throttles, &user, "load partner state") {
        return response;
    }

    match partner::get_state(repo.get_ref(), &user) {
        Ok(shop) => ok(shop),
        Err(err) => service_error(err, "load partner state"),
    }
}

#[post("/partner/state/")]
pub async fn update_state(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    throttles: web::Data<Throttles>,
    form: web::Json<PartnerStateForm>,
) -> impl Responder {
    if let Some(response) = throttle(&throttles, &user, "update partner state") {
        return response;
    }

    match partner::set_state(repo.get_ref(), &user, form.into_inner()) {
        Ok(shop) => {
            log::info!("Shop {} state set to {}", shop.id, shop.state);
            ok(shop)
        }
        Err(err) => service_error(err, "update partner state"),
    }
}

#[post("/partner/update/")]
pub async fn update_catalog(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    fetcher: web::Data<HttpCatalogFetcher>,
    throttles: web::Data<Throttles>,
    form: web::Json<PartnerUpdateForm>,
) -> impl Responder {
    if let Some(response) = throttle(&throttles, &user, "import catalog") {
        return response;
    }

    match partner::update_catalog(repo.get_ref(), fetcher.get_ref(), &user, form.into_inner()).await
    {
        Ok(summary) => ok(summary),
        Err(err) => service_error(err, "import catalog"),
    }
}

#[get("/partner/orders/")]
pub async fn list_orders(
    params: web::Query<OrdersQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    throttles: web::Data<Throttles>,
) -> impl Responder {
    if let Some(response) = throttle(&throttles, &user, "list partner orders") {
        return response;
    }

    match partner::list_orders(repo.get_ref(), &user, params.into_inner()) {
        Ok(page) => ok(page),
        Err(err) => service_error(err, "list partner orders"),
    }
}

#[post("/partner/orders/{order_id}/status/")]
pub async fn advance_order(
    order_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    throttles: web::Data<Throttles>,
    form: web::Json<OrderStatusForm>,
) -> impl Responder {
    if let Some(response) = throttle(&throttles, &user, "advance order") {
        return response;
    }

    match partner::advance_order(repo.get_ref(), &user, order_id.into_inner(), form.into_inner()) {
        Ok(order) => ok(order),
        Err(err) => service_error(err, "advance order"),
    }
}
