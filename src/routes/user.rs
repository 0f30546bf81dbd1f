use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, Responder, get, post, web};
use serde_json::json;

use crate::domain::user::AuthenticatedUser;
use crate::forms::auth::{ConfirmForm, LoginForm, RegisterForm};
use crate::notifications::NotificationQueue;
use crate::repository::DieselRepository;
use crate::routes::{ok, service_error, success};
use crate::services::auth;
use crate::throttle::{ThrottleScope, Throttles, client_key};

#[post("/user/register/")]
pub async fn register(
    req: HttpRequest,
    repo: web::Data<DieselRepository>,
    queue: web::Data<NotificationQueue>,
    throttles: web::Data<Throttles>,
    form: web::Json<RegisterForm>,
) -> impl Responder {
    if let Err(err) = throttles.check(ThrottleScope::Registration, &client_key(&req)) {
        return service_error(err, "register user");
    }

    match auth::register(repo.get_ref(), queue.get_ref(), form.into_inner()) {
        Ok(user) => {
            log::info!("Registered user {}", user.id);
            success(StatusCode::CREATED, json!({"Id": user.id}))
        }
        Err(err) => service_error(err, "register user"),
    }
}

#[post("/user/confirm/")]
pub async fn confirm(
    repo: web::Data<DieselRepository>,
    form: web::Json<ConfirmForm>,
) -> impl Responder {
    match auth::confirm_email(repo.get_ref(), form.into_inner()) {
        Ok(_) => ok(()),
        Err(err) => service_error(err, "confirm email"),
    }
}

#[post("/user/login/")]
pub async fn login(
    req: HttpRequest,
    repo: web::Data<DieselRepository>,
    throttles: web::Data<Throttles>,
    form: web::Json<LoginForm>,
) -> impl Responder {
    if let Err(err) = throttles.check(ThrottleScope::Login, &client_key(&req)) {
        return service_error(err, "log in");
    }

    match auth::login(repo.get_ref(), form.into_inner()) {
        Ok(data) => ok(json!({"Token": data.token, "User": data.user})),
        Err(err) => service_error(err, "log in"),
    }
}

#[get("/user/details/")]
pub async fn details(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> HttpResponse {
    match auth::user_details(repo.get_ref(), &user) {
        Ok(details) => ok(details),
        Err(err) => service_error(err, "load user details"),
    }
}
