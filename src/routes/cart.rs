use actix_web::http::StatusCode;
use actix_web::{Responder, delete, get, post, put, web};
use serde_json::json;

use crate::domain::user::AuthenticatedUser;
use crate::forms::cart::{AddCartItemsForm, DeleteCartItemsForm, UpdateCartItemsForm};
use crate::repository::DieselRepository;
use crate::routes::{ok, service_error, success};
use crate::services::cart;

#[get("/cart/")]
pub async fn show_cart(user: AuthenticatedUser, repo: web::Data<DieselRepository>) -> impl Responder {
    match cart::get_cart(repo.get_ref(), &user) {
        Ok(view) => ok(view),
        Err(err) => service_error(err, "load cart"),
    }
}

#[post("/cart/")]
pub async fn add_items(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    form: web::Json<AddCartItemsForm>,
) -> impl Responder {
    match cart::add_items(repo.get_ref(), &user, form.into_inner()) {
        Ok(created) => success(StatusCode::CREATED, json!({"Objects_create": created})),
        Err(err) => service_error(err, "add cart items"),
    }
}

#[put("/cart/")]
pub async fn update_items(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    form: web::Json<UpdateCartItemsForm>,
) -> impl Responder {
    match cart::update_items(repo.get_ref(), &user, form.into_inner()) {
        Ok(updated) => ok(json!({"Objects_updated": updated})),
        Err(err) => service_error(err, "update cart items"),
    }
}

#[delete("/cart/")]
pub async fn delete_items(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    form: web::Json<DeleteCartItemsForm>,
) -> impl Responder {
    match cart::delete_items(repo.get_ref(), &user, form.into_inner()) {
        Ok(deleted) => ok(json!({"Objects_deleted": deleted})),
        Err(err) => service_error(err, "delete cart items"),
    }
}
