use std::path::Path;

use actix_multipart::form::MultipartForm;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, Responder, delete, get, post, put, web};
use serde::Deserialize;

use crate::config::ServerConfig;
use crate::domain::user::AuthenticatedUser;
use crate::forms::images::{UpdateImageForm, UploadImageForm};
use crate::forms::int_or_string;
use crate::repository::DieselRepository;
use crate::routes::{ok, service_error, success};
use crate::services::images;

#[derive(Debug, Deserialize)]
pub struct SetMainImageForm {
    #[serde(deserialize_with = "int_or_string")]
    pub image_id: i32,
}

#[get("/products/{product_id}/images/")]
pub async fn list_images(
    product_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match images::list_images(repo.get_ref(), product_id.into_inner()) {
        Ok(items) => ok(items),
        Err(err) => service_error(err, "list product images"),
    }
}

#[post("/products/{product_id}/images/")]
pub async fn upload_image(
    product_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
    MultipartForm(form): MultipartForm<UploadImageForm>,
) -> impl Responder {
    let media_root = Path::new(&server_config.media_root);
    match images::upload_image(repo.get_ref(), &user, media_root, product_id.into_inner(), form) {
        Ok(image) => success(StatusCode::CREATED, image),
        Err(err) => service_error(err, "upload product image"),
    }
}

#[get("/product-images/{image_id}/")]
pub async fn show_image(
    image_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match images::get_image(repo.get_ref(), image_id.into_inner()) {
        Ok(image) => ok(image),
        Err(err) => service_error(err, "load product image"),
    }
}

#[put("/product-images/{image_id}/")]
pub async fn update_image(
    image_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    form: web::Json<UpdateImageForm>,
) -> impl Responder {
    match images::update_image(repo.get_ref(), &user, image_id.into_inner(), form.into_inner()) {
        Ok(image) => ok(image),
        Err(err) => service_error(err, "update product image"),
    }
}

#[delete("/product-images/{image_id}/")]
pub async fn delete_image(
    image_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
) -> impl Responder {
    let media_root = Path::new(&server_config.media_root);
    match images::delete_image(repo.get_ref(), &user, media_root, image_id.into_inner()) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(err) => service_error(err, "delete product image"),
    }
}

#[post("/products/{product_id}/set-main-image/")]
pub async fn set_main_image(
    product_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    form: web::Json<SetMainImageForm>,
) -> impl Responder {
    match images::set_main_image(repo.get_ref(), &user, product_id.into_inner(), form.image_id) {
        Ok(image) => ok(image),
        Err(err) => service_error(err, "set main image"),
    }
}
