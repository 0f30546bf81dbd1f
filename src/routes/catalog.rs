use actix_web::{Responder, get, web};

use crate::repository::DieselRepository;
use crate::routes::{ok, service_error};
use crate::services::catalog::{self, ProductsQuery};

#[get("/products/")]
pub async fn list_products(
    params: web::Query<ProductsQuery>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match catalog::list_products(repo.get_ref(), params.into_inner()) {
        Ok(page) => ok(page),
        Err(err) => service_error(err, "list products"),
    }
}

#[get("/categories/")]
pub async fn list_categories(repo: web::Data<DieselRepository>) -> impl Responder {
    match catalog::list_categories(repo.get_ref()) {
        Ok(categories) => ok(categories),
        Err(err) => service_error(err, "list categories"),
    }
}

#[get("/shops/")]
pub async fn list_shops(repo: web::Data<DieselRepository>) -> impl Responder {
    match catalog::list_shops(repo.get_ref()) {
        Ok(shops) => ok(shops),
        Err(err) => service_error(err, "list shops"),
    }
}
