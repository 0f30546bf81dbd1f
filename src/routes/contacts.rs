use actix_web::http::StatusCode;
use actix_web::{Responder, delete, get, post, put, web};
use serde_json::json;

use crate::domain::user::AuthenticatedUser;
use crate::forms::contacts::{CreateContactForm, DeleteContactsForm, UpdateContactForm};
use crate::repository::DieselRepository;
use crate::routes::{ok, service_error, success};
use crate::services::contacts::{self, ContactView};

#[get("/contacts/")]
pub async fn list_contacts(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match contacts::list_contacts(repo.get_ref(), &user) {
        Ok(items) => ok(items.into_iter().map(ContactView::from).collect::<Vec<_>>()),
        Err(err) => service_error(err, "list contacts"),
    }
}

#[post("/contacts/")]
pub async fn create_contact(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    form: web::Json<CreateContactForm>,
) -> impl Responder {
    match contacts::create_contact(repo.get_ref(), &user, form.into_inner()) {
        Ok(contact) => success(StatusCode::CREATED, ContactView::from(contact)),
        Err(err) => service_error(err, "create contact"),
    }
}

#[put("/contacts/")]
pub async fn update_contact(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    form: web::Json<UpdateContactForm>,
) -> impl Responder {
    match contacts::update_contact(repo.get_ref(), &user, form.into_inner()) {
        Ok(contact) => ok(ContactView::from(contact)),
        Err(err) => service_error(err, "update contact"),
    }
}

#[delete("/contacts/")]
pub async fn delete_contacts(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    form: web::Json<DeleteContactsForm>,
) -> impl Responder {
    match contacts::delete_contacts(repo.get_ref(), &user, form.into_inner()) {
        Ok(deleted) => ok(json!({"Objects_deleted": deleted})),
        Err(err) => service_error(err, "delete contacts"),
    }
}

#[post("/contacts/{contact_id}/main/")]
pub async fn promote_contact(
    contact_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match contacts::promote_contact(repo.get_ref(), &user, contact_id.into_inner()) {
        Ok(contact) => ok(ContactView::from(contact)),
        Err(err) => service_error(err, "promote contact"),
    }
}
