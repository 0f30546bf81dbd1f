use serde::Serialize;

use crate::domain::contact::Contact;
use crate::domain::user::AuthenticatedUser;
use crate::forms::contacts::{CreateContactForm, DeleteContactsForm, UpdateContactForm};
use crate::repository::{ContactReader, ContactWriter};
use crate::services::ServiceResult;

/// Contact as returned to clients, with the formatted address.
#[derive(Debug, Serialize)]
pub struct ContactView {
    #[serde(flatten)]
    pub contact: Contact,
    pub full_address: String,
}

impl From<Contact> for ContactView {
    fn from(contact: Contact) -> Self {
        Self {
            full_address: contact.full_address(),
            contact,
        }
    }
}

pub fn list_contacts<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<Vec<Contact>>
where
    R: ContactReader + ?Sized,
{
    Ok(repo.list_contacts(user.id)?)
}

pub fn create_contact<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: CreateContactForm,
) -> ServiceResult<Contact>
where
    R: ContactWriter + ?Sized,
{
    let new_contact = form.into_new_contact(user.id)?;

    Ok(repo.create_contact(&new_contact)?)
}

pub fn update_contact<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: UpdateContactForm,
) -> ServiceResult<Contact>
where
    R: ContactWriter + ?Sized,
{
    let (contact_id, update) = form.into_update()?;

    Ok(repo.update_contact(user.id, contact_id, &update)?)
}

/// Delete the listed contacts of the caller; returns how many were removed.
pub fn delete_contacts<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: DeleteContactsForm,
) -> ServiceResult<usize>
where
    R: ContactWriter + ?Sized,
{
    let ids = form.into_ids()?;

    Ok(repo.delete_contacts(user.id, &ids)?)
}

/// Make the contact the caller's main one of its type.
pub fn promote_contact<R>(
    repo: &R,
    user: &AuthenticatedUser,
    contact_id: i32,
) -> ServiceResult<Contact>
where
    R: ContactWriter + ?Sized,
{
    Ok(repo.promote_contact(user.id, contact_id)?)
}
