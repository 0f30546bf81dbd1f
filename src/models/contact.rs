use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::contact::{
    Contact as DomainContact, NewContact as DomainNewContact, UpdateContact as DomainUpdateContact,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::contacts)]
pub struct Contact {
    pub id: i32,
    pub user_id: i32,
    pub contact_type: String,
    pub value: String,
    pub country: String,
    pub region: String,
    pub city: String,
    pub street: String,
    pub house: String,
    pub building: String,
    pub structure: String,
    pub apartment: String,
    pub phone: String,
    pub is_main: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Inserted with `is_main = false`; promotion is a separate step.
#[derive(Insertable)]
#[diesel(table_name = crate::schema::contacts)]
pub struct NewContact<'a> {
    pub user_id: i32,
    pub contact_type: &'a str,
    pub value: &'a str,
    pub country: &'a str,
    pub region: &'a str,
    pub city: &'a str,
    pub street: &'a str,
    pub house: &'a str,
    pub building: &'a str,
    pub structure: &'a str,
    pub apartment: &'a str,
    pub phone: &'a str,
    pub updated_at: NaiveDateTime,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::contacts)]
pub struct UpdateContact<'a> {
    pub value: Option<&'a str>,
    pub country: Option<&'a str>,
    pub region: Option<&'a str>,
    pub city: Option<&'a str>,
    pub street: Option<&'a str>,
    pub house: Option<&'a str>,
    pub building: Option<&'a str>,
    pub structure: Option<&'a str>,
    pub apartment: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub updated_at: NaiveDateTime,
}

impl From<Contact> for DomainContact {
    fn from(value: Contact) -> Self {
        Self {
            id: value.id,
            user_id: value.user_id,
            contact_type: value.contact_type.as_str().into(),
            value: value.value,
            country: value.country,
            region: value.region,
            city: value.city,
            street: value.street,
            house: value.house,
            building: value.building,
            structure: value.structure,
            apartment: value.apartment,
            phone: value.phone,
            is_main: value.is_main,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl<'a> From<&'a DomainNewContact> for NewContact<'a> {
    fn from(value: &'a DomainNewContact) -> Self {
        Self {
            user_id: value.user_id,
            contact_type: value.contact_type.as_str(),
            value: value.value.as_str(),
            country: value.country.as_str(),
            region: value.region.as_str(),
            city: value.city.as_str(),
            street: value.street.as_str(),
            house: value.house.as_str(),
            building: value.building.as_str(),
            structure: value.structure.as_str(),
            apartment: value.apartment.as_str(),
            phone: value.phone.as_str(),
            updated_at: value.updated_at,
        }
    }
}

impl<'a> UpdateContact<'a> {
    pub fn new(value: &'a DomainUpdateContact, updated_at: NaiveDateTime) -> Self {
        Self {
            value: value.value.as_deref(),
            country: value.country.as_deref(),
            region: value.region.as_deref(),
            city: value.city.as_deref(),
            street: value.street.as_deref(),
            house: value.house.as_deref(),
            building: value.building.as_deref(),
            structure: value.structure.as_deref(),
            apartment: value.apartment.as_deref(),
            phone: value.phone.as_deref(),
            updated_at,
        }
    }
}
