use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::contact::{ContactType, NewContact, UpdateContact};
use crate::forms::{ListFormError, id_list, non_empty, parse_truthy_value, sanitize_inline_text};

const FIELD_MAX_LEN: u64 = 256;

pub type ContactFormResult<T> = Result<T, ContactFormError>;

#[derive(Debug, Error)]
pub enum ContactFormError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    #[error(transparent)]
    List(#[from] ListFormError),
    #[error("unknown contact type `{0}`")]
    UnknownType(String),
    #[error("`{0}` is required")]
    Required(&'static str),
    #[error("`is_main` must be a boolean")]
    InvalidFlag,
    #[error("nothing to update")]
    NothingToUpdate,
}

/// `POST /contacts/` body.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct CreateContactForm {
    #[serde(default, rename = "type")]
    pub contact_type: Option<String>,
    #[validate(length(max = FIELD_MAX_LEN))]
    pub value: Option<String>,
    #[validate(length(max = FIELD_MAX_LEN))]
    pub country: Option<String>,
    #[validate(length(max = FIELD_MAX_LEN))]
    pub region: Option<String>,
    #[validate(length(max = FIELD_MAX_LEN))]
    pub city: Option<String>,
    #[validate(length(max = FIELD_MAX_LEN))]
    pub street: Option<String>,
    #[validate(length(max = 16))]
    pub house: Option<String>,
    #[validate(length(max = 16))]
    pub building: Option<String>,
    #[validate(length(max = 16))]
    pub structure: Option<String>,
    #[validate(length(max = 16))]
    pub apartment: Option<String>,
    #[validate(length(max = 32))]
    pub phone: Option<String>,
    #[serde(default)]
    pub is_main: Option<Value>,
}

impl CreateContactForm {
    pub fn into_new_contact(self, user_id: i32) -> ContactFormResult<NewContact> {
        self.validate()?;

        let contact_type = match non_empty(self.contact_type) {
            None => ContactType::Address,
            Some(kind) => ContactType::parse(&kind).ok_or(ContactFormError::UnknownType(kind))?,
        };
        let is_main = match self.is_main {
            None | Some(Value::Null) => false,
            Some(value) => parse_truthy_value(&value).ok_or(ContactFormError::InvalidFlag)?,
        };

        let mut contact = match contact_type {
            ContactType::Address => {
                let city = non_empty(self.city).ok_or(ContactFormError::Required("city"))?;
                let street = non_empty(self.street).ok_or(ContactFormError::Required("street"))?;
                let phone = non_empty(self.phone).ok_or(ContactFormError::Required("phone"))?;
                let mut contact = NewContact::address(user_id, city, street, phone);
                contact.country = non_empty(self.country).unwrap_or_default();
                contact.region = non_empty(self.region).unwrap_or_default();
                contact.house = non_empty(self.house).unwrap_or_default();
                contact.building = non_empty(self.building).unwrap_or_default();
                contact.structure = non_empty(self.structure).unwrap_or_default();
                contact.apartment = non_empty(self.apartment).unwrap_or_default();
                contact
            }
            ContactType::Phone | ContactType::Email => {
                let value = non_empty(self.value).ok_or(ContactFormError::Required("value"))?;
                let mut contact = NewContact::address(user_id, "", "", "");
                contact.contact_type = contact_type;
                contact.value = value;
                contact
            }
        };
        contact.is_main = is_main;

        Ok(contact)
    }
}

/// `PUT /contacts/` body.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateContactForm {
    #[serde(deserialize_with = "crate::forms::int_or_string")]
    pub id: i32,
    #[validate(length(max = FIELD_MAX_LEN))]
    pub value: Option<String>,
    #[validate(length(max = FIELD_MAX_LEN))]
    pub country: Option<String>,
    #[validate(length(max = FIELD_MAX_LEN))]
    pub region: Option<String>,
    #[validate(length(max = FIELD_MAX_LEN))]
    pub city: Option<String>,
    #[validate(length(max = FIELD_MAX_LEN))]
    pub street: Option<String>,
    #[validate(length(max = 16))]
    pub house: Option<String>,
    #[validate(length(max = 16))]
    pub building: Option<String>,
    #[validate(length(max = 16))]
    pub structure: Option<String>,
    #[validate(length(max = 16))]
    pub apartment: Option<String>,
    #[validate(length(max = 32))]
    pub phone: Option<String>,
}

impl UpdateContactForm {
    /// Identifier and patch; absent fields stay untouched, blank ones clear the column.
    pub fn into_update(self) -> ContactFormResult<(i32, UpdateContact)> {
        self.validate()?;

        let clean = |value: Option<String>| value.map(|value| sanitize_inline_text(&value));
        let update = UpdateContact {
            value: clean(self.value),
            country: clean(self.country),
            region: clean(self.region),
            city: clean(self.city),
            street: clean(self.street),
            house: clean(self.house),
            building: clean(self.building),
            structure: clean(self.structure),
            apartment: clean(self.apartment),
            phone: clean(self.phone),
        };
        if update.is_empty() {
            return Err(ContactFormError::NothingToUpdate);
        }

        Ok((self.id, update))
    }
}

/// `DELETE /contacts/` body.
#[derive(Debug, Default, Deserialize)]
pub struct DeleteContactsForm {
    #[serde(default)]
    pub items: Option<Value>,
}

impl DeleteContactsForm {
    pub fn into_ids(self) -> ContactFormResult<Vec<i32>> {
        Ok(id_list(self.items)?)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn address_requires_city_street_and_phone() {
        let form = CreateContactForm {
            city: Some("Москва".to_string()),
            street: Some("  ".to_string()),
            phone: Some("+79000000000".to_string()),
            ..CreateContactForm::default()
        };
        assert!(matches!(
            form.into_new_contact(1),
            Err(ContactFormError::Required("street"))
        ));
    }

    #[test]
    fn address_contact_is_built() {
        let form = CreateContactForm {
            city: Some("Москва".to_string()),
            street: Some("Тверская".to_string()),
            house: Some("1".to_string()),
            phone: Some("+79000000000".to_string()),
            is_main: Some(json!("yes")),
            ..CreateContactForm::default()
        };
        let contact = form.into_new_contact(5).unwrap();
        assert_eq!(contact.user_id, 5);
        assert_eq!(contact.contact_type, ContactType::Address);
        assert_eq!(contact.house, "1");
        assert!(contact.is_main);
    }

    #[test]
    fn phone_contact_needs_a_value() {
        let form = CreateContactForm {
            contact_type: Some("phone".to_string()),
            ..CreateContactForm::default()
        };
        assert!(matches!(
            form.into_new_contact(1),
            Err(ContactFormError::Required("value"))
        ));

        let form = CreateContactForm {
            contact_type: Some("fax".to_string()),
            ..CreateContactForm::default()
        };
        assert!(matches!(
            form.into_new_contact(1),
            Err(ContactFormError::UnknownType(_))
        ));
    }

    #[test]
    fn bad_main_flag_is_rejected() {
        let form = CreateContactForm {
            contact_type: Some("email".to_string()),
            value: Some("a@b.c".to_string()),
            is_main: Some(json!("sometimes")),
            ..CreateContactForm::default()
        };
        assert!(matches!(
            form.into_new_contact(1),
            Err(ContactFormError::InvalidFlag)
        ));
    }

    #[test]
    fn empty_update_is_rejected() {
        let form = UpdateContactForm {
            id: 3,
            ..UpdateContactForm::default()
        };
        assert!(matches!(
            form.into_update(),
            Err(ContactFormError::NothingToUpdate)
        ));

        let form = UpdateContactForm {
            id: 3,
            city: Some(" Тула ".to_string()),
            ..UpdateContactForm::default()
        };
        let (id, update) = form.into_update().unwrap();
        assert_eq!(id, 3);
        assert_eq!(update.city.as_deref(), Some("Тула"));
    }
}
