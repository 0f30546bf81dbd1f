use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Kind of contact record a user can store.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ContactType {
    Phone,
    Email,
    #[default]
    Address,
}

impl ContactType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContactType::Phone => "phone",
            ContactType::Email => "email",
            ContactType::Address => "address",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "phone" => Some(ContactType::Phone),
            "email" => Some(ContactType::Email),
            "address" => Some(ContactType::Address),
            _ => None,
        }
    }
}

impl From<&str> for ContactType {
    fn from(value: &str) -> Self {
        ContactType::parse(value).unwrap_or_default()
    }
}

/// Delivery address or other contact detail owned by a user.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Contact {
    pub id: i32,
    pub user_id: i32,
    pub contact_type: ContactType,
    /// Free-form value for phone and email contacts.
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
    /// Main contact of its type for the user; at most one per type.
    pub is_main: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Contact {
    /// Single-line postal address, skipping empty parts.
    pub fn full_address(&self) -> String {
        let labelled = [
            (self.country.as_str(), ""),
            (self.region.as_str(), ""),
            (self.city.as_str(), "г. "),
            (self.street.as_str(), "ул. "),
            (self.house.as_str(), "д. "),
            (self.building.as_str(), "корп. "),
            (self.structure.as_str(), "стр. "),
            (self.apartment.as_str(), "кв. "),
        ];

        labelled
            .iter()
            .filter(|(value, _)| !value.trim().is_empty())
            .map(|(value, prefix)| format!("{prefix}{}", value.trim()))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Payload required to insert a new contact.
#[derive(Debug, Clone, PartialEq)]
pub struct NewContact {
    pub user_id: i32,
    pub contact_type: ContactType,
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
    /// Promote the new contact to main on insert.
    pub is_main: bool,
    pub updated_at: NaiveDateTime,
}

impl NewContact {
    /// Address contact with the mandatory parts filled in.
    pub fn address(
        user_id: i32,
        city: impl Into<String>,
        street: impl Into<String>,
        phone: impl Into<String>,
    ) -> Self {
        Self {
            user_id,
            contact_type: ContactType::Address,
            value: String::new(),
            country: String::new(),
            region: String::new(),
            city: city.into(),
            street: street.into(),
            house: String::new(),
            building: String::new(),
            structure: String::new(),
            apartment: String::new(),
            phone: phone.into(),
            is_main: false,
            updated_at: Local::now().naive_utc(),
        }
    }
}

/// Partial update of a contact; `None` leaves the column untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateContact {
    pub value: Option<String>,
    pub country: Option<String>,
    pub region: Option<String>,
    pub city: Option<String>,
    pub street: Option<String>,
    pub house: Option<String>,
    pub building: Option<String>,
    pub structure: Option<String>,
    pub apartment: Option<String>,
    pub phone: Option<String>,
}

impl UpdateContact {
    pub fn is_empty(&self) -> bool {
        *self == UpdateContact::default()
    }
}
