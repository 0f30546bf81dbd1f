use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Account kinds recognised by the marketplace.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Admin,
    /// Vendor operating a shop.
    Shop,
    Employee,
    #[default]
    Buyer,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Shop => "shop",
            UserRole::Employee => "employee",
            UserRole::Buyer => "buyer",
        }
    }
}

impl From<&str> for UserRole {
    fn from(value: &str) -> Self {
        match value {
            "admin" => UserRole::Admin,
            "shop" => UserRole::Shop,
            "employee" => UserRole::Employee,
            _ => UserRole::Buyer,
        }
    }
}

impl From<UserRole> for &'static str {
    fn from(value: UserRole) -> Self {
        value.as_str()
    }
}

/// Domain representation of a marketplace account (without credentials).
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct User {
    pub id: i32,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub company: String,
    pub position: String,
    pub role: UserRole,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
}

impl User {
    /// Name shown in emails and invoices.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// A user together with the stored password hash, used only for login.
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user: User,
    pub password_hash: String,
}

/// Payload required to insert a new user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub company: String,
    pub position: String,
    pub role: UserRole,
    pub is_active: bool,
    pub updated_at: NaiveDateTime,
}

impl NewUser {
    /// Build an inactive buyer account; the email is normalised to lowercase.
    #[must_use]
    pub fn new(email: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            email: email.into().trim().to_lowercase(),
            password_hash: password_hash.into(),
            first_name: String::new(),
            last_name: String::new(),
            company: String::new(),
            position: String::new(),
            role: UserRole::Buyer,
            is_active: false,
            updated_at: Local::now().naive_utc(),
        }
    }

    #[must_use]
    pub fn with_name(mut self, first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        self.first_name = first_name.into();
        self.last_name = last_name.into();
        self
    }

    #[must_use]
    pub fn with_company(mut self, company: impl Into<String>, position: impl Into<String>) -> Self {
        self.company = company.into();
        self.position = position.into();
        self
    }

    #[must_use]
    pub fn with_role(mut self, role: UserRole) -> Self {
        self.role = role;
        self
    }

    #[must_use]
    pub fn active(mut self) -> Self {
        self.is_active = true;
        self
    }
}

/// Single-use key mailed to a new user to confirm the address.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ConfirmEmailToken {
    pub id: i32,
    pub user_id: i32,
    pub key: String,
    pub created_at: NaiveDateTime,
}

/// Identity resolved from the `Authorization` header of a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub id: i32,
    pub email: String,
    pub role: UserRole,
}

impl AuthenticatedUser {
    pub fn has_role(&self, role: UserRole) -> bool {
        self.role == role
    }
}

impl From<&User> for AuthenticatedUser {
    fn from(value: &User) -> Self {
        Self {
            id: value.id,
            email: value.email.clone(),
            role: value.role,
        }
    }
}
