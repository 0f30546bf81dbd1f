use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::user::{
    ConfirmEmailToken as DomainConfirmEmailToken, NewUser as DomainNewUser, User as DomainUser,
    UserCredentials,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::users)]
pub struct User {
    pub id: i32,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub company: String,
    pub position: String,
    pub role: String,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::users)]
pub struct NewUser<'a> {
    pub email: &'a str,
    pub password_hash: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub company: &'a str,
    pub position: &'a str,
    pub role: &'a str,
    pub is_active: bool,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = crate::schema::auth_tokens)]
pub struct AuthToken {
    pub key: String,
    pub user_id: i32,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::auth_tokens)]
pub struct NewAuthToken<'a> {
    pub key: &'a str,
    pub user_id: i32,
}

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::confirm_email_tokens)]
pub struct ConfirmEmailToken {
    pub id: i32,
    pub user_id: i32,
    pub key: String,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::confirm_email_tokens)]
pub struct NewConfirmEmailToken<'a> {
    pub user_id: i32,
    pub key: &'a str,
}

impl From<User> for DomainUser {
    fn from(value: User) -> Self {
        Self {
            id: value.id,
            email: value.email,
            first_name: value.first_name,
            last_name: value.last_name,
            company: value.company,
            position: value.position,
            role: value.role.as_str().into(),
            is_active: value.is_active,
            created_at: value.created_at,
        }
    }
}

impl From<User> for UserCredentials {
    fn from(mut value: User) -> Self {
        let password_hash = std::mem::take(&mut value.password_hash);
        Self {
            user: value.into(),
            password_hash,
        }
    }
}

impl<'a> From<&'a DomainNewUser> for NewUser<'a> {
    fn from(value: &'a DomainNewUser) -> Self {
        Self {
            email: value.email.as_str(),
            password_hash: value.password_hash.as_str(),
            first_name: value.first_name.as_str(),
            last_name: value.last_name.as_str(),
            company: value.company.as_str(),
            position: value.position.as_str(),
            role: value.role.as_str(),
            is_active: value.is_active,
            updated_at: value.updated_at,
        }
    }
}

impl From<ConfirmEmailToken> for DomainConfirmEmailToken {
    fn from(value: ConfirmEmailToken) -> Self {
        Self {
            id: value.id,
            user_id: value.user_id,
            key: value.key,
            created_at: value.created_at,
        }
    }
}
