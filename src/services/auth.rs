//! Registration, email confirmation and token login.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use rand::Rng;
use serde::Serialize;

use crate::domain::contact::Contact;
use crate::domain::user::{AuthenticatedUser, NewUser, User, UserRole};
use crate::forms::auth::{ConfirmForm, LoginForm, RegisterForm};
use crate::notifications::{Notification, NotificationDispatcher};
use crate::repository::errors::RepositoryError;
use crate::repository::{ContactReader, UserReader, UserWriter};
use crate::services::{ServiceError, ServiceResult};

const TOKEN_LEN: usize = 40;
const CONFIRM_KEY_LEN: usize = 32;

/// Result of a successful login.
#[derive(Debug, Serialize)]
pub struct LoginData {
    pub token: String,
    pub user: User,
}

/// Profile returned by `GET /user/details/`.
#[derive(Debug, Serialize)]
pub struct UserDetails {
    #[serde(flatten)]
    pub user: User,
    pub contacts: Vec<Contact>,
}

/// Create an inactive account and queue its confirmation email.
///
/// The confirmation key is only ever sent by email.
pub fn register<R, D>(repo: &R, dispatcher: &D, form: RegisterForm) -> ServiceResult<User>
where
    R: UserReader + UserWriter + ?Sized,
    D: NotificationDispatcher + ?Sized,
{
    let registration = form.into_registration()?;

    if repo.get_user_by_email(&registration.email)?.is_some() {
        return Err(ServiceError::Conflict(
            "Пользователь с таким email уже существует".to_string(),
        ));
    }

    let password_hash = hash_password(&registration.password)?;
    let role = if registration.is_shop {
        UserRole::Shop
    } else {
        UserRole::Buyer
    };
    let new_user = NewUser::new(registration.email, password_hash)
        .with_name(registration.first_name, registration.last_name)
        .with_company(registration.company, registration.position)
        .with_role(role);

    let (user, _token) = repo.create_user_with_token(&new_user, &generate_key(CONFIRM_KEY_LEN))?;

    let job = Notification::RegistrationConfirmation { user_id: user.id };
    if let Err(err) = dispatcher.dispatch(job) {
        log::error!("Failed to queue confirmation email for user {}: {err}", user.id);
    }

    Ok(user)
}

/// Activate the account owning `(email, token)`.
pub fn confirm_email<R>(repo: &R, form: ConfirmForm) -> ServiceResult<User>
where
    R: UserWriter + ?Sized,
{
    let (email, token) = form.into_parts()?;

    match repo.confirm_email(&email, &token) {
        Ok(user) => Ok(user),
        Err(RepositoryError::NotFound) => Err(ServiceError::Form(
            "Неправильно указан токен или email".to_string(),
        )),
        Err(err) => Err(err.into()),
    }
}

/// Check the password and hand out the user's API token.
pub fn login<R>(repo: &R, form: LoginForm) -> ServiceResult<LoginData>
where
    R: UserReader + UserWriter + ?Sized,
{
    let (email, password) = form.into_parts()?;

    let credentials = repo
        .get_credentials_by_email(&email)?
        .ok_or(ServiceError::InvalidCredentials)?;

    if !verify_password(&password, &credentials.password_hash) {
        return Err(ServiceError::InvalidCredentials);
    }
    if !credentials.user.is_active {
        return Err(ServiceError::InactiveAccount);
    }

    let token = repo.get_or_create_auth_token(credentials.user.id, &generate_key(TOKEN_LEN))?;

    Ok(LoginData {
        token,
        user: credentials.user,
    })
}

/// Resolve an API token to an active user.
pub fn authenticate<R>(repo: &R, token: &str) -> ServiceResult<AuthenticatedUser>
where
    R: UserReader + ?Sized,
{
    let user = repo
        .get_user_by_token(token)?
        .ok_or(ServiceError::InvalidCredentials)?;

    if !user.is_active {
        return Err(ServiceError::InactiveAccount);
    }

    Ok(AuthenticatedUser::from(&user))
}

pub fn user_details<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<UserDetails>
where
    R: UserReader + ContactReader + ?Sized,
{
    let profile = repo
        .get_user_by_id(user.id)?
        .ok_or(ServiceError::NotFound)?;
    let contacts = repo.list_contacts(user.id)?;

    Ok(UserDetails {
        user: profile,
        contacts,
    })
}

fn hash_password(password: &str) -> ServiceResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| ServiceError::Internal(format!("password hashing failed: {err}")))
}

fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed_hash) = PasswordHash::new(hash) else {
        return false;
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

pub(crate) fn generate_key(length: usize) -> String {
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    let mut rng = rand::rng();
    (0..length)
        .map(|_| char::from(CHARSET[rng.random_range(0..CHARSET.len())]))
        .collect()
}
