use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::forms::sanitize_inline_text;

const PASSWORD_MIN_LEN: usize = 8;
const NAME_MAX_LEN: u64 = 128;

pub type AuthFormResult<T> = Result<T, AuthFormError>;

#[derive(Debug, Error)]
pub enum AuthFormError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("passwords do not match")]
    PasswordMismatch,
    #[error("password is too weak: {0}")]
    WeakPassword(&'static str),
}

/// Sign-up payload.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterForm {
    #[validate(email)]
    pub email: String,
    pub password: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "password confirmation is required"))]
    pub password_confirm: String,
    #[validate(length(min = 1, max = NAME_MAX_LEN))]
    pub first_name: String,
    #[validate(length(min = 1, max = NAME_MAX_LEN))]
    pub last_name: String,
    #[serde(default)]
    #[validate(length(max = NAME_MAX_LEN))]
    pub company: String,
    #[serde(default)]
    #[validate(length(max = NAME_MAX_LEN))]
    pub position: String,
    /// Register as a vendor instead of a buyer.
    #[serde(default, rename = "type")]
    pub account_type: Option<String>,
}

/// Normalised registration data; the password is still in plain text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub company: String,
    pub position: String,
    pub is_shop: bool,
}

impl RegisterForm {
    pub fn into_registration(self) -> AuthFormResult<Registration> {
        self.validate()?;

        if self.password_confirm != self.password {
            return Err(AuthFormError::PasswordMismatch);
        }

        let email = self.email.trim().to_lowercase();
        check_password_strength(&self.password, &email)?;

        Ok(Registration {
            email,
            password: self.password,
            first_name: sanitize_inline_text(&self.first_name),
            last_name: sanitize_inline_text(&self.last_name),
            company: sanitize_inline_text(&self.company),
            position: sanitize_inline_text(&self.position),
            is_shop: self
                .account_type
                .as_deref()
                .is_some_and(|kind| kind.trim().eq_ignore_ascii_case("shop")),
        })
    }
}

fn check_password_strength(password: &str, email: &str) -> AuthFormResult<()> {
    if password.chars().count() < PASSWORD_MIN_LEN {
        return Err(AuthFormError::WeakPassword("must be at least 8 characters long"));
    }
    if password.chars().all(|ch| ch.is_ascii_digit()) {
        return Err(AuthFormError::WeakPassword("must not be entirely numeric"));
    }
    let local_part = email.split('@').next().unwrap_or_default();
    if !local_part.is_empty() && password.to_lowercase() == local_part {
        return Err(AuthFormError::WeakPassword("must not match the email"));
    }
    Ok(())
}

/// Email confirmation payload.
#[derive(Debug, Deserialize, Validate)]
pub struct ConfirmForm {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub token: String,
}

impl ConfirmForm {
    /// Lowercased email and trimmed token.
    pub fn into_parts(self) -> AuthFormResult<(String, String)> {
        self.validate()?;
        Ok((
            self.email.trim().to_lowercase(),
            self.token.trim().to_string(),
        ))
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginForm {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

impl LoginForm {
    pub fn into_parts(self) -> AuthFormResult<(String, String)> {
        self.validate()?;
        Ok((self.email.trim().to_lowercase(), self.password))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(password: &str) -> RegisterForm {
        RegisterForm {
            email: "Anna.Smirnova@Example.com".to_string(),
            password: password.to_string(),
            password_confirm: password.to_string(),
            first_name: " Anna ".to_string(),
            last_name: "Smirnova".to_string(),
            company: String::new(),
            position: String::new(),
            account_type: None,
        }
    }

    #[test]
    fn registration_is_normalised() {
        let registration = form("correct-horse").into_registration().unwrap();
        assert_eq!(registration.email, "anna.smirnova@example.com");
        assert_eq!(registration.first_name, "Anna");
        assert!(!registration.is_shop);
    }

    #[test]
    fn shop_account_type_is_recognised() {
        let mut payload = form("correct-horse");
        payload.account_type = Some("Shop".to_string());
        assert!(payload.into_registration().unwrap().is_shop);
    }

    #[test]
    fn weak_passwords_are_rejected() {
        for password in ["short", "1234567890", "anna.smirnova"] {
            let result = form(password).into_registration();
            assert!(
                matches!(result, Err(AuthFormError::WeakPassword(_))),
                "{password}"
            );
        }
    }

    #[test]
    fn confirmation_mismatch_is_rejected() {
        let mut payload = form("correct-horse");
        payload.password_confirm = "correct-horses".to_string();
        assert!(matches!(
            payload.into_registration(),
            Err(AuthFormError::PasswordMismatch)
        ));
    }

    #[test]
    fn missing_confirmation_is_a_field_error() {
        let payload: RegisterForm = serde_json::from_value(serde_json::json!({
            "email": "a@example.com",
            "password": "correct-horse",
            "first_name": "Anna",
            "last_name": "Smirnova",
        }))
        .unwrap();
        match payload.into_registration() {
            Err(AuthFormError::Validation(errors)) => {
                assert!(errors.field_errors().contains_key("password_confirm"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn invalid_email_fails_validation() {
        let mut payload = form("correct-horse");
        payload.email = "not-an-email".to_string();
        assert!(matches!(
            payload.into_registration(),
            Err(AuthFormError::Validation(_))
        ));
    }
}
