use thiserror::Error;
use validator::ValidationErrors;

use crate::forms::auth::AuthFormError;
use crate::forms::contacts::ContactFormError;
use crate::forms::images::ImageFormError;
use crate::forms::partner::PartnerFormError;
use crate::repository::errors::RepositoryError;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors returned by the service layer and translated into HTTP responses by the routes.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The caller is authenticated but lacks the role required for the operation.
    #[error("forbidden")]
    Unauthorized,
    #[error("not found")]
    NotFound,
    /// The write clashes with existing data.
    #[error("{0}")]
    Conflict(String),
    /// The request payload was malformed or failed a business rule.
    #[error("{0}")]
    Form(String),
    /// Field-level validation failures.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("account is not active")]
    InactiveAccount,
    /// The client exceeded its request budget.
    #[error("too many requests")]
    Throttled,
    /// An external dependency (the supplier feed) failed.
    #[error("upstream failure: {0}")]
    Upstream(String),
    #[error("internal error: {0}")]
    Internal(String),
    #[error(transparent)]
    Repository(RepositoryError),
}

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => ServiceError::NotFound,
            RepositoryError::Conflict(_) => {
                ServiceError::Conflict("Запись с такими данными уже существует".to_string())
            }
            RepositoryError::InvalidReference(_) => {
                ServiceError::Form("Ссылка на несуществующий объект".to_string())
            }
            RepositoryError::Rejected(message) => ServiceError::Form(message),
            other => ServiceError::Repository(other),
        }
    }
}

// Field-level validation failures keep their structure so clients can show
// them next to the offending inputs.

impl From<AuthFormError> for ServiceError {
    fn from(err: AuthFormError) -> Self {
        match err {
            AuthFormError::Validation(errors) => ServiceError::Validation(errors),
            other => ServiceError::Form(other.to_string()),
        }
    }
}

impl From<ContactFormError> for ServiceError {
    fn from(err: ContactFormError) -> Self {
        match err {
            ContactFormError::Validation(errors) => ServiceError::Validation(errors),
            other => ServiceError::Form(other.to_string()),
        }
    }
}

impl From<ImageFormError> for ServiceError {
    fn from(err: ImageFormError) -> Self {
        match err {
            ImageFormError::Validation(errors) => ServiceError::Validation(errors),
            other => ServiceError::Form(other.to_string()),
        }
    }
}

impl From<PartnerFormError> for ServiceError {
    fn from(err: PartnerFormError) -> Self {
        match err {
            PartnerFormError::Validation(errors) => ServiceError::Validation(errors),
            other => ServiceError::Form(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_detail_is_not_leaked_for_integrity_errors() {
        let err = ServiceError::from(RepositoryError::Conflict(
            "UNIQUE constraint failed: users.email".to_string(),
        ));

        match err {
            ServiceError::Conflict(message) => assert!(!message.contains("users.email")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn url_validation_keeps_field_detail() {
        let err = ServiceError::from(
            crate::forms::partner::PartnerUpdateForm {
                url: Some("not a url".to_string()),
            }
            .into_url()
            .unwrap_err(),
        );
        match err {
            ServiceError::Validation(errors) => {
                assert!(errors.field_errors().contains_key("url"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn rejected_writes_become_form_errors() {
        let err = ServiceError::from(RepositoryError::Rejected("Cart is empty".to_string()));
        assert!(matches!(err, ServiceError::Form(message) if message == "Cart is empty"));
    }
}
