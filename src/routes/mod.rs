//! HTTP handlers mounted under `/api`.
//!
//! Every response uses the same envelope: `{"Status": true, ...}` on success,
//! `{"Status": false, "Error": "..."}` or `{"Status": false, "Errors": {...}}`
//! on failure.

use std::collections::BTreeMap;
use std::fmt;

use actix_web::error::JsonPayloadError;
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, ResponseError};
use serde::Serialize;
use serde_json::{Map, Value, json};
use validator::ValidationErrors;

use crate::services::ServiceError;

pub mod cart;
pub mod catalog;
pub mod contacts;
pub mod images;
pub mod orders;
pub mod partner;
pub mod user;

/// Successful response; object payloads are merged into the envelope.
pub fn success<T: Serialize>(status: StatusCode, payload: T) -> HttpResponse {
    let mut body = Map::new();
    body.insert("Status".to_string(), Value::Bool(true));
    match serde_json::to_value(payload) {
        Ok(Value::Object(fields)) => body.extend(fields),
        Ok(Value::Null) => {}
        Ok(other) => {
            body.insert("Results".to_string(), other);
        }
        Err(err) => {
            log::error!("Failed to serialize response: {err}");
            return HttpResponse::InternalServerError()
                .json(json!({"Status": false, "Error": "Internal server error"}));
        }
    }
    HttpResponse::build(status).json(Value::Object(body))
}

pub fn ok<T: Serialize>(payload: T) -> HttpResponse {
    success(StatusCode::OK, payload)
}

/// Failure with a single message.
pub fn failure(status: StatusCode, message: impl fmt::Display) -> HttpResponse {
    HttpResponse::build(status).json(json!({"Status": false, "Error": message.to_string()}))
}

fn field_errors(errors: &ValidationErrors) -> BTreeMap<String, Vec<String>> {
    errors
        .field_errors()
        .into_iter()
        .map(|(field, errors)| {
            let messages = errors
                .iter()
                .map(|error| match &error.message {
                    Some(message) => message.to_string(),
                    None => format!("invalid value ({})", error.code),
                })
                .collect();
            (field.to_string(), messages)
        })
        .collect()
}

fn status_of(err: &ServiceError) -> StatusCode {
    match err {
        ServiceError::Unauthorized | ServiceError::InactiveAccount => StatusCode::FORBIDDEN,
        ServiceError::NotFound => StatusCode::NOT_FOUND,
        ServiceError::Conflict(_) | ServiceError::Form(_) | ServiceError::Validation(_) => {
            StatusCode::BAD_REQUEST
        }
        ServiceError::InvalidCredentials => StatusCode::UNAUTHORIZED,
        ServiceError::Throttled => StatusCode::TOO_MANY_REQUESTS,
        ServiceError::Upstream(_) => StatusCode::BAD_GATEWAY,
        ServiceError::Internal(_) | ServiceError::Repository(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn error_body(err: &ServiceError) -> Value {
    let message = match err {
        ServiceError::Validation(errors) => {
            return json!({"Status": false, "Errors": field_errors(errors)});
        }
        ServiceError::Unauthorized => "Недостаточно прав".to_string(),
        ServiceError::NotFound => "Not found".to_string(),
        ServiceError::InvalidCredentials => "Неверные учётные данные".to_string(),
        ServiceError::InactiveAccount => "Учётная запись не активирована".to_string(),
        ServiceError::Throttled => "Слишком много запросов, попробуйте позже".to_string(),
        ServiceError::Conflict(message)
        | ServiceError::Form(message)
        | ServiceError::Upstream(message) => message.clone(),
        ServiceError::Internal(_) | ServiceError::Repository(_) => {
            "Internal server error".to_string()
        }
    };
    json!({"Status": false, "Error": message})
}

/// Translate a service failure into the envelope.
///
/// Server-side failures are logged with `action` and reported to Sentry; their
/// details never reach the client.
pub fn service_error(err: ServiceError, action: &str) -> HttpResponse {
    let status = status_of(&err);
    if status.is_server_error() {
        log::error!("Failed to {action}: {err}");
        sentry::capture_error(&err);
    }
    HttpResponse::build(status).json(error_body(&err))
}

/// Service failure raised from an extractor.
#[derive(Debug)]
pub struct ApiError(pub ServiceError);

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        status_of(&self.0)
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(error_body(&self.0))
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        ApiError(err)
    }
}

/// Malformed JSON bodies are answered with the envelope instead of plain text.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let message = format!("Некорректный запрос: {err}");
    ApiError(ServiceError::Form(message)).into()
}

#[cfg(test)]
mod tests {
    use actix_web::body::to_bytes;
    use validator::Validate;

    use super::*;

    async fn body_json(response: HttpResponse) -> Value {
        let bytes = to_bytes(response.into_body()).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[actix_web::test]
    async fn object_payload_is_merged_into_envelope() {
        let response = success(StatusCode::CREATED, json!({"Objects_create": 2}));
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(
            body_json(response).await,
            json!({"Status": true, "Objects_create": 2})
        );
    }

    #[actix_web::test]
    async fn list_payload_goes_under_results() {
        let body = body_json(ok(vec![1, 2])).await;
        assert_eq!(body, json!({"Status": true, "Results": [1, 2]}));
    }

    #[actix_web::test]
    async fn internal_errors_hide_details() {
        let response = service_error(
            ServiceError::Internal("disk on fire".to_string()),
            "test",
        );
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["Status"], false);
        assert!(!body["Error"].as_str().unwrap().contains("disk"));
    }

    #[actix_web::test]
    async fn validation_errors_are_grouped_by_field() {
        #[derive(Validate)]
        struct Probe {
            #[validate(url)]
            url: String,
        }

        let errors = Probe {
            url: "nope".to_string(),
        }
        .validate()
        .unwrap_err();
        let response = service_error(ServiceError::Validation(errors), "test");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert!(body["Errors"]["url"].is_array());
    }

    #[test]
    fn status_codes_follow_error_kinds() {
        assert_eq!(status_of(&ServiceError::NotFound), StatusCode::NOT_FOUND);
        assert_eq!(
            status_of(&ServiceError::InvalidCredentials),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_of(&ServiceError::InactiveAccount),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            status_of(&ServiceError::Upstream("feed".to_string())),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status_of(&ServiceError::Throttled),
            StatusCode::TOO_MANY_REQUESTS
        );
    }
}
