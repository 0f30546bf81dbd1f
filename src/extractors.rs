//! Token authentication for API handlers.

use std::future::{Ready, ready};

use actix_web::dev::Payload;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, web};

use crate::domain::user::AuthenticatedUser;
use crate::repository::DieselRepository;
use crate::routes::ApiError;
use crate::services::{self, ServiceError};
use crate::throttle::{ThrottleScope, Throttles};

const TOKEN_SCHEME: &str = "Token";

/// Key from an `Authorization: Token <key>` header.
fn token_from_header(req: &HttpRequest) -> Option<&str> {
    let header = req.headers().get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, key) = header.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case(TOKEN_SCHEME) {
        return None;
    }
    let key = key.trim();
    (!key.is_empty()).then_some(key)
}

fn authenticate_request(req: &HttpRequest) -> Result<AuthenticatedUser, ApiError> {
    let token = token_from_header(req).ok_or(ApiError(ServiceError::InvalidCredentials))?;

    let repo = req
        .app_data::<web::Data<DieselRepository>>()
        .ok_or_else(|| ApiError(ServiceError::Internal("repository is not configured".into())))?;

    let user = services::auth::authenticate(repo.get_ref(), token).map_err(|err| {
        if let ServiceError::Repository(err) = &err {
            log::error!("Failed to authenticate request: {err}");
        }
        ApiError(err)
    })?;

    if let Some(throttles) = req.app_data::<web::Data<Throttles>>() {
        throttles.check(ThrottleScope::Burst, &format!("user:{}", user.id))?;
    }

    Ok(user)
}

impl FromRequest for AuthenticatedUser {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate_request(req))
    }
}
