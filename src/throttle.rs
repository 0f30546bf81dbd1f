//! Per-client request budgets.

use std::num::NonZeroU32;

use actix_web::HttpRequest;
use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};

use crate::config::ThrottleConfig;
use crate::services::{ServiceError, ServiceResult};

/// Endpoint groups with separate budgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThrottleScope {
    Registration,
    Login,
    Partner,
    /// Every authenticated request.
    Burst,
}

/// Keyed limiters, one per scope, shared by all workers.
pub struct Throttles {
    registration: DefaultKeyedRateLimiter<String>,
    login: DefaultKeyedRateLimiter<String>,
    partner: DefaultKeyedRateLimiter<String>,
    burst: DefaultKeyedRateLimiter<String>,
}

fn per_minute(requests: u32) -> DefaultKeyedRateLimiter<String> {
    let requests = NonZeroU32::new(requests).unwrap_or(NonZeroU32::MIN);
    RateLimiter::keyed(Quota::per_minute(requests))
}

impl Throttles {
    pub fn new(config: &ThrottleConfig) -> Self {
        Self {
            registration: per_minute(config.registration_per_minute),
            login: per_minute(config.login_per_minute),
            partner: per_minute(config.partner_per_minute),
            burst: per_minute(config.burst_per_minute),
        }
    }

    /// Spend one request of `key`'s budget in `scope`.
    pub fn check(&self, scope: ThrottleScope, key: &str) -> ServiceResult<()> {
        let limiter = match scope {
            ThrottleScope::Registration => &self.registration,
            ThrottleScope::Login => &self.login,
            ThrottleScope::Partner => &self.partner,
            ThrottleScope::Burst => &self.burst,
        };

        limiter.check_key(&key.to_string()).map_err(|_| {
            log::warn!("Throttled {scope:?} request from {key}");
            ServiceError::Throttled
        })
    }

    /// Forget keys whose budget has fully recovered.
    pub fn retain_recent(&self) {
        self.registration.retain_recent();
        self.login.retain_recent();
        self.partner.retain_recent();
        self.burst.retain_recent();
    }
}

/// Client address used to key anonymous requests.
pub fn client_key(req: &HttpRequest) -> String {
    req.connection_info()
        .realip_remote_addr()
        .map(|addr| format!("ip:{addr}"))
        .unwrap_or_else(|| "ip:unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(requests: u32) -> ThrottleConfig {
        ThrottleConfig {
            registration_per_minute: requests,
            login_per_minute: requests,
            partner_per_minute: requests,
            burst_per_minute: requests,
        }
    }

    #[test]
    fn budget_is_tracked_per_key() {
        let throttles = Throttles::new(&config(2));

        assert!(throttles.check(ThrottleScope::Login, "ip:1").is_ok());
        assert!(throttles.check(ThrottleScope::Login, "ip:1").is_ok());
        assert!(matches!(
            throttles.check(ThrottleScope::Login, "ip:1"),
            Err(ServiceError::Throttled)
        ));
        assert!(throttles.check(ThrottleScope::Login, "ip:2").is_ok());
    }

    #[test]
    fn scopes_have_separate_budgets() {
        let throttles = Throttles::new(&config(1));

        assert!(throttles.check(ThrottleScope::Registration, "ip:1").is_ok());
        assert!(throttles.check(ThrottleScope::Login, "ip:1").is_ok());
        assert!(throttles.check(ThrottleScope::Registration, "ip:1").is_err());
    }

    #[test]
    fn zero_budget_still_allows_one_request() {
        let throttles = Throttles::new(&config(0));
        assert!(throttles.check(ThrottleScope::Partner, "user:1").is_ok());
    }
}
