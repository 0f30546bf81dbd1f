//! Runtime configuration assembled from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

/// SMTP credentials used by the notification workers.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
}

/// Per-scope request budgets (requests per minute) used by the throttles.
#[derive(Debug, Clone, Copy)]
pub struct ThrottleConfig {
    pub registration_per_minute: u32,
    pub login_per_minute: u32,
    pub partner_per_minute: u32,
    pub burst_per_minute: u32,
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            registration_per_minute: 5,
            login_per_minute: 10,
            partner_per_minute: 30,
            burst_per_minute: 120,
        }
    }
}

/// Settings shared by the HTTP server, the repository and the background workers.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub database_url: String,
    pub address: String,
    pub port: u16,
    /// Directory where uploaded product images are stored and served from.
    pub media_root: String,
    pub smtp: Option<SmtpConfig>,
    pub email_from: String,
    /// Recipient of the fulfilment invoices generated at checkout.
    pub admin_email: String,
    pub sentry_dsn: Option<String>,
    pub notification_workers: usize,
    pub feed_timeout: Duration,
    pub throttle: ThrottleConfig,
}

impl ServerConfig {
    /// Read the configuration from the process environment.
    ///
    /// Call `dotenvy::dotenv()` beforehand to pick up a local `.env` file.
    pub fn from_env() -> Self {
        let smtp = env::var("SMTP_HOST").ok().map(|host| SmtpConfig {
            host,
            port: parse_var("SMTP_PORT", 587),
            username: env::var("SMTP_USERNAME").unwrap_or_default(),
            password: env::var("SMTP_PASSWORD").unwrap_or_default(),
        });

        let defaults = ThrottleConfig::default();

        Self {
            database_url: env::var("DATABASE_URL").unwrap_or("app.db".to_string()),
            address: env::var("ADDRESS").unwrap_or("127.0.0.1".to_string()),
            port: parse_var("PORT", 8080),
            media_root: env::var("MEDIA_ROOT").unwrap_or("./media".to_string()),
            smtp,
            email_from: env::var("EMAIL_FROM").unwrap_or("noreply@localhost".to_string()),
            admin_email: env::var("ADMIN_EMAIL").unwrap_or("admin@localhost".to_string()),
            sentry_dsn: env::var("SENTRY_DSN").ok().filter(|dsn| !dsn.is_empty()),
            notification_workers: parse_var("NOTIFICATION_WORKERS", 2usize).max(1),
            feed_timeout: Duration::from_secs(parse_var("FEED_TIMEOUT_SECS", 30)),
            throttle: ThrottleConfig {
                registration_per_minute: parse_var(
                    "THROTTLE_REGISTRATION",
                    defaults.registration_per_minute,
                ),
                login_per_minute: parse_var("THROTTLE_LOGIN", defaults.login_per_minute),
                partner_per_minute: parse_var("THROTTLE_PARTNER", defaults.partner_per_minute),
                burst_per_minute: parse_var("THROTTLE_BURST", defaults.burst_per_minute),
            },
        }
    }
}

fn parse_var<T: FromStr>(name: &str, default: T) -> T {
    match env::var(name) {
        Ok(raw) => match raw.trim().parse::<T>() {
            Ok(value) => value,
            Err(_) => {
                log::warn!("Ignoring invalid value `{raw}` for {name}");
                default
            }
        },
        Err(_) => default,
    }
}
