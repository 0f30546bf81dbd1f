use lettre::message::{Mailbox, header::ContentType};
use lettre::transport::smtp::Error as SmtpError;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use thiserror::Error;

use crate::config::SmtpConfig;
use crate::notifications::templates::RenderedEmail;

/// Errors that can occur when sending email.
#[derive(Debug, Error)]
pub enum MailError {
    #[error("SMTP error: {0}")]
    Smtp(#[from] SmtpError),
    #[error("failed to build message: {0}")]
    MessageBuild(#[from] lettre::error::Error),
    #[error("invalid email address: {0}")]
    InvalidAddress(String),
}

/// Delivers rendered emails. Implementations are shared between worker threads.
pub trait Mailer: Send + Sync {
    fn send(&self, to: &str, email: &RenderedEmail) -> Result<(), MailError>;
}

/// Blocking SMTP delivery through `lettre`.
pub struct SmtpMailer {
    transport: SmtpTransport,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(config: &SmtpConfig, from: &str) -> Result<Self, MailError> {
        let from = from
            .parse::<Mailbox>()
            .map_err(|_| MailError::InvalidAddress(from.to_string()))?;

        let mut builder = SmtpTransport::starttls_relay(&config.host)?.port(config.port);
        if !config.username.is_empty() {
            builder = builder.credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ));
        }

        Ok(Self {
            transport: builder.build(),
            from,
        })
    }
}

impl Mailer for SmtpMailer {
    fn send(&self, to: &str, email: &RenderedEmail) -> Result<(), MailError> {
        let to = to
            .parse::<Mailbox>()
            .map_err(|_| MailError::InvalidAddress(to.to_string()))?;

        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(email.subject.as_str())
            .header(ContentType::TEXT_PLAIN)
            .body(email.body.clone())?;

        self.transport.send(&message)?;
        Ok(())
    }
}

/// Fallback used when no SMTP server is configured: emails are only logged.
pub struct LogMailer;

impl Mailer for LogMailer {
    fn send(&self, to: &str, email: &RenderedEmail) -> Result<(), MailError> {
        log::info!("Email to {to}: {}\n{}", email.subject, email.body);
        Ok(())
    }
}
