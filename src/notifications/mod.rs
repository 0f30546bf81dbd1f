//! Email side effects of registration and checkout.
//!
//! Jobs carry identifiers only. Worker threads re-load the records, render the
//! email and deliver it, so a slow or failing mail server never holds up an
//! HTTP request.

use std::io;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender, TrySendError, bounded};
use thiserror::Error;

use crate::domain::order::OrderDetails;
use crate::domain::user::User;
use crate::repository::errors::RepositoryError;
use crate::repository::{OrderReader, UserReader};

pub mod mailer;
pub mod templates;

use mailer::{MailError, Mailer};
use templates::{EmailTemplates, RenderedEmail};

const CHANNEL_BOUND: usize = 1024;
const MAX_ATTEMPTS: u32 = 3;

/// A unit of notification work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notification {
    RegistrationConfirmation { user_id: i32 },
    OrderConfirmation { order_id: i32 },
    AdminInvoice { order_id: i32 },
}

#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("notification queue is full")]
    QueueFull,
    #[error("notification queue is closed")]
    Disconnected,
    #[error("{0} no longer exists")]
    Missing(String),
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),
    #[error("template error: {0}")]
    Template(#[from] tera::Error),
    #[error("mail error: {0}")]
    Mail(#[from] MailError),
}

/// Accepts notification jobs without waiting for their delivery.
#[cfg_attr(test, mockall::automock)]
pub trait NotificationDispatcher: Send + Sync {
    fn dispatch(&self, notification: Notification) -> Result<(), NotificationError>;
}

/// Sending half of the worker queue.
#[derive(Clone)]
pub struct NotificationQueue {
    tx: Sender<Notification>,
}

impl NotificationDispatcher for NotificationQueue {
    fn dispatch(&self, notification: Notification) -> Result<(), NotificationError> {
        self.tx.try_send(notification).map_err(|err| match err {
            TrySendError::Full(_) => NotificationError::QueueFull,
            TrySendError::Disconnected(_) => NotificationError::Disconnected,
        })
    }
}

/// Where and how notifications are delivered.
#[derive(Debug, Clone)]
pub struct NotificationSettings {
    /// Recipient of fulfilment invoices.
    pub admin_email: String,
    /// Pause between delivery attempts.
    pub retry_delay: Duration,
}

/// Loads, renders and delivers a single notification.
pub struct NotificationProcessor<R> {
    repo: R,
    mailer: Arc<dyn Mailer>,
    templates: EmailTemplates,
    settings: NotificationSettings,
}

impl<R> NotificationProcessor<R>
where
    R: UserReader + OrderReader,
{
    pub fn new(
        repo: R,
        mailer: Arc<dyn Mailer>,
        templates: EmailTemplates,
        settings: NotificationSettings,
    ) -> Self {
        Self {
            repo,
            mailer,
            templates,
            settings,
        }
    }

    /// Process a job, logging and reporting the failure instead of returning it.
    pub fn handle(&self, notification: Notification) {
        match self.process(notification) {
            Ok(()) => log::info!("Delivered {notification:?}"),
            Err(err) => {
                log::error!("Failed to deliver {notification:?}: {err}");
                sentry::capture_error(&err);
            }
        }
    }

    pub fn process(&self, notification: Notification) -> Result<(), NotificationError> {
        let (to, email) = self.render(notification)?;
        self.deliver(&to, &email)
    }

    fn render(
        &self,
        notification: Notification,
    ) -> Result<(String, RenderedEmail), NotificationError> {
        match notification {
            Notification::RegistrationConfirmation { user_id } => {
                let user = self
                    .repo
                    .get_user_by_id(user_id)?
                    .ok_or_else(|| NotificationError::Missing(format!("user {user_id}")))?;
                let token = self.repo.get_confirm_email_token(user_id)?.ok_or_else(|| {
                    NotificationError::Missing(format!("confirmation token of user {user_id}"))
                })?;
                let email = self
                    .templates
                    .registration_confirmation(&user, &token.key)?;
                Ok((user.email, email))
            }
            Notification::OrderConfirmation { order_id } => {
                let (customer, details) = self.load_order(order_id)?;
                let email = self.templates.order_confirmation(&customer, &details)?;
                Ok((customer.email, email))
            }
            Notification::AdminInvoice { order_id } => {
                let (customer, details) = self.load_order(order_id)?;
                let email = self.templates.admin_invoice(&customer, &details)?;
                Ok((self.settings.admin_email.clone(), email))
            }
        }
    }

    fn load_order(&self, order_id: i32) -> Result<(User, OrderDetails), NotificationError> {
        let details = self
            .repo
            .get_order_details(order_id)?
            .ok_or_else(|| NotificationError::Missing(format!("order {order_id}")))?;
        let customer = self
            .repo
            .get_user_by_id(details.order.user_id)?
            .ok_or_else(|| NotificationError::Missing(format!("user {}", details.order.user_id)))?;
        Ok((customer, details))
    }

    fn deliver(&self, to: &str, email: &RenderedEmail) -> Result<(), NotificationError> {
        let mut attempt = 1;
        loop {
            match self.mailer.send(to, email) {
                Ok(()) => return Ok(()),
                Err(err) if attempt < MAX_ATTEMPTS => {
                    log::warn!("Attempt {attempt} to email {to} failed: {err}");
                    attempt += 1;
                    thread::sleep(self.settings.retry_delay);
                }
                Err(err) => return Err(err.into()),
            }
        }
    }
}

/// Handles of the running worker threads.
pub struct NotificationWorkers {
    handles: Vec<JoinHandle<()>>,
}

impl NotificationWorkers {
    /// Wait for the workers to drain the queue. Returns once every
    /// [`NotificationQueue`] clone has been dropped.
    pub fn join(self) {
        for handle in self.handles {
            if handle.join().is_err() {
                log::error!("Notification worker panicked");
            }
        }
    }
}

/// Spawn `workers` threads consuming a bounded queue.
pub fn start_workers<R>(
    processor: NotificationProcessor<R>,
    workers: usize,
) -> io::Result<(NotificationQueue, NotificationWorkers)>
where
    R: UserReader + OrderReader + Send + Sync + 'static,
{
    let (tx, rx) = bounded(CHANNEL_BOUND);
    let processor = Arc::new(processor);

    let mut handles = Vec::with_capacity(workers);
    for index in 0..workers.max(1) {
        let rx: Receiver<Notification> = rx.clone();
        let processor = Arc::clone(&processor);
        let handle = thread::Builder::new()
            .name(format!("notifier-{index}"))
            .spawn(move || {
                for notification in rx.iter() {
                    processor.handle(notification);
                }
            })?;
        handles.push(handle);
    }

    Ok((NotificationQueue { tx }, NotificationWorkers { handles }))
}
