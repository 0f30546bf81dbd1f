//! Plain-text rendering of outgoing emails.
//!
//! Rendering is pure: it only needs the already loaded records and never touches
//! the database or the mail transport.

use serde::Serialize;
use tera::{Context, Tera};

use crate::domain::order::OrderDetails;
use crate::domain::user::User;

const REGISTRATION_CONFIRMATION: &str =
    include_str!("../../templates/email/registration_confirmation.txt");
const ORDER_CONFIRMATION: &str = include_str!("../../templates/email/order_confirmation.txt");
const ADMIN_INVOICE: &str = include_str!("../../templates/email/admin_invoice.txt");

const DATE_FORMAT: &str = "%d.%m.%Y %H:%M";

/// Subject and body of an email ready to be handed to a mailer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedEmail {
    pub subject: String,
    pub body: String,
}

#[derive(Serialize)]
struct InvoiceLine<'a> {
    position: usize,
    name: &'a str,
    shop: &'a str,
    quantity: i32,
    price: i32,
    total: i64,
}

/// Compiled email templates.
pub struct EmailTemplates {
    tera: Tera,
}

impl EmailTemplates {
    pub fn new() -> Result<Self, tera::Error> {
        let mut tera = Tera::default();
        tera.add_raw_templates(vec![
            ("registration_confirmation.txt", REGISTRATION_CONFIRMATION),
            ("order_confirmation.txt", ORDER_CONFIRMATION),
            ("admin_invoice.txt", ADMIN_INVOICE),
        ])?;
        Ok(Self { tera })
    }

    pub fn registration_confirmation(
        &self,
        user: &User,
        token: &str,
    ) -> Result<RenderedEmail, tera::Error> {
        let mut context = Context::new();
        context.insert("first_name", &user.first_name);
        context.insert("email", &user.email);
        context.insert("token", token);

        Ok(RenderedEmail {
            subject: "Подтверждение регистрации".to_string(),
            body: self.tera.render("registration_confirmation.txt", &context)?,
        })
    }

    pub fn order_confirmation(
        &self,
        customer: &User,
        details: &OrderDetails,
    ) -> Result<RenderedEmail, tera::Error> {
        let context = order_context(customer, details);

        Ok(RenderedEmail {
            subject: format!("Заказ №{} оформлен", details.order.id),
            body: self.tera.render("order_confirmation.txt", &context)?,
        })
    }

    /// Fulfilment invoice sent to the administrator after checkout.
    pub fn admin_invoice(
        &self,
        customer: &User,
        details: &OrderDetails,
    ) -> Result<RenderedEmail, tera::Error> {
        let context = order_context(customer, details);

        Ok(RenderedEmail {
            subject: format!(
                "Новая накладная для исполнения - Заказ #{}",
                details.order.id
            ),
            body: self.tera.render("admin_invoice.txt", &context)?,
        })
    }
}

fn order_context(customer: &User, details: &OrderDetails) -> Context {
    let items: Vec<InvoiceLine<'_>> = details
        .items
        .iter()
        .enumerate()
        .map(|(index, line)| InvoiceLine {
            position: index + 1,
            name: &line.product_name,
            shop: &line.shop_name,
            quantity: line.quantity,
            price: line.price,
            total: line.total_price(),
        })
        .collect();

    let mut context = Context::new();
    context.insert("order_id", &details.order.id);
    context.insert("status", details.order.status.label());
    context.insert(
        "created_at",
        &details.order.created_at.format(DATE_FORMAT).to_string(),
    );
    context.insert("customer_name", &customer.full_name());
    context.insert("customer_email", &customer.email);
    context.insert("items", &items);
    context.insert("total", &details.total());

    // Missing values fall back to the template defaults.
    if !customer.company.trim().is_empty() {
        context.insert("company", &customer.company);
    }
    if let Some(contact) = &details.contact {
        if !contact.phone.trim().is_empty() {
            context.insert("phone", &contact.phone);
        }
        let address = contact.full_address();
        if !address.is_empty() {
            context.insert("address", &address);
        }
    }

    context
}
