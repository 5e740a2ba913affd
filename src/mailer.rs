//! Invoice rendering and outbound delivery.

use std::sync::Mutex;

use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use serde::Serialize;
use tera::{Context, Tera};

use crate::{config::SmtpSettings, errors::AppError, structs::QuotationDetail};

const IMPLICIT_TLS_PORT: u16 = 465;

lazy_static! {
    pub static ref TEMPLATES: Tera = {
        let mut tera = Tera::default();
        if let Err(e) =
            tera.add_raw_template("invoice.html", include_str!("../templates/invoice.html"))
        {
            log::error!("Parsing error(s): {}", e);
            ::std::process::exit(1);
        }
        tera.autoescape_on(vec![".html"]);
        tera
    };
}

#[derive(Debug, Clone, PartialEq)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub html_body: String,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), AppError>;
}

#[derive(Serialize)]
struct InvoiceLine<'a> {
    product_name: &'a str,
    quantity: i64,
    price: String,
    amount: String,
}

pub fn render_invoice(detail: &QuotationDetail) -> Result<String, AppError> {
    let items: Vec<InvoiceLine<'_>> = detail
        .quotation_items
        .iter()
        .map(|item| InvoiceLine {
            product_name: &item.product_name,
            quantity: item.quantity,
            price: format!("{:.2}", item.price),
            amount: format!("{:.2}", item.amount),
        })
        .collect();

    let mut context = Context::new();
    context.insert("business_name", &detail.business_name);
    context.insert("customer_name", &detail.customer_name);
    context.insert("quotation_id", &detail.id);
    context.insert("items", &items);
    context.insert("grand_total", &format!("{:.2}", detail.grand_total));

    TEMPLATES.render("invoice.html", &context).map_err(|e| {
        log::error!("Failed to render template: {}", e);
        AppError::TemplateError(e)
    })
}

/// The invoice mail for a quotation, addressed to its customer.
pub fn invoice_email(detail: &QuotationDetail) -> Result<OutgoingEmail, AppError> {
    Ok(OutgoingEmail {
        to: detail.customer_email.clone(),
        subject: format!("Invoice for Quotation #{}", detail.id),
        html_body: render_invoice(detail)?,
    })
}

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn from_settings(settings: &SmtpSettings) -> Result<Self, AppError> {
        let builder = if settings.port == IMPLICIT_TLS_PORT {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&settings.host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)
        }
        .map_err(|e| AppError::ConfigError(format!("Invalid SMTP relay: {}", e)))?;

        let transport = builder
            .port(settings.port)
            .credentials(Credentials::new(
                settings.username.clone(),
                settings.password.clone(),
            ))
            .build();

        let from = settings
            .from_email
            .parse()
            .map_err(|e| AppError::ConfigError(format!("Invalid sender address: {}", e)))?;

        Ok(SmtpMailer { transport, from })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), AppError> {
        let to: Mailbox = email
            .to
            .parse()
            .map_err(|e| AppError::MailError(format!("Invalid recipient {}: {}", email.to, e)))?;

        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(&email.subject)
            .header(ContentType::TEXT_HTML)
            .body(email.html_body.clone())
            .map_err(|e| AppError::MailError(e.to_string()))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| AppError::MailError(e.to_string()))?;
        log::info!("Mail '{}' delivered to {}", email.subject, email.to);
        Ok(())
    }
}

/// Keeps every message in memory instead of delivering it.
#[derive(Default)]
pub struct MemoryMailer {
    outbox: Mutex<Vec<OutgoingEmail>>,
    fail: bool,
}

impl MemoryMailer {
    /// A mailer whose every send fails, for exercising transport errors.
    pub fn failing() -> Self {
        MemoryMailer {
            outbox: Mutex::default(),
            fail: true,
        }
    }

    pub fn sent(&self) -> Vec<OutgoingEmail> {
        self.outbox
            .lock()
            .map(|outbox| outbox.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Mailer for MemoryMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), AppError> {
        if self.fail {
            return Err(AppError::MailError("transport unavailable".to_owned()));
        }
        self.outbox
            .lock()
            .map_err(|_| AppError::InternalServerError)?
            .push(email.clone());
        Ok(())
    }
}
