//! Invitation e-mail dispatch.
//!
//! [`SmtpMailer`] delivers through an SMTP relay; [`LogMailer`] only logs the
//! composed message and is used when SMTP is disabled.

use std::time::Duration;

use async_trait::async_trait;
use lettre::{
    Message, SmtpTransport, Transport,
    message::{Mailbox, MultiPart, SinglePart, header::ContentType},
    transport::smtp::authentication::Credentials,
};

use crate::{
    config::SmtpConfig,
    models::{accountant::Accountant, customer::Customer},
};

#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("Invalid address: {0}")]
    Address(String),

    #[error("Failed to build message: {0}")]
    Build(String),

    #[error("Failed to deliver message: {0}")]
    Transport(String),
}

/// Sends invitations from an accountant to one of their customers.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_invitation(
        &self,
        accountant: &Accountant,
        customer: &Customer,
    ) -> Result<(), MailError>;
}

/// A composed invitation, independent of the transport.
#[derive(Debug, Clone, PartialEq)]
pub struct Invitation {
    pub to: String,
    pub reply_to: String,
    pub subject: String,
    pub plain_body: String,
    pub html_body: String,
}

impl Invitation {
    pub fn compose(accountant: &Accountant, customer: &Customer, portal_url: &str) -> Self {
        let link = format!(
            "{}/invitations/{}",
            portal_url.trim_end_matches('/'),
            customer.id
        );

        let subject = format!(
            "{} invites {} to the customer portal",
            accountant.email, customer.company_name
        );

        let plain_body = format!(
            "Hello {name},\n\n\
             Your accountant {accountant} has invited {company} to the customer portal.\n\
             Open the following link to accept the invitation:\n\n\
             {link}\n",
            name = customer.name,
            accountant = accountant.email,
            company = customer.company_name,
        );

        let html_body = format!(
            r###"<html>
    <body style="font-family: Arial, sans-serif;">
        <h2>Hello {name},</h2>
        <p>Your accountant {accountant} has invited <strong>{company}</strong> to the customer portal.</p>
        <p>
            <a href="{link}" style="background-color: #4CAF50; color: white; padding: 14px 20px; text-decoration: none; border-radius: 4px;">
                Accept invitation
            </a>
        </p>
    </body>
</html>
"###,
            name = customer.name,
            accountant = accountant.email,
            company = customer.company_name,
        );

        Self {
            to: customer.email.clone(),
            reply_to: accountant.email.clone(),
            subject,
            plain_body,
            html_body,
        }
    }
}

#[derive(Clone)]
pub struct SmtpMailer {
    transport: SmtpTransport,
    from_email: String,
    portal_url: String,
}

impl SmtpMailer {
    pub fn new(config: &SmtpConfig, portal_url: &str) -> Result<Self, MailError> {
        let credentials = Credentials::new(config.user.clone(), config.password.clone());

        let transport = SmtpTransport::starttls_relay(&config.host)
            .map_err(|e| MailError::Transport(e.to_string()))?
            .port(config.port)
            .credentials(credentials)
            .timeout(Some(Duration::from_secs(10)))
            .build();

        tracing::info!(host = %config.host, port = config.port, "SMTP mailer initialized");

        Ok(Self {
            transport,
            from_email: config.from.clone(),
            portal_url: portal_url.to_string(),
        })
    }

    fn build_message(&self, invitation: &Invitation) -> Result<Message, MailError> {
        let address = |value: &str| {
            value
                .parse::<Mailbox>()
                .map_err(|e: lettre::address::AddressError| MailError::Address(e.to_string()))
        };

        Message::builder()
            .from(address(&self.from_email)?)
            .reply_to(address(&invitation.reply_to)?)
            .to(address(&invitation.to)?)
            .subject(invitation.subject.clone())
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(invitation.plain_body.clone()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(invitation.html_body.clone()),
                    ),
            )
            .map_err(|e| MailError::Build(e.to_string()))
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send_invitation(
        &self,
        accountant: &Accountant,
        customer: &Customer,
    ) -> Result<(), MailError> {
        let invitation = Invitation::compose(accountant, customer, &self.portal_url);
        let message = self.build_message(&invitation)?;

        // SmtpTransport is blocking
        let transport = self.transport.clone();
        let result = tokio::task::spawn_blocking(move || transport.send(&message))
            .await
            .map_err(|e| MailError::Transport(e.to_string()))?;

        match result {
            Ok(_) => {
                tracing::info!(to = %invitation.to, customer_id = %customer.id, "Invitation sent");
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, to = %invitation.to, "Failed to send invitation");
                Err(MailError::Transport(e.to_string()))
            }
        }
    }
}

/// Logs invitations instead of sending them.
#[derive(Debug, Clone)]
pub struct LogMailer {
    portal_url: String,
}

impl LogMailer {
    pub fn new(portal_url: &str) -> Self {
        Self {
            portal_url: portal_url.to_string(),
        }
    }
}

#[async_trait]
impl Mailer for LogMailer {
    async fn send_invitation(
        &self,
        accountant: &Accountant,
        customer: &Customer,
    ) -> Result<(), MailError> {
        let invitation = Invitation::compose(accountant, customer, &self.portal_url);

        tracing::info!(
            to = %invitation.to,
            reply_to = %invitation.reply_to,
            subject = %invitation.subject,
            body = %invitation.plain_body,
            "SMTP disabled, invitation logged only"
        );

        Ok(())
    }
}
