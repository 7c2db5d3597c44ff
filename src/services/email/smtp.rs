use anyhow::Context;
use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use super::{EmailProvider, OutboundEmail};
use crate::config::AppConfig;

/// The display name is used verbatim; only the address has to parse.
fn sender_mailbox(name: &str, address: &str) -> anyhow::Result<Mailbox> {
    let address: Address = address
        .trim()
        .parse()
        .with_context(|| format!("invalid sender address: {address}"))?;
    let name = Some(name.trim().to_string()).filter(|n| !n.is_empty());
    Ok(Mailbox::new(name, address))
}

pub struct SmtpEmailProvider {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpEmailProvider {
    pub fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let builder = if config.smtp_use_tls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
                .context("failed to create SMTP relay")?
        } else {
            // Plain connection, e.g. a local Mailpit instance.
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.smtp_host)
        };

        let builder = builder.port(config.smtp_port);
        let transport = if config.smtp_username.is_empty() {
            builder.build()
        } else {
            builder
                .credentials(Credentials::new(
                    config.smtp_username.clone(),
                    config.smtp_password.clone(),
                ))
                .build()
        };

        let from = sender_mailbox(&config.email_from_name, &config.email_from_address)?;

        Ok(Self { transport, from })
    }

    fn build_message(&self, email: &OutboundEmail) -> anyhow::Result<Message> {
        let mut builder = Message::builder()
            .from(self.from.clone())
            .subject(&email.subject);

        for recipient in &email.recipients {
            let to: Mailbox = recipient
                .parse()
                .with_context(|| format!("invalid recipient address: {recipient}"))?;
            builder = builder.to(to);
        }

        builder
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(email.text_body.clone()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(email.html_body.clone()),
                    ),
            )
            .context("failed to build multipart message")
    }
}

#[async_trait]
impl EmailProvider for SmtpEmailProvider {
    async fn send(&self, email: &OutboundEmail) -> anyhow::Result<()> {
        anyhow::ensure!(!email.recipients.is_empty(), "email has no recipients");

        let message = self.build_message(email)?;
        self.transport
            .send(message)
            .await
            .context("failed to send email via SMTP")?;

        tracing::info!(
            recipients = %email.recipients.join(", "),
            subject = %email.subject,
            "email sent"
        );
        Ok(())
    }
}
