pub mod content;
pub mod dispatch;
pub mod render;

use std::sync::Arc;

use crate::config::AppConfig;
use crate::models::{Booking, Contact, Subscriber};
use crate::services::email::smtp::SmtpEmailProvider;
use crate::services::email::{EmailProvider, OutboundEmail};
use crate::services::messaging::twilio::TwilioSmsProvider;
use crate::services::messaging::MessagingProvider;

use content::{Brand, Notification};
use dispatch::{spawn_detached, Channel, Job, Origin};

/// Email adapter. A missing provider means email is disabled.
pub async fn send_email(
    provider: Option<Arc<dyn EmailProvider>>,
    email: OutboundEmail,
) -> anyhow::Result<()> {
    let Some(provider) = provider else {
        tracing::info!(subject = %email.subject, "email delivery not configured, skipping");
        return Ok(());
    };
    provider.send(&email).await
}

/// SMS adapter. A missing provider means SMS is disabled.
pub async fn send_sms(
    provider: Option<Arc<dyn MessagingProvider>>,
    phone_number: String,
    message: String,
) -> anyhow::Result<()> {
    let Some(provider) = provider else {
        tracing::info!(to = %phone_number, "SMS delivery not configured, skipping");
        return Ok(());
    };
    provider.send_message(&phone_number, &message).await
}

/// Logs a content build failure; nothing is dispatched for that record.
fn rendered_or_log<T>(origin: Origin, rendered: anyhow::Result<T>) -> Option<T> {
    match rendered {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::error!(
                origin = %origin,
                error = %format!("{e:#}"),
                "failed to build notification content"
            );
            None
        }
    }
}

/// Fans out notifications for freshly persisted records.
///
/// Every method returns as soon as the deliveries are handed to the
/// dispatcher; none of them can fail from the caller's point of view.
#[derive(Clone)]
pub struct Notifier {
    email: Option<Arc<dyn EmailProvider>>,
    sms: Option<Arc<dyn MessagingProvider>>,
    admin_email: String,
    admin_phone: String,
    brand: Brand,
}

impl Notifier {
    pub fn new(
        config: &AppConfig,
        email: Option<Arc<dyn EmailProvider>>,
        sms: Option<Arc<dyn MessagingProvider>>,
    ) -> Self {
        Self {
            email,
            sms,
            admin_email: config.admin_email.clone(),
            admin_phone: config.admin_phone.clone(),
            brand: Brand::from_config(config),
        }
    }

    /// Builds the real providers for whichever channels are configured.
    pub fn from_config(config: &AppConfig) -> Self {
        let email: Option<Arc<dyn EmailProvider>> = if config.email_enabled() {
            match SmtpEmailProvider::from_config(config) {
                Ok(provider) => {
                    tracing::info!(host = %config.smtp_host, "email delivery enabled");
                    Some(Arc::new(provider))
                }
                Err(e) => {
                    tracing::error!(error = %format!("{e:#}"), "invalid SMTP configuration, email disabled");
                    None
                }
            }
        } else {
            tracing::warn!("SMTP_HOST not set, email delivery disabled");
            None
        };

        let sms: Option<Arc<dyn MessagingProvider>> = if config.sms_enabled() {
            match TwilioSmsProvider::from_config(config) {
                Ok(provider) => {
                    tracing::info!("SMS delivery enabled");
                    Some(Arc::new(provider))
                }
                Err(e) => {
                    tracing::error!(error = %format!("{e:#}"), "failed to set up Twilio client, SMS disabled");
                    None
                }
            }
        } else {
            tracing::warn!("Twilio credentials not set, SMS delivery disabled");
            None
        };

        Self::new(config, email, sms)
    }

    pub fn booking_created(&self, booking: &Booking) {
        let origin = Origin::booking(booking.id);
        let rendered = content::build_booking_admin_notification(&self.brand, booking).and_then(
            |admin| {
                let customer = content::build_booking_customer_notification(&self.brand, booking)?;
                Ok((admin, customer))
            },
        );
        let Some((admin, customer)) = rendered_or_log(origin, rendered) else {
            return;
        };

        self.dispatch_email(origin, booking.customer_email.clone(), &customer);
        self.dispatch_email(origin, self.admin_email.clone(), &admin);
        self.dispatch_sms(origin, self.admin_phone.clone(), admin.sms_body);
        if !booking.customer_phone.trim().is_empty() {
            self.dispatch_sms(origin, booking.customer_phone.clone(), customer.sms_body);
        }
    }

    pub fn contact_created(&self, contact: &Contact) {
        let origin = Origin::contact(contact.id);
        let rendered = content::build_contact_admin_notification(&self.brand, contact).and_then(
            |admin| {
                let customer = content::build_contact_customer_notification(&self.brand, contact)?;
                Ok((admin, customer))
            },
        );
        let Some((admin, customer)) = rendered_or_log(origin, rendered) else {
            return;
        };

        self.dispatch_email(origin, contact.email.clone(), &customer);
        self.dispatch_email(origin, self.admin_email.clone(), &admin);
        self.dispatch_sms(origin, self.admin_phone.clone(), admin.sms_body);
        if let Some(phone) = contact.phone.as_ref().filter(|p| !p.trim().is_empty()) {
            self.dispatch_sms(origin, phone.clone(), customer.sms_body);
        }
    }

    pub fn newsletter_subscribed(&self, subscriber: &Subscriber) {
        let origin = Origin::newsletter(subscriber.id);
        let rendered = content::build_newsletter_welcome_notification(&self.brand, subscriber);
        let Some(welcome) = rendered_or_log(origin, rendered) else {
            return;
        };
        self.dispatch_email(origin, subscriber.email.clone(), &welcome);
    }

    fn dispatch_email(&self, origin: Origin, recipient: String, notification: &Notification) {
        if recipient.trim().is_empty() {
            tracing::warn!(origin = %origin, subject = %notification.subject, "no email recipient configured, skipping");
            return;
        }

        let email = OutboundEmail {
            subject: notification.subject.clone(),
            text_body: notification.text_body.clone(),
            html_body: notification.html_body.clone(),
            recipients: vec![recipient.clone()],
        };
        let job = Job {
            channel: Channel::Email,
            recipient,
            origin,
        };
        spawn_detached(job, send_email(self.email.clone(), email));
    }

    fn dispatch_sms(&self, origin: Origin, phone_number: String, message: String) {
        if phone_number.trim().is_empty() {
            tracing::warn!(origin = %origin, "no SMS recipient configured, skipping");
            return;
        }

        let job = Job {
            channel: Channel::Sms,
            recipient: phone_number.clone(),
            origin,
        };
        spawn_detached(job, send_sms(self.sms.clone(), phone_number, message));
    }
}
