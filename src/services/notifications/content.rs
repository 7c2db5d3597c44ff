use crate::config::AppConfig;
use crate::models::{Booking, Contact, Subscriber};

use super::render::{Block, Document, Field};

const NO_SPECIAL_REQUESTS: &str = "No special requests provided.";
const NOT_AVAILABLE: &str = "N/A";

/// Everything needed to deliver one notification over either channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub subject: String,
    pub text_body: String,
    pub html_body: String,
    pub sms_body: String,
}

impl Notification {
    fn from_document(
        subject: String,
        doc: &Document,
        sms_body: String,
    ) -> anyhow::Result<Self> {
        Ok(Self {
            subject,
            text_body: doc.render_text()?,
            html_body: doc.render_html()?,
            sms_body,
        })
    }
}

#[derive(Debug, Clone)]
pub struct Brand {
    pub name: String,
    pub support_phone: String,
}

impl Brand {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            name: config.business_name.clone(),
            support_phone: config.support_phone.clone(),
        }
    }

    fn copyright(&self) -> String {
        format!("© {}. All rights reserved.", self.name)
    }

    fn urgent_contact_line(&self) -> Option<String> {
        if self.support_phone.is_empty() {
            return None;
        }
        Some(format!(
            "If you have any urgent questions, please reply to this email or call us at {}.",
            self.support_phone
        ))
    }
}

/// First whitespace-separated token of a name, upper-cased.
pub fn greeting_name(full_name: &str) -> String {
    full_name
        .split_whitespace()
        .next()
        .unwrap_or(full_name)
        .to_uppercase()
}

fn or_na(value: Option<String>) -> String {
    value
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

pub fn build_booking_admin_notification(
    brand: &Brand,
    booking: &Booking,
) -> anyhow::Result<Notification> {
    let booking_type = booking.booking_type.as_str();
    let end_date = or_na(booking.end_date.map(|d| d.to_string()));
    let special_requests = booking
        .special_requests
        .clone()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| NO_SPECIAL_REQUESTS.to_string());

    let doc = Document {
        brand: brand.name.clone(),
        tagline: Some("Admin Notification".to_string()),
        heading: "NEW BOOKING DETAILS".to_string(),
        blocks: vec![
            Block::Fields {
                title: format!("Booking #{}", booking.id),
                rows: vec![
                    Field::new("Booking Type", booking_type.to_string()),
                    Field::new("Customer", booking.customer_name.clone()),
                    Field::new("Email", booking.customer_email.clone()),
                    Field::new("Phone", or_na(Some(booking.customer_phone.clone()))),
                    Field::new("Start Date", booking.start_date.to_string()),
                    Field::new("End Date", end_date.clone()),
                    Field::new("Guests", booking.number_of_guests.to_string()),
                ],
            },
            Block::Section {
                title: "SPECIAL REQUESTS".to_string(),
                body: special_requests,
            },
        ],
        footer: vec![
            "This is an automated notification from your booking system.".to_string(),
            brand.copyright(),
        ],
    };

    let subject = format!(
        "NEW {} BOOKING REQUEST - {}",
        booking_type.to_uppercase(),
        booking.customer_name.to_uppercase()
    );
    let sms_body = format!(
        "New {booking_type} booking #{}: {} ({}), {} to {}, {} guest(s).",
        booking.id,
        booking.customer_name,
        or_na(Some(booking.customer_phone.clone())),
        booking.start_date,
        end_date,
        booking.number_of_guests
    );

    Notification::from_document(subject, &doc, sms_body)
}

pub fn build_booking_customer_notification(
    brand: &Brand,
    booking: &Booking,
) -> anyhow::Result<Notification> {
    let first_name = greeting_name(&booking.customer_name);
    let booking_type = booking.booking_type.as_str();

    let mut blocks = vec![
        Block::Paragraph(format!(
            "We have received your request for a {booking_type}. Our concierge team is currently \
             reviewing your details and will contact you within 24 hours to finalize your reservation."
        )),
        Block::Badge("Request Status: Pending Confirmation".to_string()),
    ];
    if let Some(line) = brand.urgent_contact_line() {
        blocks.push(Block::Paragraph(line));
    }

    let doc = Document {
        brand: brand.name.clone(),
        tagline: Some("Premium Travel Experiences".to_string()),
        heading: format!("THANK YOU, {first_name}!"),
        blocks,
        footer: vec![brand.copyright()],
    };

    let subject = format!("BOOKING RECEIVED - {}", brand.name.to_uppercase());
    let sms_body = format!(
        "Hi {first_name}, we received your {booking_type} booking request for {}. \
         Our team will contact you within 24 hours. - {}",
        booking.start_date, brand.name
    );

    Notification::from_document(subject, &doc, sms_body)
}

pub fn build_contact_admin_notification(
    brand: &Brand,
    contact: &Contact,
) -> anyhow::Result<Notification> {
    let doc = Document {
        brand: brand.name.clone(),
        tagline: Some("Contact Request".to_string()),
        heading: "INQUIRY DETAILS".to_string(),
        blocks: vec![
            Block::Fields {
                title: format!("Inquiry #{}", contact.id),
                rows: vec![
                    Field::new("Name", contact.name.clone()),
                    Field::new("Email", contact.email.clone()),
                    Field::new("Phone", or_na(contact.phone.clone())),
                    Field::new("Subject", contact.subject.clone()),
                ],
            },
            Block::Section {
                title: "MESSAGE".to_string(),
                body: contact.message.clone(),
            },
        ],
        footer: vec![brand.copyright()],
    };

    let subject = format!("NEW CONTACT INQUIRY - {}", contact.name.to_uppercase());
    let sms_body = format!(
        "New inquiry #{} from {} ({}): {}",
        contact.id, contact.name, contact.email, contact.subject
    );

    Notification::from_document(subject, &doc, sms_body)
}

pub fn build_contact_customer_notification(
    brand: &Brand,
    contact: &Contact,
) -> anyhow::Result<Notification> {
    let first_name = greeting_name(&contact.name);

    let mut blocks = vec![Block::Paragraph(format!(
        "Thank you for reaching out to {}. We have received your message regarding \"{}\". \
         Our team will get back to you as soon as possible.",
        brand.name, contact.subject
    ))];
    if let Some(line) = brand.urgent_contact_line() {
        blocks.push(Block::Paragraph(line));
    }

    let doc = Document {
        brand: brand.name.clone(),
        tagline: None,
        heading: format!("HELLO {first_name},"),
        blocks,
        footer: vec![format!("{} - Premium Travel Experiences", brand.name)],
    };

    let subject = format!("WE HAVE RECEIVED YOUR MESSAGE - {}", brand.name.to_uppercase());
    let sms_body = format!(
        "Hi {first_name}, thanks for contacting {}. We received your message about \"{}\" \
         and will get back to you soon.",
        brand.name, contact.subject
    );

    Notification::from_document(subject, &doc, sms_body)
}

pub fn build_newsletter_welcome_notification(
    brand: &Brand,
    subscriber: &Subscriber,
) -> anyhow::Result<Notification> {
    let doc = Document {
        brand: brand.name.clone(),
        tagline: Some("Newsletter".to_string()),
        heading: "WELCOME ABOARD!".to_string(),
        blocks: vec![Block::Paragraph(
            "Thank you for subscribing to our newsletter. You will now receive exclusive updates \
             and hidden gems directly to your inbox."
                .to_string(),
        )],
        footer: vec![
            format!("You are receiving this because {} subscribed.", subscriber.email),
            brand.copyright(),
        ],
    };

    let subject = format!("Welcome to {} Newsletter!", brand.name);
    Notification::from_document(subject, &doc, String::new())
}
