use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::required;
use crate::errors::AppError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subscriber {
    pub id: i64,
    pub email: String,
    pub subscribed_at: NaiveDateTime,
    pub is_active: bool,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct SubscriberPayload {
    #[validate(
        required(message = "This field is required."),
        email(message = "Enter a valid email address.")
    )]
    pub email: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct NewSubscriber {
    pub email: String,
    pub is_active: bool,
}

/// Subscriber emails are compared case-insensitively.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

impl SubscriberPayload {
    pub fn overlay(self, base: &Subscriber) -> Self {
        Self {
            email: self.email.or_else(|| Some(base.email.clone())),
            is_active: self.is_active.or(Some(base.is_active)),
        }
    }

    pub fn into_new(self) -> Result<NewSubscriber, AppError> {
        let payload = Self {
            email: self.email.map(|e| normalize_email(&e)),
            is_active: self.is_active,
        };
        payload.validate()?;
        Ok(NewSubscriber {
            email: required(payload.email, "email")?,
            is_active: payload.is_active.unwrap_or(true),
        })
    }
}
