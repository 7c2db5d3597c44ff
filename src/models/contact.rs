use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{blank_to_none, not_blank, required};
use crate::errors::AppError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contact {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub subject: String,
    pub message: String,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct ContactPayload {
    #[validate(
        required(message = "This field is required."),
        length(max = 200),
        custom(function = "not_blank")
    )]
    pub name: Option<String>,
    #[validate(
        required(message = "This field is required."),
        email(message = "Enter a valid email address.")
    )]
    pub email: Option<String>,
    #[validate(length(max = 20))]
    pub phone: Option<String>,
    #[validate(
        required(message = "This field is required."),
        length(max = 300),
        custom(function = "not_blank")
    )]
    pub subject: Option<String>,
    #[validate(required(message = "This field is required."), custom(function = "not_blank"))]
    pub message: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewContact {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub subject: String,
    pub message: String,
}

impl ContactPayload {
    pub fn overlay(self, base: &Contact) -> Self {
        Self {
            name: self.name.or_else(|| Some(base.name.clone())),
            email: self.email.or_else(|| Some(base.email.clone())),
            phone: self.phone.or_else(|| base.phone.clone()),
            subject: self.subject.or_else(|| Some(base.subject.clone())),
            message: self.message.or_else(|| Some(base.message.clone())),
        }
    }

    pub fn into_new(self) -> Result<NewContact, AppError> {
        self.validate()?;
        Ok(NewContact {
            name: required(self.name, "name")?.trim().to_string(),
            email: required(self.email, "email")?.trim().to_string(),
            phone: blank_to_none(self.phone).map(|p| p.trim().to_string()),
            subject: required(self.subject, "subject")?,
            message: required(self.message, "message")?,
        })
    }
}
