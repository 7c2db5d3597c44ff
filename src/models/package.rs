use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{blank_to_none, non_negative, not_blank, required, url_or_blank};
use crate::errors::AppError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Package {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub duration_days: i64,
    /// Comma-separated list.
    pub destinations: String,
    pub price: Decimal,
    pub includes: String,
    pub image_url: Option<String>,
    pub available: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct PackagePayload {
    #[validate(
        required(message = "This field is required."),
        length(max = 200),
        custom(function = "not_blank")
    )]
    pub name: Option<String>,
    #[validate(required(message = "This field is required."), custom(function = "not_blank"))]
    pub description: Option<String>,
    #[validate(required(message = "This field is required."), range(min = 1))]
    pub duration_days: Option<i64>,
    #[validate(required(message = "This field is required."), custom(function = "not_blank"))]
    pub destinations: Option<String>,
    #[validate(required(message = "This field is required."), custom(function = "non_negative"))]
    pub price: Option<Decimal>,
    #[validate(required(message = "This field is required."))]
    pub includes: Option<String>,
    #[validate(custom(function = "url_or_blank"))]
    pub image_url: Option<String>,
    pub available: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct NewPackage {
    pub name: String,
    pub description: String,
    pub duration_days: i64,
    pub destinations: String,
    pub price: Decimal,
    pub includes: String,
    pub image_url: Option<String>,
    pub available: bool,
}

impl PackagePayload {
    pub fn overlay(self, base: &Package) -> Self {
        Self {
            name: self.name.or_else(|| Some(base.name.clone())),
            description: self.description.or_else(|| Some(base.description.clone())),
            duration_days: self.duration_days.or(Some(base.duration_days)),
            destinations: self.destinations.or_else(|| Some(base.destinations.clone())),
            price: self.price.or(Some(base.price)),
            includes: self.includes.or_else(|| Some(base.includes.clone())),
            image_url: self.image_url.or_else(|| base.image_url.clone()),
            available: self.available.or(Some(base.available)),
        }
    }

    pub fn into_new(self) -> Result<NewPackage, AppError> {
        self.validate()?;
        Ok(NewPackage {
            name: required(self.name, "name")?,
            description: required(self.description, "description")?,
            duration_days: required(self.duration_days, "duration_days")?,
            destinations: required(self.destinations, "destinations")?,
            price: required(self.price, "price")?,
            includes: required(self.includes, "includes")?,
            image_url: blank_to_none(self.image_url),
            available: self.available.unwrap_or(true),
        })
    }
}
