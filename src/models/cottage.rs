use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{blank_to_none, non_negative, not_blank, required, url_or_blank};
use crate::errors::AppError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cottage {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub location: String,
    pub bedrooms: i64,
    pub max_guests: i64,
    pub price_per_night: Decimal,
    /// Comma-separated list.
    pub amenities: String,
    pub image_url: Option<String>,
    pub available: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct CottagePayload {
    #[validate(
        required(message = "This field is required."),
        length(max = 200),
        custom(function = "not_blank")
    )]
    pub name: Option<String>,
    #[validate(required(message = "This field is required."), custom(function = "not_blank"))]
    pub description: Option<String>,
    #[validate(
        required(message = "This field is required."),
        length(max = 300),
        custom(function = "not_blank")
    )]
    pub location: Option<String>,
    #[validate(required(message = "This field is required."), range(min = 0))]
    pub bedrooms: Option<i64>,
    #[validate(required(message = "This field is required."), range(min = 1))]
    pub max_guests: Option<i64>,
    #[validate(required(message = "This field is required."), custom(function = "non_negative"))]
    pub price_per_night: Option<Decimal>,
    #[validate(required(message = "This field is required."))]
    pub amenities: Option<String>,
    #[validate(custom(function = "url_or_blank"))]
    pub image_url: Option<String>,
    pub available: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct NewCottage {
    pub name: String,
    pub description: String,
    pub location: String,
    pub bedrooms: i64,
    pub max_guests: i64,
    pub price_per_night: Decimal,
    pub amenities: String,
    pub image_url: Option<String>,
    pub available: bool,
}

impl CottagePayload {
    pub fn overlay(self, base: &Cottage) -> Self {
        Self {
            name: self.name.or_else(|| Some(base.name.clone())),
            description: self.description.or_else(|| Some(base.description.clone())),
            location: self.location.or_else(|| Some(base.location.clone())),
            bedrooms: self.bedrooms.or(Some(base.bedrooms)),
            max_guests: self.max_guests.or(Some(base.max_guests)),
            price_per_night: self.price_per_night.or(Some(base.price_per_night)),
            amenities: self.amenities.or_else(|| Some(base.amenities.clone())),
            image_url: self.image_url.or_else(|| base.image_url.clone()),
            available: self.available.or(Some(base.available)),
        }
    }

    pub fn into_new(self) -> Result<NewCottage, AppError> {
        self.validate()?;
        Ok(NewCottage {
            name: required(self.name, "name")?,
            description: required(self.description, "description")?,
            location: required(self.location, "location")?,
            bedrooms: required(self.bedrooms, "bedrooms")?,
            max_guests: required(self.max_guests, "max_guests")?,
            price_per_night: required(self.price_per_night, "price_per_night")?,
            amenities: required(self.amenities, "amenities")?,
            image_url: blank_to_none(self.image_url),
            available: self.available.unwrap_or(true),
        })
    }
}
