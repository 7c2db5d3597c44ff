use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{blank_to_none, non_negative, not_blank, required, url_or_blank};
use crate::errors::AppError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Taxi {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub vehicle_type: String,
    pub capacity: i64,
    pub price_per_km: Decimal,
    pub image_url: Option<String>,
    pub available: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct TaxiPayload {
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
        length(max = 100),
        custom(function = "not_blank")
    )]
    pub vehicle_type: Option<String>,
    #[validate(required(message = "This field is required."), range(min = 1))]
    pub capacity: Option<i64>,
    #[validate(required(message = "This field is required."), custom(function = "non_negative"))]
    pub price_per_km: Option<Decimal>,
    #[validate(custom(function = "url_or_blank"))]
    pub image_url: Option<String>,
    pub available: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct NewTaxi {
    pub name: String,
    pub description: String,
    pub vehicle_type: String,
    pub capacity: i64,
    pub price_per_km: Decimal,
    pub image_url: Option<String>,
    pub available: bool,
}

impl TaxiPayload {
    /// Fills every field the patch leaves out with the stored value.
    pub fn overlay(self, base: &Taxi) -> Self {
        Self {
            name: self.name.or_else(|| Some(base.name.clone())),
            description: self.description.or_else(|| Some(base.description.clone())),
            vehicle_type: self.vehicle_type.or_else(|| Some(base.vehicle_type.clone())),
            capacity: self.capacity.or(Some(base.capacity)),
            price_per_km: self.price_per_km.or(Some(base.price_per_km)),
            image_url: self.image_url.or_else(|| base.image_url.clone()),
            available: self.available.or(Some(base.available)),
        }
    }

    pub fn into_new(self) -> Result<NewTaxi, AppError> {
        self.validate()?;
        Ok(NewTaxi {
            name: required(self.name, "name")?,
            description: required(self.description, "description")?,
            vehicle_type: required(self.vehicle_type, "vehicle_type")?,
            capacity: required(self.capacity, "capacity")?,
            price_per_km: required(self.price_per_km, "price_per_km")?,
            image_url: blank_to_none(self.image_url),
            available: self.available.unwrap_or(true),
        })
    }
}
