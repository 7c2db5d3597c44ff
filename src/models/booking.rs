use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use super::{blank_to_none, not_blank, required};
use crate::errors::AppError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: i64,
    pub booking_type: BookingType,
    pub customer_name: String,
    pub customer_email: String,
    /// May be empty; no customer SMS is sent in that case.
    pub customer_phone: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub number_of_guests: i64,
    pub special_requests: Option<String>,
    pub status: BookingStatus,
    pub taxi: Option<i64>,
    pub cottage: Option<i64>,
    pub package: Option<i64>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BookingType {
    Taxi,
    Cottage,
    Package,
}

impl BookingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingType::Taxi => "taxi",
            BookingType::Cottage => "cottage",
            BookingType::Package => "package",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "taxi" => Some(BookingType::Taxi),
            "cottage" => Some(BookingType::Cottage),
            "package" => Some(BookingType::Package),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(BookingStatus::Pending),
            "confirmed" => Some(BookingStatus::Confirmed),
            "cancelled" => Some(BookingStatus::Cancelled),
            _ => None,
        }
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
#[validate(schema(function = "validate_date_range"))]
pub struct BookingPayload {
    #[validate(required(message = "This field is required."))]
    pub booking_type: Option<BookingType>,
    #[validate(
        required(message = "This field is required."),
        length(max = 200),
        custom(function = "not_blank")
    )]
    pub customer_name: Option<String>,
    #[validate(
        required(message = "This field is required."),
        email(message = "Enter a valid email address.")
    )]
    pub customer_email: Option<String>,
    #[validate(length(max = 20))]
    pub customer_phone: Option<String>,
    #[validate(required(message = "This field is required."))]
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    #[validate(range(min = 1, message = "Ensure this value is greater than or equal to 1."))]
    pub number_of_guests: Option<i64>,
    pub special_requests: Option<String>,
    pub status: Option<BookingStatus>,
    pub taxi: Option<i64>,
    pub cottage: Option<i64>,
    pub package: Option<i64>,
}

fn validate_date_range(payload: &BookingPayload) -> Result<(), ValidationError> {
    if let (Some(start), Some(end)) = (payload.start_date, payload.end_date) {
        if end < start {
            let mut err = ValidationError::new("date_range");
            err.message = Some("end_date must not be before start_date.".into());
            return Err(err);
        }
    }
    Ok(())
}

#[derive(Debug, Clone)]
pub struct NewBooking {
    pub booking_type: BookingType,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub number_of_guests: i64,
    pub special_requests: Option<String>,
    pub status: BookingStatus,
    pub taxi: Option<i64>,
    pub cottage: Option<i64>,
    pub package: Option<i64>,
}

impl BookingPayload {
    pub fn overlay(self, base: &Booking) -> Self {
        Self {
            booking_type: self.booking_type.or(Some(base.booking_type)),
            customer_name: self.customer_name.or_else(|| Some(base.customer_name.clone())),
            customer_email: self.customer_email.or_else(|| Some(base.customer_email.clone())),
            customer_phone: self.customer_phone.or_else(|| Some(base.customer_phone.clone())),
            start_date: self.start_date.or(Some(base.start_date)),
            end_date: self.end_date.or(base.end_date),
            number_of_guests: self.number_of_guests.or(Some(base.number_of_guests)),
            special_requests: self.special_requests.or_else(|| base.special_requests.clone()),
            status: self.status.or(Some(base.status)),
            taxi: self.taxi.or(base.taxi),
            cottage: self.cottage.or(base.cottage),
            package: self.package.or(base.package),
        }
    }

    pub fn into_new(self) -> Result<NewBooking, AppError> {
        self.validate()?;
        Ok(NewBooking {
            booking_type: required(self.booking_type, "booking_type")?,
            customer_name: required(self.customer_name, "customer_name")?.trim().to_string(),
            customer_email: required(self.customer_email, "customer_email")?.trim().to_string(),
            customer_phone: self.customer_phone.unwrap_or_default().trim().to_string(),
            start_date: required(self.start_date, "start_date")?,
            end_date: self.end_date,
            number_of_guests: self.number_of_guests.unwrap_or(1),
            special_requests: blank_to_none(self.special_requests),
            status: self.status.unwrap_or(BookingStatus::Pending),
            taxi: self.taxi,
            cottage: self.cottage,
            package: self.package,
        })
    }
}
