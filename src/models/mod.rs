pub mod booking;
pub mod contact;
pub mod cottage;
pub mod newsletter;
pub mod package;
pub mod taxi;

pub use booking::{Booking, BookingPayload, BookingStatus, BookingType, NewBooking};
pub use contact::{Contact, ContactPayload, NewContact};
pub use cottage::{Cottage, CottagePayload, NewCottage};
pub use newsletter::{NewSubscriber, Subscriber, SubscriberPayload};
pub use package::{NewPackage, Package, PackagePayload};
pub use taxi::{NewTaxi, Taxi, TaxiPayload};

use rust_decimal::Decimal;
use validator::{ValidateUrl, ValidationError};

use crate::errors::AppError;

pub const REQUIRED: &str = "This field is required.";

/// Unwraps a field that validation has already checked for presence.
pub(crate) fn required<T>(value: Option<T>, field: &'static str) -> Result<T, AppError> {
    value.ok_or_else(|| AppError::field(field, REQUIRED))
}

pub(crate) fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("This field may not be blank.".into());
        return Err(err);
    }
    Ok(())
}

pub(crate) fn non_negative(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() {
        let mut err = ValidationError::new("range");
        err.message = Some("Ensure this value is greater than or equal to 0.".into());
        return Err(err);
    }
    Ok(())
}

pub(crate) fn url_or_blank(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() || value.validate_url() {
        return Ok(());
    }
    let mut err = ValidationError::new("url");
    err.message = Some("Enter a valid URL.".into());
    Err(err)
}

/// Blank optional text is stored as NULL.
pub(crate) fn blank_to_none(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
