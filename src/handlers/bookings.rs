use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, Method, StatusCode};
use axum::Json;
use rusqlite::Connection;

use super::auth::authorize;
use super::extract::JsonBody;
use crate::db::queries;
use crate::errors::AppError;
use crate::models::{Booking, BookingPayload, BookingStatus, NewBooking};
use crate::permissions::AccessPolicy;
use crate::state::AppState;

const POLICY: AccessPolicy = AccessPolicy::CreatePublic;
const INVALID_PK: &str = "Invalid pk - object does not exist.";

fn not_found(id: i64) -> AppError {
    AppError::NotFound(format!("booking {id}"))
}

fn check_references(conn: &Connection, booking: &NewBooking) -> Result<(), AppError> {
    if let Some(id) = booking.taxi {
        if queries::get_taxi(conn, id)?.is_none() {
            return Err(AppError::field("taxi", INVALID_PK));
        }
    }
    if let Some(id) = booking.cottage {
        if queries::get_cottage(conn, id)?.is_none() {
            return Err(AppError::field("cottage", INVALID_PK));
        }
    }
    if let Some(id) = booking.package {
        if queries::get_package(conn, id)?.is_none() {
            return Err(AppError::field("package", INVALID_PK));
        }
    }
    Ok(())
}

// GET /api/bookings
pub async fn list(
    State(state): State<Arc<AppState>>,
    method: Method,
    headers: HeaderMap,
) -> Result<Json<Vec<Booking>>, AppError> {
    authorize(&state, &method, &headers, POLICY)?;
    let db = state.conn()?;
    Ok(Json(queries::list_bookings(&db)?))
}

// GET /api/bookings/:id
pub async fn retrieve(
    State(state): State<Arc<AppState>>,
    method: Method,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<Json<Booking>, AppError> {
    authorize(&state, &method, &headers, POLICY)?;
    let db = state.conn()?;
    let booking = queries::get_booking(&db, id)?.ok_or_else(|| not_found(id))?;
    Ok(Json(booking))
}

// POST /api/bookings
//
// The record is committed before any notification is dispatched, and the
// response never waits on (or fails because of) a notification.
pub async fn create(
    State(state): State<Arc<AppState>>,
    method: Method,
    headers: HeaderMap,
    JsonBody(payload): JsonBody<BookingPayload>,
) -> Result<(StatusCode, Json<Booking>), AppError> {
    let authenticated = authorize(&state, &method, &headers, POLICY)?;

    let mut new = payload.into_new()?;
    if !authenticated {
        new.status = BookingStatus::Pending;
    }

    let booking = {
        let db = state.conn()?;
        check_references(&db, &new)?;
        queries::create_booking(&db, &new)?
    };

    tracing::info!(
        booking_id = booking.id,
        booking_type = booking.booking_type.as_str(),
        "booking created"
    );
    state.notifier.booking_created(&booking);

    Ok((StatusCode::CREATED, Json(booking)))
}

fn save(
    state: &AppState,
    id: i64,
    payload: BookingPayload,
    partial: bool,
) -> Result<Json<Booking>, AppError> {
    let db = state.conn()?;
    let existing = queries::get_booking(&db, id)?.ok_or_else(|| not_found(id))?;
    let payload = if partial { payload.overlay(&existing) } else { payload };
    let new = payload.into_new()?;
    check_references(&db, &new)?;
    let booking = queries::update_booking(&db, id, &new)?.ok_or_else(|| not_found(id))?;
    if booking.status != existing.status {
        tracing::info!(
            booking_id = id,
            from = existing.status.as_str(),
            to = booking.status.as_str(),
            "booking status changed"
        );
    }
    Ok(Json(booking))
}

// PUT /api/bookings/:id
pub async fn update(
    State(state): State<Arc<AppState>>,
    method: Method,
    headers: HeaderMap,
    Path(id): Path<i64>,
    JsonBody(payload): JsonBody<BookingPayload>,
) -> Result<Json<Booking>, AppError> {
    authorize(&state, &method, &headers, POLICY)?;
    save(&state, id, payload, false)
}

// PATCH /api/bookings/:id
pub async fn partial_update(
    State(state): State<Arc<AppState>>,
    method: Method,
    headers: HeaderMap,
    Path(id): Path<i64>,
    JsonBody(payload): JsonBody<BookingPayload>,
) -> Result<Json<Booking>, AppError> {
    authorize(&state, &method, &headers, POLICY)?;
    save(&state, id, payload, true)
}

// DELETE /api/bookings/:id
pub async fn destroy(
    State(state): State<Arc<AppState>>,
    method: Method,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    authorize(&state, &method, &headers, POLICY)?;
    let db = state.conn()?;
    if !queries::delete_booking(&db, id)? {
        return Err(not_found(id));
    }
    Ok(StatusCode::NO_CONTENT)
}
