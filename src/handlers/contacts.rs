use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, Method, StatusCode};
use axum::Json;

use super::auth::authorize;
use super::extract::JsonBody;
use crate::db::queries;
use crate::errors::AppError;
use crate::models::{Contact, ContactPayload};
use crate::permissions::AccessPolicy;
use crate::state::AppState;

const POLICY: AccessPolicy = AccessPolicy::CreatePublic;

fn not_found(id: i64) -> AppError {
    AppError::NotFound(format!("contact {id}"))
}

// GET /api/contacts
pub async fn list(
    State(state): State<Arc<AppState>>,
    method: Method,
    headers: HeaderMap,
) -> Result<Json<Vec<Contact>>, AppError> {
    authorize(&state, &method, &headers, POLICY)?;
    let db = state.conn()?;
    Ok(Json(queries::list_contacts(&db)?))
}

// GET /api/contacts/:id
pub async fn retrieve(
    State(state): State<Arc<AppState>>,
    method: Method,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<Json<Contact>, AppError> {
    authorize(&state, &method, &headers, POLICY)?;
    let db = state.conn()?;
    let contact = queries::get_contact(&db, id)?.ok_or_else(|| not_found(id))?;
    Ok(Json(contact))
}

// POST /api/contacts
pub async fn create(
    State(state): State<Arc<AppState>>,
    method: Method,
    headers: HeaderMap,
    JsonBody(payload): JsonBody<ContactPayload>,
) -> Result<(StatusCode, Json<Contact>), AppError> {
    authorize(&state, &method, &headers, POLICY)?;
    let new = payload.into_new()?;
    let contact = {
        let db = state.conn()?;
        queries::create_contact(&db, &new)?
    };

    tracing::info!(contact_id = contact.id, "contact inquiry created");
    state.notifier.contact_created(&contact);

    Ok((StatusCode::CREATED, Json(contact)))
}

fn save(
    state: &AppState,
    id: i64,
    payload: ContactPayload,
    partial: bool,
) -> Result<Json<Contact>, AppError> {
    let db = state.conn()?;
    let existing = queries::get_contact(&db, id)?.ok_or_else(|| not_found(id))?;
    let payload = if partial { payload.overlay(&existing) } else { payload };
    let new = payload.into_new()?;
    let contact = queries::update_contact(&db, id, &new)?.ok_or_else(|| not_found(id))?;
    Ok(Json(contact))
}

// PUT /api/contacts/:id
pub async fn update(
    State(state): State<Arc<AppState>>,
    method: Method,
    headers: HeaderMap,
    Path(id): Path<i64>,
    JsonBody(payload): JsonBody<ContactPayload>,
) -> Result<Json<Contact>, AppError> {
    authorize(&state, &method, &headers, POLICY)?;
    save(&state, id, payload, false)
}

// PATCH /api/contacts/:id
pub async fn partial_update(
    State(state): State<Arc<AppState>>,
    method: Method,
    headers: HeaderMap,
    Path(id): Path<i64>,
    JsonBody(payload): JsonBody<ContactPayload>,
) -> Result<Json<Contact>, AppError> {
    authorize(&state, &method, &headers, POLICY)?;
    save(&state, id, payload, true)
}

// DELETE /api/contacts/:id
pub async fn destroy(
    State(state): State<Arc<AppState>>,
    method: Method,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    authorize(&state, &method, &headers, POLICY)?;
    let db = state.conn()?;
    if !queries::delete_contact(&db, id)? {
        return Err(not_found(id));
    }
    Ok(StatusCode::NO_CONTENT)
}
