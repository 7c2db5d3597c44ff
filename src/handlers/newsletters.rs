use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, Method, StatusCode};
use axum::Json;

use super::auth::authorize;
use super::extract::JsonBody;
use crate::db::queries;
use crate::errors::AppError;
use crate::models::newsletter::normalize_email;
use crate::models::{Subscriber, SubscriberPayload};
use crate::permissions::AccessPolicy;
use crate::state::AppState;

const POLICY: AccessPolicy = AccessPolicy::CreatePublic;

pub const ALREADY_SUBSCRIBED: &str = "You are already subscribed to our newsletter!";
pub const SUBSCRIBED: &str = "Successfully subscribed to our newsletter!";

fn not_found(id: i64) -> AppError {
    AppError::NotFound(format!("subscriber {id}"))
}

// GET /api/newsletters
pub async fn list(
    State(state): State<Arc<AppState>>,
    method: Method,
    headers: HeaderMap,
) -> Result<Json<Vec<Subscriber>>, AppError> {
    authorize(&state, &method, &headers, POLICY)?;
    let db = state.conn()?;
    Ok(Json(queries::list_subscribers(&db)?))
}

// GET /api/newsletters/:id
pub async fn retrieve(
    State(state): State<Arc<AppState>>,
    method: Method,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<Json<Subscriber>, AppError> {
    authorize(&state, &method, &headers, POLICY)?;
    let db = state.conn()?;
    let subscriber = queries::get_subscriber(&db, id)?.ok_or_else(|| not_found(id))?;
    Ok(Json(subscriber))
}

enum Outcome {
    AlreadySubscribed,
    Subscribed(Subscriber),
}

// POST /api/newsletters
pub async fn create(
    State(state): State<Arc<AppState>>,
    method: Method,
    headers: HeaderMap,
    JsonBody(payload): JsonBody<SubscriberPayload>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    authorize(&state, &method, &headers, POLICY)?;

    let email = payload
        .email
        .as_deref()
        .map(normalize_email)
        .filter(|e| !e.is_empty())
        .ok_or_else(|| AppError::BadRequest("Email is required".to_string()))?;

    // Lookup and insert happen under one lock so concurrent duplicates collapse.
    let outcome = {
        let db = state.conn()?;
        match queries::find_subscriber_by_email(&db, &email)? {
            Some(existing) if existing.is_active => Outcome::AlreadySubscribed,
            Some(existing) => {
                let subscriber = queries::reactivate_subscriber(&db, existing.id)?
                    .ok_or_else(|| not_found(existing.id))?;
                Outcome::Subscribed(subscriber)
            }
            None => {
                let new = SubscriberPayload {
                    email: Some(email),
                    is_active: Some(true),
                }
                .into_new()?;
                Outcome::Subscribed(queries::create_subscriber(&db, &new)?)
            }
        }
    };

    match outcome {
        Outcome::AlreadySubscribed => {
            tracing::info!("newsletter subscription repeated, ignoring");
            Ok((
                StatusCode::OK,
                Json(serde_json::json!({ "message": ALREADY_SUBSCRIBED })),
            ))
        }
        Outcome::Subscribed(subscriber) => {
            tracing::info!(subscriber_id = subscriber.id, "newsletter subscription created");
            state.notifier.newsletter_subscribed(&subscriber);
            Ok((
                StatusCode::CREATED,
                Json(serde_json::json!({ "message": SUBSCRIBED })),
            ))
        }
    }
}

fn save(
    state: &AppState,
    id: i64,
    payload: SubscriberPayload,
    partial: bool,
) -> Result<Json<Subscriber>, AppError> {
    let db = state.conn()?;
    let existing = queries::get_subscriber(&db, id)?.ok_or_else(|| not_found(id))?;
    let payload = if partial { payload.overlay(&existing) } else { payload };
    let new = payload.into_new()?;
    let subscriber = queries::update_subscriber(&db, id, &new)?.ok_or_else(|| not_found(id))?;
    Ok(Json(subscriber))
}

// PUT /api/newsletters/:id
pub async fn update(
    State(state): State<Arc<AppState>>,
    method: Method,
    headers: HeaderMap,
    Path(id): Path<i64>,
    JsonBody(payload): JsonBody<SubscriberPayload>,
) -> Result<Json<Subscriber>, AppError> {
    authorize(&state, &method, &headers, POLICY)?;
    save(&state, id, payload, false)
}

// PATCH /api/newsletters/:id
pub async fn partial_update(
    State(state): State<Arc<AppState>>,
    method: Method,
    headers: HeaderMap,
    Path(id): Path<i64>,
    JsonBody(payload): JsonBody<SubscriberPayload>,
) -> Result<Json<Subscriber>, AppError> {
    authorize(&state, &method, &headers, POLICY)?;
    save(&state, id, payload, true)
}

// DELETE /api/newsletters/:id
pub async fn destroy(
    State(state): State<Arc<AppState>>,
    method: Method,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    authorize(&state, &method, &headers, POLICY)?;
    let db = state.conn()?;
    if !queries::delete_subscriber(&db, id)? {
        return Err(not_found(id));
    }
    Ok(StatusCode::NO_CONTENT)
}
