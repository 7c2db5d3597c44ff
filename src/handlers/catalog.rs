//! CRUD handlers shared by the catalog resources (taxis, cottages, packages).
//!
//! Reads are public, writes need the admin token.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, Method, StatusCode};
use axum::routing::get;
use axum::{Json, Router};
use rusqlite::Connection;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::auth::authorize;
use super::extract::JsonBody;
use crate::db::queries;
use crate::errors::AppError;
use crate::models::{
    Cottage, CottagePayload, NewCottage, NewPackage, NewTaxi, Package, PackagePayload, Taxi,
    TaxiPayload,
};
use crate::permissions::AccessPolicy;
use crate::state::AppState;

const POLICY: AccessPolicy = AccessPolicy::ReadOnlyPublic;

/// A catalog record type together with its payload and storage functions.
pub trait CatalogItem: Serialize + Send + Sized + 'static {
    const KIND: &'static str;

    type Payload: DeserializeOwned + Send + 'static;
    type New;

    fn id(&self) -> i64;
    fn overlay(payload: Self::Payload, existing: &Self) -> Self::Payload;
    fn validate(payload: Self::Payload) -> Result<Self::New, AppError>;

    fn list(conn: &Connection) -> anyhow::Result<Vec<Self>>;
    fn get(conn: &Connection, id: i64) -> anyhow::Result<Option<Self>>;
    fn insert(conn: &Connection, new: &Self::New) -> anyhow::Result<Self>;
    fn update(conn: &Connection, id: i64, new: &Self::New) -> anyhow::Result<Option<Self>>;
    fn delete(conn: &Connection, id: i64) -> anyhow::Result<bool>;
}

impl CatalogItem for Taxi {
    const KIND: &'static str = "taxi";

    type Payload = TaxiPayload;
    type New = NewTaxi;

    fn id(&self) -> i64 {
        self.id
    }

    fn overlay(payload: TaxiPayload, existing: &Self) -> TaxiPayload {
        payload.overlay(existing)
    }

    fn validate(payload: TaxiPayload) -> Result<NewTaxi, AppError> {
        payload.into_new()
    }

    fn list(conn: &Connection) -> anyhow::Result<Vec<Self>> {
        queries::list_taxis(conn)
    }

    fn get(conn: &Connection, id: i64) -> anyhow::Result<Option<Self>> {
        queries::get_taxi(conn, id)
    }

    fn insert(conn: &Connection, new: &NewTaxi) -> anyhow::Result<Self> {
        queries::create_taxi(conn, new)
    }

    fn update(conn: &Connection, id: i64, new: &NewTaxi) -> anyhow::Result<Option<Self>> {
        queries::update_taxi(conn, id, new)
    }

    fn delete(conn: &Connection, id: i64) -> anyhow::Result<bool> {
        queries::delete_taxi(conn, id)
    }
}

impl CatalogItem for Cottage {
    const KIND: &'static str = "cottage";

    type Payload = CottagePayload;
    type New = NewCottage;

    fn id(&self) -> i64 {
        self.id
    }

    fn overlay(payload: CottagePayload, existing: &Self) -> CottagePayload {
        payload.overlay(existing)
    }

    fn validate(payload: CottagePayload) -> Result<NewCottage, AppError> {
        payload.into_new()
    }

    fn list(conn: &Connection) -> anyhow::Result<Vec<Self>> {
        queries::list_cottages(conn)
    }

    fn get(conn: &Connection, id: i64) -> anyhow::Result<Option<Self>> {
        queries::get_cottage(conn, id)
    }

    fn insert(conn: &Connection, new: &NewCottage) -> anyhow::Result<Self> {
        queries::create_cottage(conn, new)
    }

    fn update(conn: &Connection, id: i64, new: &NewCottage) -> anyhow::Result<Option<Self>> {
        queries::update_cottage(conn, id, new)
    }

    fn delete(conn: &Connection, id: i64) -> anyhow::Result<bool> {
        queries::delete_cottage(conn, id)
    }
}

impl CatalogItem for Package {
    const KIND: &'static str = "package";

    type Payload = PackagePayload;
    type New = NewPackage;

    fn id(&self) -> i64 {
        self.id
    }

    fn overlay(payload: PackagePayload, existing: &Self) -> PackagePayload {
        payload.overlay(existing)
    }

    fn validate(payload: PackagePayload) -> Result<NewPackage, AppError> {
        payload.into_new()
    }

    fn list(conn: &Connection) -> anyhow::Result<Vec<Self>> {
        queries::list_packages(conn)
    }

    fn get(conn: &Connection, id: i64) -> anyhow::Result<Option<Self>> {
        queries::get_package(conn, id)
    }

    fn insert(conn: &Connection, new: &NewPackage) -> anyhow::Result<Self> {
        queries::create_package(conn, new)
    }

    fn update(conn: &Connection, id: i64, new: &NewPackage) -> anyhow::Result<Option<Self>> {
        queries::update_package(conn, id, new)
    }

    fn delete(conn: &Connection, id: i64) -> anyhow::Result<bool> {
        queries::delete_package(conn, id)
    }
}

fn not_found<T: CatalogItem>(id: i64) -> AppError {
    AppError::NotFound(format!("{} {id}", T::KIND))
}

/// `GET|POST {base}` and `GET|PUT|PATCH|DELETE {base}/:id` for one catalog type.
pub fn routes<T: CatalogItem>(base: &str) -> Router<Arc<AppState>> {
    Router::new()
        .route(base, get(list::<T>).post(create::<T>))
        .route(
            &format!("{base}/:id"),
            get(retrieve::<T>)
                .put(update::<T>)
                .patch(partial_update::<T>)
                .delete(destroy::<T>),
        )
}

pub async fn list<T: CatalogItem>(
    State(state): State<Arc<AppState>>,
    method: Method,
    headers: HeaderMap,
) -> Result<Json<Vec<T>>, AppError> {
    authorize(&state, &method, &headers, POLICY)?;
    let db = state.conn()?;
    Ok(Json(T::list(&db)?))
}

pub async fn retrieve<T: CatalogItem>(
    State(state): State<Arc<AppState>>,
    method: Method,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<Json<T>, AppError> {
    authorize(&state, &method, &headers, POLICY)?;
    let db = state.conn()?;
    let item = T::get(&db, id)?.ok_or_else(|| not_found::<T>(id))?;
    Ok(Json(item))
}

pub async fn create<T: CatalogItem>(
    State(state): State<Arc<AppState>>,
    method: Method,
    headers: HeaderMap,
    JsonBody(payload): JsonBody<T::Payload>,
) -> Result<(StatusCode, Json<T>), AppError> {
    authorize(&state, &method, &headers, POLICY)?;
    let new = T::validate(payload)?;
    let item = {
        let db = state.conn()?;
        T::insert(&db, &new)?
    };
    tracing::info!(kind = T::KIND, id = item.id(), "catalog item created");
    Ok((StatusCode::CREATED, Json(item)))
}

fn save<T: CatalogItem>(
    state: &AppState,
    id: i64,
    payload: T::Payload,
    partial: bool,
) -> Result<Json<T>, AppError> {
    let db = state.conn()?;
    let existing = T::get(&db, id)?.ok_or_else(|| not_found::<T>(id))?;
    let payload = if partial { T::overlay(payload, &existing) } else { payload };
    let new = T::validate(payload)?;
    let item = T::update(&db, id, &new)?.ok_or_else(|| not_found::<T>(id))?;
    Ok(Json(item))
}

pub async fn update<T: CatalogItem>(
    State(state): State<Arc<AppState>>,
    method: Method,
    headers: HeaderMap,
    Path(id): Path<i64>,
    JsonBody(payload): JsonBody<T::Payload>,
) -> Result<Json<T>, AppError> {
    authorize(&state, &method, &headers, POLICY)?;
    save::<T>(&state, id, payload, false)
}

pub async fn partial_update<T: CatalogItem>(
    State(state): State<Arc<AppState>>,
    method: Method,
    headers: HeaderMap,
    Path(id): Path<i64>,
    JsonBody(payload): JsonBody<T::Payload>,
) -> Result<Json<T>, AppError> {
    authorize(&state, &method, &headers, POLICY)?;
    save::<T>(&state, id, payload, true)
}

pub async fn destroy<T: CatalogItem>(
    State(state): State<Arc<AppState>>,
    method: Method,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    authorize(&state, &method, &headers, POLICY)?;
    let db = state.conn()?;
    if !T::delete(&db, id)? {
        return Err(not_found::<T>(id));
    }
    tracing::info!(kind = T::KIND, id, "catalog item deleted");
    Ok(StatusCode::NO_CONTENT)
}
