//! REST routes of the document service.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{delete, get},
};
use serde::{Deserialize, Serialize};

use crate::document::{
    Address, Created, Document, DocumentService, DocumentStore, Owner, Property,
    ResolvedProperty,
};
use super::{finish, ApiResult};

type AppState<S> = State<Arc<DocumentService<S>>>;

/// Query string of `GET /properties/filter`.
#[derive(Debug, Default, Deserialize)]
pub struct FilterParams {
    #[serde(default)]
    pub min_area: Option<i64>,
    #[serde(default)]
    pub max_price: Option<i64>,
}

/// Query string of `GET /properties/sorted`.
#[derive(Debug, Default, Deserialize)]
pub struct SortedParams {
    #[serde(default)]
    pub skip: Option<usize>,
    #[serde(default)]
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deleted {
    pub status: String,
}

pub fn router<S: DocumentStore>(service: DocumentService<S>) -> Router {
    let routes = Router::new()
        .route("/addresses", get(list_addresses::<S>).post(create_address::<S>))
        .route("/owners", get(list_owners::<S>).post(create_owner::<S>))
        .route("/properties", get(list_properties::<S>).post(create_property::<S>))
        .route("/properties/all", get(list_properties::<S>))
        .route("/properties/price_above/{value}", get(price_above::<S>))
        .route("/properties/type/{ptype}", get(by_type::<S>))
        .route("/properties/filter", get(filter::<S>))
        .route("/properties/by_owner/{owner_id}", get(by_owner::<S>))
        .route("/properties/sorted", get(sorted::<S>))
        .route("/properties/{id}", delete(delete_property::<S>))
        .with_state(Arc::new(service));
    finish(routes)
}

#[tracing::instrument(skip(ctx, address))]
async fn create_address<S: DocumentStore>(
    State(ctx): AppState<S>,
    Json(address): Json<Address>,
) -> ApiResult<Created> {
    let id = ctx.create_address(address).await?;
    Ok(Json(Created { id }))
}

async fn list_addresses<S: DocumentStore>(State(ctx): AppState<S>) -> ApiResult<Vec<Document<Address>>> {
    Ok(Json(ctx.list_addresses().await?))
}

#[tracing::instrument(skip(ctx, owner))]
async fn create_owner<S: DocumentStore>(
    State(ctx): AppState<S>,
    Json(owner): Json<Owner>,
) -> ApiResult<Created> {
    let id = ctx.create_owner(owner).await?;
    Ok(Json(Created { id }))
}

async fn list_owners<S: DocumentStore>(State(ctx): AppState<S>) -> ApiResult<Vec<Document<Owner>>> {
    Ok(Json(ctx.list_owners().await?))
}

#[tracing::instrument(skip(ctx, property))]
async fn create_property<S: DocumentStore>(
    State(ctx): AppState<S>,
    Json(property): Json<Property>,
) -> ApiResult<Created> {
    let id = ctx.create_property(property).await?;
    Ok(Json(Created { id }))
}

async fn list_properties<S: DocumentStore>(State(ctx): AppState<S>) -> ApiResult<Vec<ResolvedProperty>> {
    Ok(Json(ctx.list_properties().await?))
}

async fn price_above<S: DocumentStore>(
    State(ctx): AppState<S>,
    Path(value): Path<i64>,
) -> ApiResult<Vec<ResolvedProperty>> {
    Ok(Json(ctx.list_properties_price_above(value).await?))
}

async fn by_type<S: DocumentStore>(
    State(ctx): AppState<S>,
    Path(ptype): Path<String>,
) -> ApiResult<Vec<ResolvedProperty>> {
    Ok(Json(ctx.list_properties_by_type(&ptype).await?))
}

async fn filter<S: DocumentStore>(
    State(ctx): AppState<S>,
    Query(params): Query<FilterParams>,
) -> ApiResult<Vec<ResolvedProperty>> {
    Ok(Json(ctx.filter_properties(params.min_area, params.max_price).await?))
}

async fn by_owner<S: DocumentStore>(
    State(ctx): AppState<S>,
    Path(owner_id): Path<String>,
) -> ApiResult<Vec<ResolvedProperty>> {
    Ok(Json(ctx.list_properties_by_owner(&owner_id).await?))
}

async fn sorted<S: DocumentStore>(
    State(ctx): AppState<S>,
    Query(params): Query<SortedParams>,
) -> ApiResult<Vec<ResolvedProperty>> {
    Ok(Json(ctx.list_properties_sorted(params.skip, params.limit).await?))
}

#[tracing::instrument(skip(ctx))]
async fn delete_property<S: DocumentStore>(
    State(ctx): AppState<S>,
    Path(id): Path<String>,
) -> ApiResult<Deleted> {
    ctx.delete_property(&id).await?;
    Ok(Json(Deleted { status: "deleted".into() }))
}
