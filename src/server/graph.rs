//! REST routes of the graph service.
//!
//! Narrower than the document service: no filter, type, owner
//! or sorted listings.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{delete, get},
};
use serde::{Deserialize, Serialize};

use crate::graph::{Address, GraphService, NewProperty, Owner, PropertyView};
use crate::storage::GraphStore;
use super::{finish, ApiResult};

type AppState<B> = State<Arc<GraphService<B>>>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteMessage {
    pub message: String,
}

pub fn router<B: GraphStore>(service: GraphService<B>) -> Router {
    let routes = Router::new()
        .route("/addresses", get(list_addresses::<B>).post(create_address::<B>))
        .route("/owners", get(list_owners::<B>).post(create_owner::<B>))
        .route("/properties", get(list_properties::<B>).post(create_property::<B>))
        .route("/properties/{title}", delete(delete_property::<B>))
        .with_state(Arc::new(service));
    finish(routes)
}

async fn create_address<B: GraphStore>(
    State(ctx): AppState<B>,
    Json(address): Json<Address>,
) -> ApiResult<Address> {
    Ok(Json(ctx.create_address(address).await?))
}

async fn list_addresses<B: GraphStore>(State(ctx): AppState<B>) -> ApiResult<Vec<Address>> {
    Ok(Json(ctx.list_addresses().await?))
}

async fn create_owner<B: GraphStore>(
    State(ctx): AppState<B>,
    Json(owner): Json<Owner>,
) -> ApiResult<Owner> {
    Ok(Json(ctx.create_owner(owner).await?))
}

async fn list_owners<B: GraphStore>(State(ctx): AppState<B>) -> ApiResult<Vec<Owner>> {
    Ok(Json(ctx.list_owners().await?))
}

async fn create_property<B: GraphStore>(
    State(ctx): AppState<B>,
    Json(property): Json<NewProperty>,
) -> ApiResult<PropertyView> {
    Ok(Json(ctx.create_property(property).await?))
}

async fn list_properties<B: GraphStore>(State(ctx): AppState<B>) -> ApiResult<Vec<PropertyView>> {
    Ok(Json(ctx.list_properties().await?))
}

#[tracing::instrument(skip(ctx))]
async fn delete_property<B: GraphStore>(
    State(ctx): AppState<B>,
    Path(title): Path<String>,
) -> ApiResult<DeleteMessage> {
    ctx.delete_property(&title).await?;
    Ok(Json(DeleteMessage { message: format!("Property '{title}' deleted successfully") }))
}
