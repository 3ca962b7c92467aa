use axum::{
    Json,
    body::Body,
    extract::{Request, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::Value;
use tower::ServiceExt;
use tower_http::services::ServeFile;

use super::{
    error::{ApiError, ApiResult},
    extract::{JsonBody, ListParams, ProductPath},
    models::Acknowledgement,
    state::AppState,
};
use crate::catalog::Product;

/// Entry-point document (GET /)
///
/// A missing index file is a server fault, not a 404.
pub async fn handle_root(State(state): State<AppState>, request: Request) -> ApiResult<Response> {
    let path = state.config.assets.index_path();
    let response = ServeFile::new(&path)
        .oneshot(request)
        .await
        .unwrap_or_else(|never| match never {});

    if response.status() == StatusCode::NOT_FOUND {
        return Err(ApiError::Internal(format!(
            "index document missing: {}",
            path.display()
        )));
    }

    Ok(response.map(Body::new))
}

/// Product listing (GET /products?offset=&limit=&tag=)
pub async fn list_products(
    State(state): State<AppState>,
    params: ListParams,
) -> ApiResult<Json<Vec<Product>>> {
    let query = params.to_query();
    let products = state.catalog.list(&query).await?;
    Ok(Json(products))
}

/// Single product (GET /products/{id})
pub async fn get_product(
    State(state): State<AppState>,
    ProductPath { id }: ProductPath,
) -> ApiResult<Json<Product>> {
    state
        .catalog
        .get(&id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("product {id}")))
}

/// Create (POST /products). Echoes the body; nothing is stored.
pub async fn create_product(JsonBody(body): JsonBody) -> ApiResult<Json<Value>> {
    tracing::info!(body = %body, "Create product requested");
    Ok(Json(body))
}

/// Update (PUT /products/{id}). Acknowledged without an existence check.
pub async fn edit_product(
    State(state): State<AppState>,
    ProductPath { id }: ProductPath,
    JsonBody(body): JsonBody,
) -> ApiResult<impl IntoResponse> {
    state.catalog.update(&id, &body).await?;
    Ok((StatusCode::OK, Json(Acknowledgement::updated(&id))))
}

/// Delete (DELETE /products/{id}). Acknowledged with 202.
pub async fn delete_product(
    State(state): State<AppState>,
    ProductPath { id }: ProductPath,
) -> ApiResult<impl IntoResponse> {
    state.catalog.delete(&id).await?;
    Ok((StatusCode::ACCEPTED, Json(Acknowledgement::deleted(&id))))
}

/// Fallback for anything no route or static file answered
pub async fn not_found(request: Request) -> ApiError {
    ApiError::NotFound(format!("{} {}", request.method(), request.uri().path()))
}
