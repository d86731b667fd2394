pub mod products;

use axum::{
    routing::{get, put},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::types::Health;

use crate::openapi::ApiDoc;
use crate::state::ServerState;

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Routes under `/api/products`, without state.
pub fn product_routes() -> Router<ServerState> {
    Router::new()
        .route("/api/products", get(products::list).post(products::create))
        .route(
            "/api/products/:id",
            get(products::get).put(products::update).delete(products::delete),
        )
        .route("/api/products/decrement-stock/:id/:quantity", put(products::decrement_stock))
        .route("/api/products/add-to-stock/:id/:quantity", put(products::add_to_stock))
}

/// Build the full application router: health, product API and API docs.
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(product_routes())
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                // 5xx at ERROR
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
