use axum::Router;
use axum::response::Json;
use migration::MigratorTrait;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::{IntoParams, OpenApi, ToSchema};

use crate::config::{self, Config};
use crate::item::api::v1::create_item_router;
use crate::list::api::v1::create_list_router;
use crate::web::api::{ApiError, ApiQuery};
use crate::web::middleware::DiagnosticsLayer;

pub mod api;
pub mod middleware;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub db: Arc<DatabaseConnection>,
}

impl AppState {
    pub fn new(config: Config, db: DatabaseConnection) -> Self {
        Self {
            config: Arc::new(config),
            db: Arc::new(db),
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(title = "Todo Server", description = "Todo lists and their items"),
    paths(
        health_check_handler,
        echo_handler,
        crate::list::api::v1::get_lists_handler,
        crate::list::api::v1::create_list_handler,
        crate::list::api::v1::get_list_handler,
        crate::list::api::v1::update_list_handler,
        crate::list::api::v1::delete_list_handler,
        crate::item::api::v1::get_items_handler,
        crate::item::api::v1::create_item_handler,
        crate::item::api::v1::get_item_handler,
        crate::item::api::v1::update_item_handler,
        crate::item::api::v1::delete_item_handler,
    ),
    tags(
        (name = "System", description = "Liveness and diagnostics"),
        (name = "Todo lists", description = "Todo list management"),
        (name = "Todo items", description = "Items nested under a todo list")
    )
)]
pub struct ApiDoc;

/// Opens the connection pool. In-memory SQLite lives inside a single
/// connection, so the pool is pinned to exactly one.
pub async fn connect_database(db_url: &str) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(db_url.to_string());
    if db_url.starts_with("sqlite::memory:") {
        options.max_connections(1).min_connections(1);
    }
    Database::connect(options).await
}

/// Assembles every route of the service on top of the shared state.
pub fn create_app(state: AppState) -> Router {
    let debug = state.config.debug;

    let public_routes = Router::new()
        .route("/health", axum::routing::get(health_check_handler))
        .route("/echo", axum::routing::get(echo_handler))
        .route("/api-docs/openapi.json", axum::routing::get(openapi_handler));

    let app = Router::new()
        .merge(create_list_router(state.clone()))
        .merge(create_item_router(state))
        .merge(public_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        );

    if debug {
        tracing::info!("Request diagnostics enabled");
        app.layer(DiagnosticsLayer::new())
    } else {
        app
    }
}

#[tracing::instrument(skip(config))]
pub async fn start_web_server(config: config::Config) -> anyhow::Result<()> {
    let server_address = format!("0.0.0.0:{}", &config.port);
    let listener = tokio::net::TcpListener::bind(&server_address).await?;
    tracing::info!("Web server running on http://{}", server_address);

    let db = connect_database(&config.db_url).await?;
    migration::Migrator::up(&db, None).await?;
    tracing::info!("Database migrations applied successfully");

    let app = create_app(AppState::new(config, db));

    axum::serve(listener, app).await?;
    Ok(())
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

/// Handler for GET /health.
#[tracing::instrument]
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is up", body = HealthResponse)),
    tag = "System"
)]
pub async fn health_check_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct EchoQuery {
    message: String,
    name: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EchoResponse {
    #[serde(rename = "Message")]
    pub message: String,
}

/// Handler for GET /echo - Greets `name` with `message`.
#[tracing::instrument]
#[utoipa::path(
    get,
    path = "/echo",
    params(EchoQuery),
    responses(
        (status = 200, description = "Echoed greeting", body = EchoResponse),
        (status = 422, description = "Missing query parameters", body = api::ErrorResponse)
    ),
    tag = "System"
)]
pub async fn echo_handler(
    ApiQuery(query): ApiQuery<EchoQuery>,
) -> Result<Json<EchoResponse>, ApiError> {
    Ok(Json(EchoResponse {
        message: format!("{} {}!", query.message, query.name),
    }))
}

/// Handler for GET /api-docs/openapi.json.
pub async fn openapi_handler() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn can_document_every_todo_route() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&str> = doc.paths.paths.keys().map(String::as_str).collect();

        for expected in [
            "/health",
            "/echo",
            "/lists",
            "/lists/{list_id}",
            "/lists/{list_id}/items",
            "/lists/{list_id}/items/{item_id}",
        ] {
            assert!(paths.contains(&expected), "missing path {expected}");
        }
    }

    #[tokio::test]
    async fn can_report_health() {
        let Json(health) = health_check_handler().await;
        assert_eq!(health.status, "ok");
    }
}
