use axum::{
    extract::State, http::HeaderValue, response::IntoResponse, routing::get, Json, Router,
};
use hyper::header::{AUTHORIZATION, CONTENT_TYPE};
use hyper::StatusCode;
use serde_json::json;
use tower_http::cors::CorsLayer;

use crate::{
    configuration::Settings,
    modules::store::{DocumentStore, DynStore, USERS},
    state::AppState,
};

pub mod groups;
pub mod ranking;
pub mod tasks;
pub mod users;

pub async fn app(config: Settings, test_store: Option<DynStore>) -> Router {
    let origin = config
        .app
        .origin
        .parse::<HeaderValue>()
        .expect("Invalid origin");
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true);

    let api = Router::new()
        .nest("/users", users::router())
        .nest("/groups", groups::router())
        .nest("/tasks", tasks::router())
        .nest("/ranking", ranking::router())
        .route("/health", get(health_check))
        .with_state(AppState::new(config, test_store))
        .layer(cors);

    Router::new().nest("/api", api)
}

async fn health_check(State(store): State<DynStore>) -> impl IntoResponse {
    // a read of a nonexistent document is the cheapest store round trip
    let is_store_connected = store.get(USERS, "__health__").await.is_ok();
    if is_store_connected {
        return (
            StatusCode::OK,
            Json(json!({"status": "all backend services are working properly"})),
        );
    }
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(json!({"status":"document store unavailable"})),
    )
}
