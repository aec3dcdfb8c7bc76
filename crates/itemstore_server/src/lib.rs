//! Itemstore Server - Resource API Server
//!
//! HTTP front end that maps verbs and paths onto the resource store.

pub mod error;
pub mod http;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use itemstore_core::ResourceStore;
use tower_http::catch_panic::CatchPanicLayer;

/// Shared application state
pub struct AppState {
    pub store: ResourceStore,
}

impl AppState {
    pub fn new(store: ResourceStore) -> Self {
        Self { store }
    }
}

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    let router = Router::new()
        // System endpoints
        .route("/", get(http::home))
        .route("/health", get(http::health))
        // Item endpoints
        .route("/items", get(http::list_items).post(http::create_item))
        .route(
            "/items/{id}",
            get(http::get_item)
                .put(http::update_item)
                .delete(http::delete_item),
        )
        // Task endpoints
        .route("/tasks", get(http::list_tasks).post(http::create_task))
        .route(
            "/tasks/{id}",
            get(http::get_task)
                .put(http::update_task)
                .delete(http::delete_task),
        )
        .route("/tasks/{id}/complete", post(http::complete_task))
        .fallback(http::not_found)
        .method_not_allowed_fallback(http::method_not_allowed)
        .with_state(state);

    with_middleware(router)
}

/// Wraps `router` with panic recovery and request logging.
///
/// Panics become a JSON 500 before the request is logged, so every request
/// gets a structured response and one log line.
pub fn with_middleware(router: Router) -> Router {
    router
        .layer(CatchPanicLayer::custom(http::panic_response))
        .layer(middleware::from_fn(http::log_request))
}

/// Start the server and run until Ctrl-C
pub async fn serve(addr: &str, state: Arc<AppState>) -> Result<(), Box<dyn std::error::Error>> {
    let backend = state.store.backend_name();
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    log::info!("event=server_start module=http status=ok addr={addr} backend={backend}");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    log::info!("event=server_stop module=http status=ok");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        log::error!("event=server_signal module=http status=error error={err}");
    }
}
