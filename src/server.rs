use std::any::Any;

use anyhow::Context;
use axum::{
    extract::DefaultBodyLimit,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    middleware,
    response::{IntoResponse, Response},
    routing::{get, patch, post},
    Router,
};
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};

use crate::config::SecurityConfig;
use crate::error::ApiError;
use crate::handlers::{protected, public};
use crate::middleware::require_auth;
use crate::state::AppState;

pub fn app(state: AppState) -> Router {
    // Auth gate only wraps matched protected routes; unknown paths still 404
    let protected = Router::new()
        .merge(auth_routes())
        .merge(board_routes())
        .merge(todo_routes())
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        // Public
        .route("/", get(public::root))
        .route("/api/health", get(public::health))
        .merge(protected)
        .fallback(public::not_found)
        // Global middleware
        .layer(DefaultBodyLimit::max(state.config.server.max_request_size_bytes))
        .layer(cors_layer(&state.config.security))
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::custom(handle_panic))
        .with_state(state)
}

fn auth_routes() -> Router<AppState> {
    use protected::users;

    Router::new()
        .route("/api/auth/register", post(users::register))
        .route("/api/auth/me", get(users::me))
}

fn board_routes() -> Router<AppState> {
    use protected::boards;

    Router::new()
        .route("/api/boards", get(boards::list).post(boards::create))
        .route(
            "/api/boards/:id",
            get(boards::show).put(boards::update).delete(boards::delete),
        )
}

fn todo_routes() -> Router<AppState> {
    use protected::todos;

    Router::new()
        .route("/api/todos", post(todos::create))
        .route("/api/todos/board/:board_id", get(todos::list_for_board))
        .route(
            "/api/todos/:id",
            get(todos::show).put(todos::update).delete(todos::delete),
        )
        .route("/api/todos/:id/toggle", patch(todos::toggle))
}

/// Credentialed CORS for the single configured frontend origin
fn cors_layer(config: &SecurityConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
        .allow_credentials(true);

    match HeaderValue::from_str(&config.frontend_origin) {
        Ok(origin) => layer.allow_origin(origin),
        Err(_) => {
            tracing::warn!(
                "FRONTEND_URL '{}' is not a valid origin; cross-origin requests will be refused",
                config.frontend_origin
            );
            layer
        }
    }
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        *s
    } else {
        "unknown panic payload"
    };
    tracing::error!("Handler panicked: {}", detail);
    ApiError::internal_server_error("Something went wrong!").into_response()
}

/// Bind and serve until Ctrl-C
pub async fn serve(state: AppState, port: u16) -> anyhow::Result<()> {
    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Task board API listening on http://{}", bind_addr);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
