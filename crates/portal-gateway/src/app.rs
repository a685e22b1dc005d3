use std::any::Any;

use axum::response::Response;
use axum::routing::{get, post};
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;
use tracing::error;

use crate::error::internal_error;
use crate::handlers::{health_handler, info_handler, redirect_handler, shorten_handler};
use crate::state::AppState;

pub struct App {}

impl App {
    pub fn router(state: AppState) -> Router {
        // Only redirects live at the root; every other route sits under /api.
        let routes = Router::new()
            .nest(
                "/api",
                Router::new()
                    .route("/health", get(health_handler))
                    .route("/shorten", post(shorten_handler))
                    .route("/info", get(info_handler)),
            )
            .route("/{shortlink}", get(redirect_handler))
            .with_state(state);
        Self::with_middleware(routes)
    }

    /// Wraps `router` in request tracing and panic recovery.
    pub fn with_middleware(router: Router) -> Router {
        router
            .layer(CatchPanicLayer::custom(handle_panic))
            .layer(TraceLayer::new_for_http())
    }
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic payload"
    };
    error!(panic = %detail, "Recovered from panic in handler");
    internal_error()
}
