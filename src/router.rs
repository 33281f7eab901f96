use axum::{extract::DefaultBodyLimit, http::HeaderValue, routing::get, Router};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::SecurityConfig;
use crate::handlers::{notes, pages, system};
use crate::state::AppState;

/// Full application router with middleware applied
pub fn app(state: AppState) -> Router {
    let config = state.config.clone();

    let mut router: Router<AppState> = Router::new()
        // HTML pages
        .route("/", get(pages::index))
        .route("/notes/form", get(pages::note_form))
        .route("/health", get(system::health))
        .merge(note_routes())
        .layer(
            ServiceBuilder::new()
                .layer(DefaultBodyLimit::max(config.api.max_request_size_bytes))
                .layer(cors_layer(&config.security)),
        );

    if config.api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }

    router.with_state(state)
}

fn note_routes() -> Router<AppState> {
    Router::new()
        .route("/api/notes", get(notes::list).post(notes::create))
        .route(
            "/api/notes/:id",
            get(notes::show).put(notes::update).delete(notes::delete),
        )
}

/// A disabled config yields a layer with no allowed origins, so no CORS headers are sent
fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    if !security.enable_cors {
        return CorsLayer::new();
    }

    if security.cors_origins.is_empty() || security.cors_origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}
