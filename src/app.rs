//! Router construction and shared request state.

use std::sync::Arc;

use axum::{
    Router,
    http::{HeaderValue, Method, header, header::InvalidHeaderValue},
    routing::get,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{handlers, services::CoffeeRepository};

/// State injected into every handler.
///
/// Built once in `main`; cloning only bumps reference counts.
#[derive(Clone)]
pub struct AppState {
    /// Record access layer shared by all requests
    pub coffees: Arc<dyn CoffeeRepository>,

    /// Attribution written to `added_by` on every update
    pub added_by: Arc<str>,
}

impl AppState {
    pub fn new(coffees: Arc<dyn CoffeeRepository>, added_by: impl Into<Arc<str>>) -> Self {
        Self {
            coffees,
            added_by: added_by.into(),
        }
    }
}

/// Build the HTTP router.
///
/// # Routes
///
/// - `GET /` - liveness, always `{"message": "OK"}`
/// - `GET /health` - readiness, pings the store
/// - `GET|POST /coffees`
/// - `GET|PUT|DELETE /coffees/{id}`
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::health::root))
        .route("/health", get(handlers::health::health_check))
        .route(
            "/coffees",
            get(handlers::coffees::list_coffees).post(handlers::coffees::create_coffee),
        )
        .route(
            "/coffees/{id}",
            get(handlers::coffees::get_coffee)
                .put(handlers::coffees::update_coffee)
                .delete(handlers::coffees::delete_coffee),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// CORS policy: a single allowed origin, credentials permitted.
///
/// With credentials enabled, methods and headers must be listed explicitly
/// rather than wildcarded.
pub fn cors_layer(origin: &str) -> Result<CorsLayer, InvalidHeaderValue> {
    Ok(CorsLayer::new()
        .allow_origin(origin.parse::<HeaderValue>()?)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::memory_repository::MemoryCoffeeRepository;
    use axum::{body::Body, http::Request};
    use tower::ServiceExt;

    const ORIGIN: &str = "https://coffee-shop-client.vercel.app";

    fn app() -> Router {
        let state = AppState::new(Arc::new(MemoryCoffeeRepository::new()), "system@example.com");
        router(state).layer(cors_layer(ORIGIN).unwrap())
    }

    #[tokio::test]
    async fn allowed_origin_gets_credentialed_cors_headers() {
        let response = app()
            .oneshot(
                Request::builder()
                    .method(Method::OPTIONS)
                    .uri("/coffees")
                    .header(header::ORIGIN, ORIGIN)
                    .header(header::ACCESS_CONTROL_REQUEST_METHOD, "PUT")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let headers = response.headers();
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], ORIGIN);
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
    }

    #[tokio::test]
    async fn other_origins_are_not_allowed() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/coffees")
                    .header(header::ORIGIN, "https://evil.example.com")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert!(
            !response
                .headers()
                .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        );
    }

    #[test]
    fn invalid_origin_is_rejected() {
        assert!(cors_layer("bad\norigin").is_err());
    }
}
