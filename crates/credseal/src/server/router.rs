//! Axum router construction.

use std::time::Duration;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};

use super::{handlers, state::AppState};

/// Build the application [`Router`] with all routes and middleware attached.
///
/// CORS is fully permissive: capsules are fetched by userscripts running on
/// arbitrary third-party origins, and everything served here is sealed.
pub fn build(state: AppState, request_timeout: Duration) -> Router {
    Router::new()
        .route("/credentials/:id", post(handlers::fetch_capsule))
        .route("/health", get(handlers::health))
        .fallback(handlers::not_found)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(request_timeout))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::CredentialStore;
    use axum::{body::Body, http::Request};
    use tower::ServiceExt;

    fn test_router() -> Router {
        let path = std::env::temp_dir().join(format!("credseal-router-{}.json", uuid::Uuid::new_v4()));
        let store = CredentialStore::open(&path).unwrap();
        build(AppState::new(store), Duration::from_secs(5))
    }

    #[tokio::test]
    async fn unknown_route_returns_404() {
        let app = test_router();
        let req = Request::builder()
            .uri("/unknown")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), 404);
    }

    #[tokio::test]
    async fn health_route_exists() {
        let app = test_router();
        let req = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), 200);
    }
}
