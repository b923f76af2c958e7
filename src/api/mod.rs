//! Read-only HTTP API over the catalog.
//!
//! Returns a composable `Router` with two endpoints, mounted at the root and
//! again under `/api/`:
//!
//! | Route | Body |
//! |-------|------|
//! | `GET /drugs` | all [`Drug`]s |
//! | `GET /interactions` | all [`InteractionRule`]s with at least one drug |
//!
//! CORS allows any origin. There are no write routes and no authentication.

pub mod error;

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use tower_http::cors::{Any, CorsLayer};

use crate::catalog::types::{Drug, InteractionRule};
use crate::catalog::CatalogRepository;
use error::ApiError;

/// Shared handler state: the store handle the service was built with.
pub type ApiState = Arc<dyn CatalogRepository>;

/// Build the API router around an explicit store handle.
pub fn router(store: ApiState) -> Router {
    let routes = Router::new()
        .route("/drugs", get(list_drugs))
        .route("/interactions", get(list_interactions))
        .with_state(store);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(routes.clone())
        .nest("/api", routes)
        .layer(cors)
}

async fn list_drugs(State(store): State<ApiState>) -> Result<Json<Vec<Drug>>, ApiError> {
    let drugs = tokio::task::spawn_blocking(move || store.drugs()).await??;
    tracing::debug!(count = drugs.len(), "GET /drugs");
    Ok(Json(drugs))
}

async fn list_interactions(
    State(store): State<ApiState>,
) -> Result<Json<Vec<InteractionRule>>, ApiError> {
    let rules = tokio::task::spawn_blocking(move || store.interactions()).await??;
    tracing::debug!(count = rules.len(), "GET /interactions");
    Ok(Json(rules))
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{bail, Result};
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    struct FailingStore;

    impl CatalogRepository for FailingStore {
        fn drugs(&self) -> Result<Vec<Drug>> {
            bail!("database is locked")
        }

        fn interactions(&self) -> Result<Vec<InteractionRule>> {
            bail!("database is locked")
        }
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder()
            .method("GET")
            .uri(uri)
            .header("Origin", "http://localhost:5173")
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn store_failure_is_500() {
        let app = router(Arc::new(FailingStore));

        for uri in ["/drugs", "/interactions", "/api/drugs"] {
            let response = app.clone().oneshot(get(uri)).await.unwrap();
            assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

            let body = to_bytes(response.into_body(), 1024).await.unwrap();
            let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
            assert_eq!(json["error"], "database is locked");
        }
    }

    #[tokio::test]
    async fn cors_allows_any_origin() {
        let app = router(Arc::new(FailingStore));
        let response = app.oneshot(get("/drugs")).await.unwrap();
        assert_eq!(
            response.headers().get("access-control-allow-origin").unwrap(),
            "*"
        );
    }

    #[tokio::test]
    async fn unknown_route_is_404() {
        let app = router(Arc::new(FailingStore));
        let response = app.oneshot(get("/drugs/d1")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
