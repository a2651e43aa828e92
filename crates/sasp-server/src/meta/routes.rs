//! Meta route handlers

use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use crate::lifecycle::ServerLifecycle;

/// Capability document served at `/sas/spec.json`
pub const SPEC_DOCUMENT: &str = include_str!("../../resources/sas_spec.json");

#[derive(Debug, Serialize)]
pub(super) struct StopResponse {
    status: &'static str,
}

pub(super) async fn spec_document() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "application/json")], SPEC_DOCUMENT)
}

pub(super) async fn admin_stop(State(lifecycle): State<ServerLifecycle>) -> Json<StopResponse> {
    tracing::info!("Shutdown requested over HTTP");
    lifecycle.shutdown();
    Json(StopResponse { status: "stopping" })
}

#[cfg(test)]
mod tests {
    use axum::body::{to_bytes, Body};
    use axum::http::{Method, Request, StatusCode};
    use tower::ServiceExt;

    use super::*;
    use crate::meta::router;

    fn request(method: Method, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    #[test]
    fn test_spec_document_is_json() {
        let document: serde_json::Value = serde_json::from_str(SPEC_DOCUMENT).unwrap();
        assert_eq!(document["streams"][0]["role"], "media");
        assert_eq!(document["streams"][1]["role"], "control");
        assert_eq!(document["framing"]["max_payload_bytes"], 65535);
    }

    #[tokio::test]
    async fn test_get_spec_document() {
        let response = router(ServerLifecycle::new())
            .oneshot(request(Method::GET, "/sas/spec.json"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/json"
        );
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(body.as_ref(), SPEC_DOCUMENT.as_bytes());
    }

    #[tokio::test]
    async fn test_admin_stop_shuts_down() {
        let lifecycle = ServerLifecycle::new();
        let response = router(lifecycle.clone())
            .oneshot(request(Method::POST, "/admin/stop"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "stopping");
        assert!(lifecycle.is_shutting_down());
    }

    #[tokio::test]
    async fn test_admin_stop_requires_post() {
        let lifecycle = ServerLifecycle::new();
        let response = router(lifecycle.clone())
            .oneshot(request(Method::GET, "/admin/stop"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert!(!lifecycle.is_shutting_down());
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let response = router(ServerLifecycle::new())
            .oneshot(request(Method::GET, "/nope"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
