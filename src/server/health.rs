//! Health-check endpoint
//!
//! Served on the well-known path with the health-check media type. The
//! response shape is fixed: `{"status":"pass"}` or `{"status":"fail"}`.
//! A user-supplied probe can demote the status to 503; its error detail is
//! logged and discarded, never sent to the client.

use anyhow::Result;
use async_trait::async_trait;
use axum::Json;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use std::sync::Arc;

/// Well-known path probed by load balancers and uptime monitors
pub const HEALTH_CHECK_PATH: &str = "/.well-known/apollo/server-health";

/// Response media type, per the api-health-check draft
pub const HEALTH_CHECK_CONTENT_TYPE: &str = "application/health+json";

/// User-supplied readiness probe
///
/// Implemented automatically for `Fn() -> impl Future<Output = Result<()>>`
/// closures:
///
/// ```rust,ignore
/// registration.on_health_check(|| async { database.ping().await })
/// ```
#[async_trait]
pub trait HealthCheck: Send + Sync {
    async fn check(&self) -> Result<()>;
}

#[async_trait]
impl<F, Fut> HealthCheck for F
where
    F: Fn() -> Fut + Send + Sync,
    Fut: std::future::Future<Output = Result<()>> + Send,
{
    async fn check(&self) -> Result<()> {
        (self)().await
    }
}

/// Render the health response, invoking the probe when one is configured
pub(crate) async fn health_response(check: Option<Arc<dyn HealthCheck>>) -> Response {
    let (status, verdict) = match check {
        Some(check) => match check.check().await {
            Ok(()) => (StatusCode::OK, "pass"),
            Err(err) => {
                tracing::warn!(error = %err, "health check probe failed");
                (StatusCode::SERVICE_UNAVAILABLE, "fail")
            }
        },
        None => (StatusCode::OK, "pass"),
    };

    (
        status,
        [(header::CONTENT_TYPE, HEALTH_CHECK_CONTENT_TYPE)],
        Json(serde_json::json!({ "status": verdict })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        serde_json::from_slice(&bytes).expect("json body")
    }

    #[tokio::test]
    async fn test_no_probe_always_passes() {
        let response = health_response(None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            HEALTH_CHECK_CONTENT_TYPE
        );
        assert_eq!(body_json(response).await["status"], "pass");
    }

    #[tokio::test]
    async fn test_passing_probe() {
        let probe: Arc<dyn HealthCheck> = Arc::new(|| async { anyhow::Ok(()) });
        let response = health_response(Some(probe)).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["status"], "pass");
    }

    #[tokio::test]
    async fn test_failing_probe_is_503_with_detail_discarded() {
        let probe: Arc<dyn HealthCheck> =
            Arc::new(|| async { Err::<(), _>(anyhow::anyhow!("replica lag out of bounds")) });
        let response = health_response(Some(probe)).await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body = body_json(response).await;
        assert_eq!(body["status"], "fail");
        assert_eq!(body.as_object().unwrap().len(), 1);
    }
}
