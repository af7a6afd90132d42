//! Mount-path routing and dispatch
//!
//! One route serves the whole GraphQL surface: every HTTP method on the
//! mount path lands in [`graphql_endpoint`], which decides between the
//! interactive explorer (GET from a browser, tooling enabled) and the
//! executor adapter. Cross-cutting layers wrap the route in a fixed order:
//! trace, CORS, upload interception, handler.

use crate::core::error::{BridgeError, HttpQueryError};
use crate::core::negotiate::prefers_html;
use crate::engine::query::{QueryPayload, QueryResponse, run_http_query};
use crate::server::host::GraphQlHost;
use crate::server::uploads::{PreparedBody, UploadFailure, UploadsConfig, intercept_uploads};
use async_graphql::Executor;
use async_graphql::http::{GraphQLPlaygroundConfig, playground_source};
use axum::extract::{Request, State};
use axum::http::{HeaderMap, HeaderValue, Method, header};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::any;
use axum::{Router, middleware};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Read-only per-mount state shared by the endpoint handler and middleware
pub(crate) struct MountState<E> {
    pub host: Arc<GraphQlHost<E>>,
    pub path: String,
    pub body_limit: usize,
    pub uploads: UploadsConfig,
}

/// Attach the mount route and its layer stack to a router
pub(crate) fn mount<E: Executor>(
    router: Router,
    state: Arc<MountState<E>>,
    cors: CorsLayer,
) -> Router {
    let graphql_routes = Router::new()
        .route(&state.path, any(graphql_endpoint::<E>))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            intercept_uploads::<E>,
        ))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state);

    router.merge(graphql_routes)
}

/// Handler for the mount path, all methods
async fn graphql_endpoint<E: Executor>(
    State(state): State<Arc<MountState<E>>>,
    request: Request,
) -> Result<Response, BridgeError> {
    let (mut parts, body) = request.into_parts();

    // The explorer decision is made only for GET; the host can veto it.
    if parts.method == Method::GET && !state.host.disable_tools && prefers_html(&parts.headers) {
        return Ok(explorer_response(&state));
    }

    // A failed multipart parse was formatted upstream; render it here.
    if let Some(failure) = parts.extensions.remove::<UploadFailure>() {
        return Ok(upload_failure_response(failure)?);
    }

    let payload = if parts.method == Method::GET {
        QueryPayload::QueryString(parts.uri.query().unwrap_or_default().to_string())
    } else if parts.method == Method::POST {
        match parts.extensions.remove::<PreparedBody>().and_then(|p| p.take()) {
            Some(batch) => QueryPayload::Prepared(batch),
            None => match read_json_payload(&parts.headers, body, state.body_limit).await {
                Ok(payload) => payload,
                // body-parse failures render like any other query error
                Err(err) => return Ok(QueryResponse::from(err).into_response()),
            },
        }
    } else {
        // the adapter rejects everything else before touching the payload
        QueryPayload::Json(serde_json::Value::Null)
    };

    let outcome = run_http_query(
        &state.host.executor,
        &state.host.options,
        &parts.method,
        payload,
        &parts,
    )
    .await;

    match outcome {
        Ok(response) => Ok(response.into_response()),
        // the distinguished query-error kind renders locally
        Err(BridgeError::Query(err)) => Ok(QueryResponse::from(err).into_response()),
        // everything else falls through to the generic error path
        Err(other) => Err(other),
    }
}

/// Read and parse a JSON POST body under the configured limit
async fn read_json_payload(
    headers: &HeaderMap,
    body: axum::body::Body,
    limit: usize,
) -> Result<QueryPayload, HttpQueryError> {
    if let Some(length) = headers
        .get(header::CONTENT_LENGTH)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<usize>().ok())
    {
        if length > limit {
            return Err(HttpQueryError::payload_too_large(
                "Request body exceeds the configured size limit",
            ));
        }
    }

    let bytes = axum::body::to_bytes(body, limit)
        .await
        .map_err(|err| HttpQueryError::bad_request(format!("Unable to read request body: {}", err)))?;

    if bytes.is_empty() {
        return Err(HttpQueryError::bad_request("POST body missing."));
    }

    let value = serde_json::from_slice(&bytes)
        .map_err(|err| HttpQueryError::bad_request(format!("Invalid JSON body: {}", err)))?;

    Ok(QueryPayload::Json(value))
}

fn explorer_response<E>(state: &MountState<E>) -> Response {
    let mut config = GraphQLPlaygroundConfig::new(&state.path);
    if let Some(subscriptions) = &state.host.subscriptions_path {
        config = config.subscription_endpoint(subscriptions);
    }
    Html(playground_source(config)).into_response()
}

fn upload_failure_response(failure: UploadFailure) -> Result<Response, BridgeError> {
    let body = serde_json::to_string(&serde_json::json!({ "errors": failure.errors }))?;

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );

    Ok(QueryResponse {
        status: failure.status,
        headers,
        body,
    }
    .into_response())
}
