//! The query executor adapter
//!
//! [`run_http_query`] is the single seam between the transport and the
//! GraphQL engine: it turns an inbound request description into one
//! [`Executor`] call and maps the outcome to a [`QueryResponse`] value.
//! Nothing here touches the outbound response directly; the binding layer
//! applies the returned value, so the status is decided exactly once.
//!
//! Failure handling is split in two. Transport-level problems (unsupported
//! method, malformed payload, failing options resolver) come back as
//! [`HttpQueryError`] and are rendered locally. Anything else is returned
//! as a plain [`BridgeError`] and left to the framework's generic error
//! path.

use crate::core::error::{BridgeError, HttpQueryError};
use crate::engine::options::{OptionsProvider, RequestOptions};
use async_graphql::http::parse_query_string;
use async_graphql::{BatchRequest, BatchResponse, Executor};
use axum::http::request::Parts;
use axum::http::{HeaderMap, HeaderValue, Method, StatusCode, header};
use axum::response::{IntoResponse, Response};

/// Where the query came from on the wire
pub enum QueryPayload {
    /// Raw query string of a GET request
    QueryString(String),

    /// Parsed JSON body of a POST request
    Json(serde_json::Value),

    /// Body already parsed upstream by the upload interceptor
    Prepared(BatchRequest),
}

/// The transport-level outcome of one execution
///
/// A plain value rather than mutations on a response object: the binding
/// layer applies it in one step, which rules out partially written
/// responses and repeated status assignments.
#[derive(Debug)]
pub struct QueryResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl QueryResponse {
    /// A 200 response carrying a serialized engine payload
    fn graphql(headers: HeaderMap, body: String) -> Self {
        Self {
            status: StatusCode::OK,
            headers,
            body,
        }
    }
}

impl IntoResponse for QueryResponse {
    fn into_response(self) -> Response {
        (self.status, self.headers, self.body).into_response()
    }
}

impl From<HttpQueryError> for QueryResponse {
    fn from(err: HttpQueryError) -> Self {
        Self {
            status: err.status,
            headers: err.headers,
            body: err.message,
        }
    }
}

/// Execute one GraphQL-over-HTTP request against the engine
///
/// The options provider is evaluated at most once, before the engine call.
/// Each invocation performs exactly one execution; callers are responsible
/// for calling this once per inbound request.
pub async fn run_http_query<E: Executor>(
    executor: &E,
    provider: &OptionsProvider,
    method: &Method,
    payload: QueryPayload,
    head: &Parts,
) -> Result<QueryResponse, BridgeError> {
    if *method != Method::GET && *method != Method::POST {
        return Err(HttpQueryError::method_not_allowed().into());
    }

    let options = provider.resolve(head).await?;
    let batch = build_batch_request(payload)?;
    let batch = apply_options(batch, options);

    let response = executor.execute_batch(batch).await;
    render(response)
}

/// Decode the wire payload into an engine request
fn build_batch_request(payload: QueryPayload) -> Result<BatchRequest, HttpQueryError> {
    match payload {
        QueryPayload::Prepared(batch) => Ok(batch),
        QueryPayload::QueryString(raw) => parse_query_string(&raw)
            .map(BatchRequest::Single)
            .map_err(HttpQueryError::from),
        QueryPayload::Json(value) => serde_json::from_value(value)
            .map_err(|err| HttpQueryError::bad_request(format!("Invalid GraphQL request: {}", err))),
    }
}

/// Fold resolved options into the engine request
///
/// Context data lands on single-operation requests only: a type-map cannot
/// be cloned across batch items. Execution flags apply to every item.
fn apply_options(batch: BatchRequest, options: RequestOptions) -> BatchRequest {
    match batch {
        BatchRequest::Single(mut request) => {
            request.data = options.data;
            if options.disable_introspection {
                request = request.disable_introspection();
            }
            BatchRequest::Single(request)
        }
        BatchRequest::Batch(requests) => {
            if options.disable_introspection {
                BatchRequest::Batch(
                    requests
                        .into_iter()
                        .map(|request| request.disable_introspection())
                        .collect(),
                )
            } else {
                BatchRequest::Batch(requests)
            }
        }
    }
}

/// Map the engine response to its transport rendering
fn render(response: BatchResponse) -> Result<QueryResponse, BridgeError> {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );

    match &response {
        BatchResponse::Single(single) => {
            if single.is_ok() {
                if let Some(cache_control) = single.cache_control.value() {
                    if let Ok(value) = HeaderValue::from_str(&cache_control) {
                        headers.insert(header::CACHE_CONTROL, value);
                    }
                }
            }
            headers.extend(single.http_headers.clone());
        }
        BatchResponse::Batch(items) => {
            for item in items {
                headers.extend(item.http_headers.clone());
            }
        }
    }

    // A response the engine produced but we cannot serialize is not a query
    // error; it propagates to the generic error path.
    let body = serde_json::to_string(&response)?;

    Ok(QueryResponse::graphql(headers, body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_graphql::{Context, EmptyMutation, EmptySubscription, Object, Schema};
    use axum::http::Request;

    struct Viewer {
        name: String,
    }

    struct Query;

    #[Object]
    impl Query {
        async fn hello(&self) -> &str {
            "world"
        }

        async fn viewer(&self, ctx: &Context<'_>) -> String {
            ctx.data::<Viewer>()
                .map(|viewer| viewer.name.clone())
                .unwrap_or_else(|_| "anonymous".to_string())
        }
    }

    fn schema() -> Schema<Query, EmptyMutation, EmptySubscription> {
        Schema::new(Query, EmptyMutation, EmptySubscription)
    }

    fn head(method: Method) -> Parts {
        Request::builder()
            .method(method)
            .uri("/graphql")
            .body(())
            .expect("request head")
            .into_parts()
            .0
    }

    #[tokio::test]
    async fn test_post_success_returns_200_json() {
        let response = run_http_query(
            &schema(),
            &OptionsProvider::default(),
            &Method::POST,
            QueryPayload::Json(serde_json::json!({ "query": "{ hello }" })),
            &head(Method::POST),
        )
        .await
        .unwrap();

        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(
            response.headers.get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
        let body: serde_json::Value = serde_json::from_str(&response.body).unwrap();
        assert_eq!(body["data"]["hello"], "world");
    }

    #[tokio::test]
    async fn test_get_parses_query_string() {
        let response = run_http_query(
            &schema(),
            &OptionsProvider::default(),
            &Method::GET,
            QueryPayload::QueryString("query=%7B+hello+%7D".to_string()),
            &head(Method::GET),
        )
        .await
        .unwrap();

        assert_eq!(response.status, StatusCode::OK);
        let body: serde_json::Value = serde_json::from_str(&response.body).unwrap();
        assert_eq!(body["data"]["hello"], "world");
    }

    #[tokio::test]
    async fn test_unsupported_method_is_405_with_allow_header() {
        let err = run_http_query(
            &schema(),
            &OptionsProvider::default(),
            &Method::DELETE,
            QueryPayload::Json(serde_json::json!({ "query": "{ hello }" })),
            &head(Method::DELETE),
        )
        .await
        .unwrap_err();

        match err {
            BridgeError::Query(query_err) => {
                assert_eq!(query_err.status, StatusCode::METHOD_NOT_ALLOWED);
                assert_eq!(query_err.headers.get(header::ALLOW).unwrap(), "GET, POST");
            }
            other => panic!("expected query error, got {:?}", other.to_response().code),
        }
    }

    #[tokio::test]
    async fn test_malformed_body_is_400() {
        let err = run_http_query(
            &schema(),
            &OptionsProvider::default(),
            &Method::POST,
            QueryPayload::Json(serde_json::json!(42)),
            &head(Method::POST),
        )
        .await
        .unwrap_err();

        match err {
            BridgeError::Query(query_err) => {
                assert_eq!(query_err.status, StatusCode::BAD_REQUEST);
            }
            other => panic!("expected query error, got {:?}", other.to_response().code),
        }
    }

    #[tokio::test]
    async fn test_resolver_options_inject_context_data() {
        let provider = OptionsProvider::from_resolver(|_head: &Parts| async move {
            anyhow::Ok(RequestOptions::new().data(Viewer {
                name: "ada".to_string(),
            }))
        });

        let response = run_http_query(
            &schema(),
            &provider,
            &Method::POST,
            QueryPayload::Json(serde_json::json!({ "query": "{ viewer }" })),
            &head(Method::POST),
        )
        .await
        .unwrap();

        let body: serde_json::Value = serde_json::from_str(&response.body).unwrap();
        assert_eq!(body["data"]["viewer"], "ada");
    }

    #[tokio::test]
    async fn test_disable_introspection_applies() {
        let provider = OptionsProvider::from_static(
            crate::engine::options::StaticOptions::new().disable_introspection(),
        );

        let response = run_http_query(
            &schema(),
            &provider,
            &Method::POST,
            QueryPayload::Json(
                serde_json::json!({ "query": "{ __schema { queryType { name } } }" }),
            ),
            &head(Method::POST),
        )
        .await
        .unwrap();

        // introspection rejection is an execution error, still a 200 envelope
        assert_eq!(response.status, StatusCode::OK);
        let body: serde_json::Value = serde_json::from_str(&response.body).unwrap();
        assert!(body["errors"].is_array());
    }

    #[tokio::test]
    async fn test_batch_requests_execute() {
        let response = run_http_query(
            &schema(),
            &OptionsProvider::default(),
            &Method::POST,
            QueryPayload::Json(serde_json::json!([
                { "query": "{ hello }" },
                { "query": "{ viewer }" },
            ])),
            &head(Method::POST),
        )
        .await
        .unwrap();

        let body: serde_json::Value = serde_json::from_str(&response.body).unwrap();
        assert_eq!(body.as_array().map(Vec::len), Some(2));
        assert_eq!(body[0]["data"]["hello"], "world");
        // batch items run without per-request context data
        assert_eq!(body[1]["data"]["viewer"], "anonymous");
    }
}
