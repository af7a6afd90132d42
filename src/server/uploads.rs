//! Multipart upload interception
//!
//! Runs as route middleware ahead of the endpoint handler. Multipart
//! requests are parsed into an engine request up front; the parsed value
//! replaces the request body for the rest of the chain. Parse failures are
//! formatted through the host's error formatter and carried downstream for
//! rendering; they never abort the chain silently.

use crate::server::host::GraphQlHost;
use crate::server::router::MountState;
use async_graphql::http::{MultipartOptions, receive_batch_body};
use async_graphql::{BatchRequest, Executor, ParseRequestError, ServerError};
use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::{StatusCode, header};
use axum::middleware::Next;
use axum::response::Response;
use futures::TryStreamExt;
use std::sync::{Arc, Mutex};

/// Limits applied while parsing a multipart request
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct UploadLimits {
    /// Maximum size of a single uploaded file, in bytes
    pub max_file_size: Option<usize>,

    /// Maximum number of files in one request
    pub max_num_files: Option<usize>,
}

impl UploadLimits {
    pub(crate) fn to_multipart_options(&self) -> MultipartOptions {
        let mut options = MultipartOptions::default();
        if let Some(size) = self.max_file_size {
            options = options.max_file_size(size);
        }
        if let Some(count) = self.max_num_files {
            options = options.max_num_files(count);
        }
        options
    }
}

/// Whether the upload pipeline is installed, and with which limits
#[derive(Debug, Clone)]
pub enum UploadsConfig {
    Enabled(UploadLimits),
    Disabled,
}

impl Default for UploadsConfig {
    fn default() -> Self {
        UploadsConfig::Enabled(UploadLimits::default())
    }
}

/// The parsed multipart body, replacing the raw body downstream
///
/// Request extensions must be cloneable; the one consumer takes the value
/// out through the mutex.
#[derive(Clone)]
pub(crate) struct PreparedBody(Arc<Mutex<Option<BatchRequest>>>);

impl PreparedBody {
    fn new(batch: BatchRequest) -> Self {
        Self(Arc::new(Mutex::new(Some(batch))))
    }

    pub(crate) fn take(&self) -> Option<BatchRequest> {
        self.0.lock().ok().and_then(|mut guard| guard.take())
    }
}

/// A formatted upload-parse failure, rendered by the endpoint handler
#[derive(Debug, Clone)]
pub(crate) struct UploadFailure {
    pub status: StatusCode,
    pub errors: Vec<ServerError>,
}

pub(crate) fn is_multipart(content_type: Option<&str>) -> bool {
    content_type
        .map(|value| {
            value
                .to_ascii_lowercase()
                .starts_with("multipart/form-data")
        })
        .unwrap_or(false)
}

/// Route middleware: rewrite multipart bodies before the adapter runs
pub(crate) async fn intercept_uploads<E: Executor>(
    State(state): State<Arc<MountState<E>>>,
    request: Request,
    next: Next,
) -> Response {
    let limits = match &state.uploads {
        UploadsConfig::Enabled(limits) => limits.clone(),
        UploadsConfig::Disabled => return next.run(request).await,
    };

    let content_type = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);

    if !is_multipart(content_type.as_deref()) {
        return next.run(request).await;
    }

    let (mut parts, body) = request.into_parts();
    let reader = body
        .into_data_stream()
        .map_err(std::io::Error::other)
        .into_async_read();

    match receive_batch_body(
        content_type.as_deref(),
        reader,
        limits.to_multipart_options(),
    )
    .await
    {
        Ok(batch) => {
            parts.extensions.insert(PreparedBody::new(batch));
        }
        Err(err) => {
            let status = upload_error_status(&err);
            tracing::debug!(error = %err, %status, "multipart parsing failed");
            let errors = format_upload_error(&state.host, err);
            parts.extensions.insert(UploadFailure { status, errors });
        }
    }

    next.run(Request::from_parts(parts, Body::empty())).await
}

fn upload_error_status(err: &ParseRequestError) -> StatusCode {
    match err {
        ParseRequestError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
        _ => StatusCode::BAD_REQUEST,
    }
}

fn format_upload_error<E: Executor>(
    host: &GraphQlHost<E>,
    err: ParseRequestError,
) -> Vec<ServerError> {
    host.format_errors(vec![ServerError::new(err.to_string(), None)])
}
