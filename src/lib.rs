//! # GraphQL Bridge
//!
//! Mount a GraphQL executor onto an axum router.
//!
//! ## Features
//!
//! - **Query Endpoint**: GET and POST on a configurable mount path, backed
//!   by any `async_graphql::Executor`
//! - **Explicit Outcomes**: execution produces a `{status, headers, body}`
//!   value applied in one step, never piecemeal response mutation
//! - **Options Provider**: fixed execution settings or an async resolver
//!   from the request head, evaluated once per request
//! - **Interactive Explorer**: Playground served to browsers by content
//!   negotiation, with a host-level kill-switch
//! - **Health Check**: well-known endpoint with an optional async probe
//! - **Uploads**: multipart requests parsed into the engine request before
//!   the adapter runs
//! - **YAML Settings**: mount configuration loadable from deployment files
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use bridge::prelude::*;
//!
//! let schema = Schema::new(Query, EmptyMutation, EmptySubscription);
//!
//! let app = ServerRegistration::new()
//!     .with_server(GraphQlHost::new(schema))
//!     .on_health_check(|| async { Ok(()) })
//!     .build()?;
//!
//! // axum::serve(listener, app).await?;
//! ```

pub mod config;
pub mod core;
pub mod engine;
pub mod server;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        error::{BridgeError, BridgeResult, ConfigError, HttpQueryError},
        negotiate::prefers_html,
    };

    // === Engine ===
    pub use crate::engine::{
        options::{OptionsProvider, OptionsResolver, RequestOptions, StaticOptions},
        query::{QueryPayload, QueryResponse, run_http_query},
    };

    // === Server ===
    pub use crate::server::{
        DEFAULT_BODY_LIMIT, DEFAULT_GRAPHQL_PATH, HEALTH_CHECK_CONTENT_TYPE, HEALTH_CHECK_PATH,
        GraphQlHost, HealthCheck, ServerRegistration, UploadLimits, UploadsConfig,
    };

    // === Config ===
    pub use crate::config::{MountSettings, UploadSettings};

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_graphql::{EmptyMutation, EmptySubscription, Schema};
    pub use async_trait::async_trait;
    pub use serde::{Deserialize, Serialize};

    // === Axum ===
    pub use axum::{
        Router,
        http::{HeaderMap, StatusCode},
    };
}
