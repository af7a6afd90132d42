//! Server module: registering a GraphQL host onto an axum router
//!
//! This module provides a `ServerRegistration` that registers:
//! - the query endpoint on the mount path (all methods), with trace, CORS
//!   and upload-interception layers
//! - the interactive explorer for browser GETs
//! - the well-known health-check endpoint

pub mod builder;
pub mod health;
pub mod host;
pub mod router;
pub mod uploads;

pub use builder::{DEFAULT_BODY_LIMIT, DEFAULT_GRAPHQL_PATH, ServerRegistration};
pub use health::{HEALTH_CHECK_CONTENT_TYPE, HEALTH_CHECK_PATH, HealthCheck};
pub use host::{ErrorFormatter, GraphQlHost};
pub use uploads::{UploadLimits, UploadsConfig};
