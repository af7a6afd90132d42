//! The executor adapter: translates transport requests into engine calls
//!
//! This module owns the seam between HTTP and the GraphQL engine. It knows
//! nothing about routing; the registrar in [`crate::server`] feeds it one
//! request at a time.

pub mod options;
pub mod query;

pub use options::{OptionsProvider, OptionsResolver, RequestOptions, StaticOptions};
pub use query::{QueryPayload, QueryResponse, run_http_query};
