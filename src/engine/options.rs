//! Execution options and the options provider
//!
//! Every adapter call runs under a set of [`RequestOptions`]: context data
//! injected into the engine request plus execution flags. Where the options
//! come from is a sum type: a fixed [`StaticOptions`] value reused for every
//! request, or an [`OptionsResolver`] computed from the inbound request
//! head. The provider is evaluated at most once per request.

use crate::core::error::HttpQueryError;
use anyhow::Result;
use async_graphql::Data;
use async_trait::async_trait;
use axum::http::request::Parts;

/// Options applied to a single execution
#[derive(Debug, Default)]
pub struct RequestOptions {
    /// Context data made visible to resolvers for this request
    pub data: Data,

    /// Reject introspection queries for this request
    pub disable_introspection: bool,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a context value visible to resolvers
    pub fn data<D: std::any::Any + Send + Sync>(mut self, data: D) -> Self {
        self.data.insert(data);
        self
    }

    pub fn disable_introspection(mut self) -> Self {
        self.disable_introspection = true;
        self
    }
}

/// Fixed execution settings, rebuilt into [`RequestOptions`] per request
///
/// Context data is a type-map and cannot be cloned, so the static variant
/// only carries settings that are cheap to re-materialize.
#[derive(Debug, Clone, Default)]
pub struct StaticOptions {
    pub disable_introspection: bool,
}

impl StaticOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn disable_introspection(mut self) -> Self {
        self.disable_introspection = true;
        self
    }

    fn to_request_options(&self) -> RequestOptions {
        RequestOptions {
            data: Data::default(),
            disable_introspection: self.disable_introspection,
        }
    }
}

/// Computes per-request execution options from the inbound request head
///
/// Implemented automatically for closures of the shape
/// `Fn(&Parts) -> impl Future<Output = Result<RequestOptions>>`. Typical use
/// is pulling authentication out of the headers:
///
/// ```rust,ignore
/// let provider = OptionsProvider::from_resolver(|head: &Parts| {
///     let token = head.headers.get(AUTHORIZATION).cloned();
///     async move { Ok(RequestOptions::new().data(Identity::from_token(token)?)) }
/// });
/// ```
#[async_trait]
pub trait OptionsResolver: Send + Sync {
    async fn resolve(&self, head: &Parts) -> Result<RequestOptions>;
}

#[async_trait]
impl<F, Fut> OptionsResolver for F
where
    F: Fn(&Parts) -> Fut + Send + Sync,
    Fut: std::future::Future<Output = Result<RequestOptions>> + Send,
{
    async fn resolve(&self, head: &Parts) -> Result<RequestOptions> {
        (self)(head).await
    }
}

/// Where execution options come from: a fixed value or a per-request resolver
pub enum OptionsProvider {
    /// The same settings for every request
    Static(StaticOptions),

    /// Options computed from the request head, once per request
    Resolver(Box<dyn OptionsResolver>),
}

impl Default for OptionsProvider {
    fn default() -> Self {
        OptionsProvider::Static(StaticOptions::default())
    }
}

impl OptionsProvider {
    pub fn from_static(options: StaticOptions) -> Self {
        OptionsProvider::Static(options)
    }

    pub fn from_resolver(resolver: impl OptionsResolver + 'static) -> Self {
        OptionsProvider::Resolver(Box::new(resolver))
    }

    /// Evaluate the provider for one request
    ///
    /// Resolver failures are a server-side configuration problem surfaced to
    /// the client as a 500 query error, mirroring how a failing options
    /// computation is reported rather than swallowed.
    pub(crate) async fn resolve(&self, head: &Parts) -> Result<RequestOptions, HttpQueryError> {
        match self {
            OptionsProvider::Static(options) => Ok(options.to_request_options()),
            OptionsProvider::Resolver(resolver) => {
                resolver.resolve(head).await.map_err(|err| {
                    tracing::warn!(error = %err, "options resolver failed");
                    HttpQueryError::internal(format!("Invalid options provided: {}", err))
                })
            }
        }
    }
}
