//! Server host: the engine-side instance the registrar mounts
//!
//! `GraphQlHost` bundles the executor with everything the transport layer
//! needs to know about it: how to produce per-request execution options,
//! whether interactive tooling is allowed, where subscriptions live, and
//! how server errors are formatted before leaving the process. It is
//! transport-agnostic and shared read-only across requests.

use crate::engine::options::OptionsProvider;
use async_graphql::{Executor, ServerError};
use std::sync::Arc;

/// Rewrites a server error before it is serialized to a client
pub type ErrorFormatter = Arc<dyn Fn(ServerError) -> ServerError + Send + Sync>;

/// The server instance mounted by [`ServerRegistration`](crate::server::ServerRegistration)
///
/// # Example
///
/// ```rust,ignore
/// let host = GraphQlHost::new(schema)
///     .with_options(OptionsProvider::from_resolver(auth_resolver))
///     .with_subscriptions_path("/graphql/ws");
/// ```
pub struct GraphQlHost<E> {
    pub(crate) executor: E,

    /// Execution options source, evaluated at most once per request
    pub(crate) options: OptionsProvider,

    /// Kill-switch for the interactive explorer
    pub(crate) disable_tools: bool,

    /// Subscriptions endpoint advertised to the explorer
    pub(crate) subscriptions_path: Option<String>,

    /// Applied to upload-parsing errors before they are rendered
    pub(crate) format_error: Option<ErrorFormatter>,
}

impl<E: Executor> GraphQlHost<E> {
    pub fn new(executor: E) -> Self {
        Self {
            executor,
            options: OptionsProvider::default(),
            disable_tools: false,
            subscriptions_path: None,
            format_error: None,
        }
    }

    /// Set the execution options provider
    pub fn with_options(mut self, options: OptionsProvider) -> Self {
        self.options = options;
        self
    }

    /// Advertise a subscriptions endpoint to the explorer
    pub fn with_subscriptions_path(mut self, path: impl Into<String>) -> Self {
        self.subscriptions_path = Some(path.into());
        self
    }

    /// Install an error formatter for upload-parsing failures
    pub fn with_error_formatter(
        mut self,
        formatter: impl Fn(ServerError) -> ServerError + Send + Sync + 'static,
    ) -> Self {
        self.format_error = Some(Arc::new(formatter));
        self
    }

    /// Disable interactive tooling; every request goes to the adapter
    pub fn disable_tools(mut self) -> Self {
        self.disable_tools = true;
        self
    }

    /// Run errors through the configured formatter, if any
    pub(crate) fn format_errors(&self, errors: Vec<ServerError>) -> Vec<ServerError> {
        match &self.format_error {
            Some(formatter) => errors.into_iter().map(|err| formatter(err)).collect(),
            None => errors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_graphql::{EmptyMutation, EmptySubscription, Object, Schema};

    struct Query;

    #[Object]
    impl Query {
        async fn ping(&self) -> &str {
            "pong"
        }
    }

    #[test]
    fn test_host_defaults() {
        let host = GraphQlHost::new(Schema::new(Query, EmptyMutation, EmptySubscription));
        assert!(!host.disable_tools);
        assert!(host.subscriptions_path.is_none());
        assert!(host.format_error.is_none());
    }

    #[test]
    fn test_error_formatter_is_applied() {
        let host = GraphQlHost::new(Schema::new(Query, EmptyMutation, EmptySubscription))
            .with_error_formatter(|mut err| {
                err.message = format!("redacted: {}", err.message);
                err
            });

        let formatted = host.format_errors(vec![ServerError::new("boom", None)]);
        assert_eq!(formatted[0].message, "redacted: boom");
    }
}
