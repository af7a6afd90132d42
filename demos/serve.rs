//! Minimal GraphQL server mounted with graphql-bridge
//!
//! Run with: cargo run --example serve
//!
//! Then open http://127.0.0.1:3000/graphql in a browser for the Playground,
//! or POST queries to the same path.

use async_graphql::Object;
use bridge::prelude::*;

struct Query;

#[Object]
impl Query {
    async fn hello(&self) -> &str {
        "world"
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let schema = Schema::new(Query, EmptyMutation, EmptySubscription);

    println!("🚀 GraphQL server running on http://127.0.0.1:3000");
    println!("\n📚 Available endpoints:");
    println!("    GET/POST /graphql                          - GraphQL endpoint + Playground");
    println!("    GET      /.well-known/apollo/server-health - Health check");

    ServerRegistration::new()
        .with_server(GraphQlHost::new(schema).with_subscriptions_path("/graphql/ws"))
        .on_health_check(|| async { anyhow::Ok(()) })
        .serve("127.0.0.1:3000")
        .await
}
