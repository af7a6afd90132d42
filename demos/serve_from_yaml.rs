//! GraphQL server configured from a YAML settings block
//!
//! Run with: cargo run --example serve_from_yaml

use async_graphql::Object;
use bridge::prelude::*;

struct Query;

#[Object]
impl Query {
    async fn version(&self) -> &str {
        env!("CARGO_PKG_VERSION")
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let settings = MountSettings::from_yaml_str(
        r#"
path: /api/graphql
body_limit: 1048576
uploads:
  enabled: true
  max_file_size: 8388608
  max_num_files: 4
"#,
    )?;

    let schema = Schema::new(Query, EmptyMutation, EmptySubscription);

    println!("🚀 GraphQL server running on http://127.0.0.1:3000/api/graphql");

    settings
        .into_registration(GraphQlHost::new(schema))
        .serve("127.0.0.1:3000")
        .await
}
