//! Link feed GraphQL server
//!
//! Serves the schema over HTTP:
//! - `POST /graphql` executes a request, with the caller taken from `x-user-id`
//! - `GET /graphql` serves GraphiQL
//!
//! `--print-schema` prints the SDL and exits without touching the database.

use std::sync::Arc;

use async_graphql::EmptySubscription;
use axum::{routing::get, Extension, Router};
use linkfeed_graphql::store::{ensure_tables, MemoryStore, SeaOrmLinkStore};
use linkfeed_graphql::{
    build_schema, export_sdl, graphiql, graphql_handler, Config, MutationRoot, QueryRoot,
};
use sea_orm::Database;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if std::env::args().any(|arg| arg == "--print-schema") {
        print!("{}", export_sdl(Arc::new(MemoryStore::new())));
        return Ok(());
    }

    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,sqlx=warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    tracing::info!("Connecting to database...");
    let db = Database::connect(&config.database_url).await?;
    tracing::info!("Database connected!");

    if config.auto_migrate {
        ensure_tables(&db).await?;
    }

    let schema = build_schema(Arc::new(SeaOrmLinkStore::new(db)));

    let app = Router::new()
        .route(
            "/graphql",
            get(graphiql).post(graphql_handler::<QueryRoot, MutationRoot, EmptySubscription>),
        )
        .layer(Extension(schema));

    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!("GraphQL server listening on {}", config.listen_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
