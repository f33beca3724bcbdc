//! # linkfeed-graphql
//!
//! GraphQL API for a link feed backed by a relational store.
//!
//! ## Features
//!
//! - **Feed** - Filtered, sorted, offset-paginated listing with a total count
//! - **Link Mutations** - `post`, `update` and `delete`
//! - **Relations** - Lazy `postedBy` and `voters` lookups per field
//! - **Storage** - `LinkStore` gateway with SeaORM and in-memory backends
//! - **Auth Context** - Derived user id extraction for GraphQL handlers
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use linkfeed_graphql::{build_schema, store::MemoryStore};
//!
//! # async fn example() {
//! let schema = build_schema(Arc::new(MemoryStore::new()));
//! let response = schema.execute("{ feed { count } }").await;
//! # }
//! ```

pub mod auth;
pub mod config;
pub mod context;
pub mod criteria;
pub mod entities;
pub mod feed;
pub mod link;
pub mod mutation;
pub mod pagination;
pub mod schema;
pub mod store;
pub mod types;

pub use auth::{extract_user_id, get_user_id, graphql_handler, graphiql, UserId};
pub use config::Config;
pub use context::RequestContext;
pub use criteria::{FeedCriteria, LinkPredicate, SortField};
pub use pagination::Window;
pub use schema::{build_schema, export_sdl, LinkSchema, MutationRoot, QueryRoot};
pub use store::{LinkStore, SharedStore, StoreError};
pub use types::{DateTime, Sort};

use async_graphql::ErrorExtensions;
use thiserror::Error;

/// Resolver errors
#[derive(Error, Debug)]
pub enum LinkError {
    #[error("Cannot post without logging in.")]
    Unauthenticated,

    #[error("{0}")]
    NotFound(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error(transparent)]
    Storage(StoreError),
}

impl LinkError {
    /// Stable machine-readable code carried in `extensions.code`
    pub fn code(&self) -> &'static str {
        match self {
            LinkError::Unauthenticated => "UNAUTHENTICATED",
            LinkError::NotFound(_) => "NOT_FOUND",
            LinkError::InvalidArgument(_) => "BAD_USER_INPUT",
            LinkError::Storage(_) => "INTERNAL",
        }
    }
}

impl From<StoreError> for LinkError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(msg) => LinkError::NotFound(msg),
            other => LinkError::Storage(other),
        }
    }
}

impl ErrorExtensions for LinkError {
    fn extend(&self) -> async_graphql::Error {
        async_graphql::Error::new(self.to_string()).extend_with(|_, e| e.set("code", self.code()))
    }
}

/// Result type for resolver operations
pub type Result<T> = std::result::Result<T, LinkError>;
