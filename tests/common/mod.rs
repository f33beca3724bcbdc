#![allow(dead_code)]

use std::sync::Arc;

use async_graphql::{Request, Variables};
use linkfeed_graphql::store::MemoryStore;
use linkfeed_graphql::{build_schema, LinkSchema, UserId};
use serde_json::Value;

pub const FIXTURE: &str = r#"{
    "users": [
        {"id": 1, "name": "Alice", "email": "alice@example.com"},
        {"id": 2, "name": "Bob", "email": "bob@example.com"}
    ],
    "links": [
        {"id": 1, "description": "Fullstack tutorial for GraphQL", "url": "www.howtographql.com",
         "created_at": "2024-01-01T00:00:00Z", "posted_by_id": 1},
        {"id": 2, "description": "GraphQL official website", "url": "graphql.org",
         "created_at": "2024-01-02T00:00:00Z", "posted_by_id": 2},
        {"id": 3, "description": "The Rust programming language", "url": "rust-lang.org",
         "created_at": "2024-01-03T00:00:00Z", "posted_by_id": 1},
        {"id": 4, "description": "Prisma ORM", "url": "prisma.io",
         "created_at": "2024-01-04T00:00:00Z", "posted_by_id": null}
    ],
    "votes": [[1, 1], [1, 2], [3, 2]]
}"#;

pub struct TestApp {
    pub store: Arc<MemoryStore>,
    pub schema: LinkSchema,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_fixture(FIXTURE)
    }

    pub fn with_fixture(fixture: &str) -> Self {
        let store = Arc::new(MemoryStore::from_json(fixture).unwrap());
        let schema = build_schema(store.clone());
        Self { store, schema }
    }

    pub async fn execute(
        &self,
        query: &str,
        variables: Value,
        user: Option<i32>,
    ) -> async_graphql::Response {
        let mut request = Request::new(query).variables(Variables::from_json(variables));
        if let Some(id) = user {
            request = request.data(UserId(id));
        }
        self.schema.execute(request).await
    }

    /// Execute and return `data` as JSON, panicking on GraphQL errors
    pub async fn data(&self, query: &str, variables: Value, user: Option<i32>) -> Value {
        let response = self.execute(query, variables, user).await;
        assert!(response.errors.is_empty(), "{:?}", response.errors);
        response.data.into_json().unwrap()
    }
}

/// `extensions.code` of the first error
pub fn error_code(response: &async_graphql::Response) -> Option<String> {
    response
        .errors
        .first()
        .and_then(|e| e.extensions.as_ref())
        .and_then(|ext| ext.get("code"))
        .and_then(|code| match code {
            async_graphql::Value::String(s) => Some(s.clone()),
            _ => None,
        })
}
