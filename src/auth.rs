//! GraphQL authentication context extraction
//!
//! Authentication happens upstream. By the time a request reaches this
//! service the caller is reduced to an optional user id carried in the
//! `x-user-id` header. This module provides helpers for:
//! - Extracting that id from HTTP headers
//! - Injecting it into the GraphQL request data
//! - Reading it back inside resolvers

use async_graphql::http::GraphiQLSource;
use async_graphql::{Context, Request, Response, Schema};
use axum::{extract::Extension, http::HeaderMap, response::Html, Json};

/// Header carrying the authenticated user id
pub const USER_ID_HEADER: &str = "x-user-id";

/// Authenticated user id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(pub i32);

/// Extract the user id from the `x-user-id` header.
///
/// A missing or malformed header means the caller is anonymous.
pub fn extract_user_id(headers: &HeaderMap) -> Option<UserId> {
    headers
        .get(USER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse::<i32>().ok())
        .map(UserId)
}

/// Standard GraphQL handler with user id injection
///
/// # Example
///
/// ```rust,no_run
/// use axum::{Router, routing::post};
/// use linkfeed_graphql::{graphql_handler, MutationRoot, QueryRoot};
/// use async_graphql::EmptySubscription;
///
/// let app: Router = Router::new()
///     .route("/graphql", post(graphql_handler::<QueryRoot, MutationRoot, EmptySubscription>));
/// ```
pub async fn graphql_handler<Query, Mutation, Subscription>(
    Extension(schema): Extension<Schema<Query, Mutation, Subscription>>,
    headers: HeaderMap,
    req: Json<Request>,
) -> Json<Response>
where
    Query: async_graphql::ObjectType + 'static,
    Mutation: async_graphql::ObjectType + 'static,
    Subscription: async_graphql::SubscriptionType + 'static,
{
    let mut request = req.0;

    match extract_user_id(&headers) {
        Some(uid) => {
            tracing::debug!(user_id = uid.0, "authenticated request");
            request = request.data(uid);
        }
        None if headers.contains_key(USER_ID_HEADER) => {
            tracing::warn!("ignoring malformed {} header", USER_ID_HEADER);
        }
        None => {}
    }

    Json(schema.execute(request).await)
}

/// GraphiQL page pointed at the `/graphql` endpoint
pub async fn graphiql() -> Html<String> {
    Html(GraphiQLSource::build().endpoint("/graphql").finish())
}

/// Get the user id from GraphQL context
///
/// # Example
///
/// ```rust,no_run
/// use async_graphql::Context;
/// use linkfeed_graphql::auth::{get_user_id, UserId};
///
/// fn resolver(ctx: &Context<'_>) -> Option<UserId> {
///     get_user_id(ctx)
/// }
/// ```
pub fn get_user_id(ctx: &Context<'_>) -> Option<UserId> {
    ctx.data_opt::<UserId>().copied()
}
