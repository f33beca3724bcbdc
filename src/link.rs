//! Link and User object types and the link relation resolvers
//!
//! Relations are never denormalized onto [`Link`]. Each `postedBy` or
//! `voters` field access looks the link up again by id and follows the
//! named relation through the store, one lookup per access.

use async_graphql::{Context, ErrorExtensions, Object, SimpleObject};

use crate::context::RequestContext;
use crate::store::{LinkRecord, UserRecord};
use crate::types::DateTime;

/// User as seen through link relations
#[derive(SimpleObject, Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
}

impl From<UserRecord> for User {
    fn from(record: UserRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            email: record.email,
        }
    }
}

/// Link object
#[derive(Debug, Clone)]
pub struct Link {
    pub record: LinkRecord,
}

impl From<LinkRecord> for Link {
    fn from(record: LinkRecord) -> Self {
        Self { record }
    }
}

#[Object]
impl Link {
    async fn id(&self) -> i32 {
        self.record.id
    }

    async fn description(&self) -> &str {
        &self.record.description
    }

    async fn url(&self) -> &str {
        &self.record.url
    }

    async fn created_at(&self) -> DateTime {
        self.record.created_at.into()
    }

    /// Current owner of the link
    async fn posted_by(&self, ctx: &Context<'_>) -> async_graphql::Result<Option<User>> {
        let rctx = RequestContext::from_graphql(ctx)?;
        posted_by(&rctx, self.record.id).await.map_err(|e| e.extend())
    }

    /// Users who voted for the link
    async fn voters(&self, ctx: &Context<'_>) -> async_graphql::Result<Vec<User>> {
        let rctx = RequestContext::from_graphql(ctx)?;
        voters(&rctx, self.record.id).await.map_err(|e| e.extend())
    }
}

/// Owner of the link with the given id
pub async fn posted_by(ctx: &RequestContext, link_id: i32) -> crate::Result<Option<User>> {
    let owner = ctx.store.link_posted_by(link_id).await?;
    Ok(owner.map(User::from))
}

/// Voters for the link with the given id
pub async fn voters(ctx: &RequestContext, link_id: i32) -> crate::Result<Vec<User>> {
    let users = ctx.store.link_voters(link_id).await?;
    Ok(users.into_iter().map(User::from).collect())
}
