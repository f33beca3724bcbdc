//! Query and mutation roots and schema assembly

use async_graphql::{Context, EmptySubscription, ErrorExtensions, Object, Schema};

use crate::context::RequestContext;
use crate::criteria::FeedCriteria;
use crate::feed::{self, Feed};
use crate::link::Link;
use crate::mutation;
use crate::store::SharedStore;
use crate::types::LinkOrderByInput;

/// Schema type served by this crate
pub type LinkSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

#[derive(Default)]
pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// Links matching `filter` in description or url, with the total count
    async fn feed(
        &self,
        ctx: &Context<'_>,
        filter: Option<String>,
        skip: Option<i32>,
        take: Option<i32>,
        order_by: Option<Vec<LinkOrderByInput>>,
    ) -> async_graphql::Result<Feed> {
        let rctx = RequestContext::from_graphql(ctx)?;
        let criteria =
            FeedCriteria::from_args(filter.as_deref(), skip, take, order_by.as_deref())
                .map_err(|e| e.extend())?;
        feed::resolve_feed(&rctx, criteria)
            .await
            .map_err(|e| e.extend())
    }
}

#[derive(Default)]
pub struct MutationRoot;

#[Object]
impl MutationRoot {
    /// Post a new link as the calling user
    async fn post(
        &self,
        ctx: &Context<'_>,
        description: String,
        url: String,
    ) -> async_graphql::Result<Link> {
        let rctx = RequestContext::from_graphql(ctx)?;
        mutation::post(&rctx, description, url)
            .await
            .map_err(|e| e.extend())
    }

    /// Change a link's description and/or url. Empty values are ignored.
    async fn update(
        &self,
        ctx: &Context<'_>,
        id: i32,
        description: Option<String>,
        url: Option<String>,
    ) -> async_graphql::Result<Link> {
        let rctx = RequestContext::from_graphql(ctx)?;
        mutation::update(&rctx, id, description, url)
            .await
            .map_err(|e| e.extend())
    }

    async fn delete(&self, ctx: &Context<'_>, id: i32) -> async_graphql::Result<Option<Link>> {
        let rctx = RequestContext::from_graphql(ctx)?;
        mutation::delete(&rctx, id).await.map_err(|e| e.extend())
    }
}

/// Build the schema with the store injected as context data
pub fn build_schema(store: SharedStore) -> LinkSchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(store)
        .finish()
}

/// Export the schema in SDL form
pub fn export_sdl(store: SharedStore) -> String {
    build_schema(store).sdl()
}
