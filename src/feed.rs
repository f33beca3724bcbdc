//! Feed resolution

use async_graphql::SimpleObject;

use crate::context::RequestContext;
use crate::criteria::FeedCriteria;
use crate::link::Link;

/// One page of links plus the number of links matching the filter
#[derive(SimpleObject, Debug, Clone)]
pub struct Feed {
    pub links: Vec<Link>,
    pub count: i64,
}

/// List links for the criteria together with the total matching count.
///
/// The listing and the count run concurrently against the same predicate;
/// the count ignores the window and ordering.
pub async fn resolve_feed(ctx: &RequestContext, criteria: FeedCriteria) -> crate::Result<Feed> {
    tracing::debug!(?criteria, "resolving feed");

    let (links, count) = tokio::try_join!(
        ctx.store.find_links(&criteria),
        ctx.store.count_links(&criteria.predicate),
    )?;

    Ok(Feed {
        links: links.into_iter().map(Link::from).collect(),
        count: i64::try_from(count).unwrap_or(i64::MAX),
    })
}
