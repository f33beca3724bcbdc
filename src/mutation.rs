//! Link mutations
//!
//! Only `post` checks the caller. `update` and `delete` accept any caller,
//! authenticated or not, and do not compare the caller with the owner.

use crate::context::RequestContext;
use crate::link::Link;
use crate::store::{LinkChanges, NewLink};

/// Create a link owned by the calling user
pub async fn post(ctx: &RequestContext, description: String, url: String) -> crate::Result<Link> {
    let user_id = ctx
        .require_user()
        .inspect_err(|_| tracing::warn!("rejected post from anonymous caller"))?;

    let record = ctx
        .store
        .create_link(NewLink {
            description,
            url,
            posted_by_id: user_id.0,
        })
        .await?;
    tracing::info!(link_id = record.id, user_id = user_id.0, "link posted");
    Ok(record.into())
}

/// Update description and/or url of a link.
///
/// Empty strings are treated exactly like absent values: the stored field
/// is left as it is.
pub async fn update(
    ctx: &RequestContext,
    id: i32,
    description: Option<String>,
    url: Option<String>,
) -> crate::Result<Link> {
    let changes = LinkChanges {
        description: non_empty(description),
        url: non_empty(url),
    };
    let record = ctx.store.update_link(id, changes).await?;
    tracing::info!(link_id = id, "link updated");
    Ok(record.into())
}

/// Delete a link, returning it as it was before removal
pub async fn delete(ctx: &RequestContext, id: i32) -> crate::Result<Option<Link>> {
    let record = ctx.store.delete_link(id).await?;
    tracing::info!(link_id = id, "link deleted");
    Ok(Some(record.into()))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
