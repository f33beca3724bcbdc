//! Per-request resolver context

use async_graphql::Context;

use crate::auth::{get_user_id, UserId};
use crate::store::SharedStore;

/// Everything a resolver needs from the ambient request: who is calling and
/// which store to talk to. Built once per field resolution and passed by
/// reference into resolver functions.
#[derive(Clone)]
pub struct RequestContext {
    pub user_id: Option<UserId>,
    pub store: SharedStore,
}

impl RequestContext {
    pub fn new(store: SharedStore, user_id: Option<UserId>) -> Self {
        Self { user_id, store }
    }

    /// Read the store from schema data and the user id from request data
    pub fn from_graphql(ctx: &Context<'_>) -> async_graphql::Result<Self> {
        let store = ctx.data::<SharedStore>()?.clone();
        Ok(Self::new(store, get_user_id(ctx)))
    }

    /// The caller's id, or `Unauthenticated` for anonymous callers
    pub fn require_user(&self) -> crate::Result<UserId> {
        self.user_id.ok_or(crate::LinkError::Unauthenticated)
    }
}

impl std::fmt::Debug for RequestContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestContext")
            .field("user_id", &self.user_id)
            .finish_non_exhaustive()
    }
}
