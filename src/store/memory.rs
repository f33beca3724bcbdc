//! In-process link store

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::DbErr;
use serde::Deserialize;
use tokio::sync::Mutex;

use super::{link_not_found, LinkChanges, LinkRecord, LinkStore, NewLink, StoreError, UserRecord};
use crate::criteria::{FeedCriteria, LinkPredicate, SortField};
use crate::types::Sort;

/// Seed data for a [`MemoryStore`], usually loaded from JSON
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Fixture {
    pub users: Vec<UserRecord>,
    pub links: Vec<LinkRecord>,
    /// `(link_id, user_id)` pairs
    pub votes: Vec<(i32, i32)>,
}

#[derive(Debug, Default)]
struct State {
    users: BTreeMap<i32, UserRecord>,
    links: BTreeMap<i32, LinkRecord>,
    votes: BTreeSet<(i32, i32)>,
    next_link_id: i32,
}

/// Link store held in memory. Links iterate in id order.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding the fixture's records
    pub fn from_fixture(fixture: Fixture) -> Self {
        let next_link_id = fixture.links.iter().map(|l| l.id).max().unwrap_or(0);
        let state = State {
            users: fixture.users.into_iter().map(|u| (u.id, u)).collect(),
            links: fixture.links.into_iter().map(|l| (l.id, l)).collect(),
            votes: fixture.votes.into_iter().collect(),
            next_link_id,
        };
        Self {
            state: Mutex::new(state),
        }
    }

    /// Parse a JSON fixture
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        Ok(Self::from_fixture(serde_json::from_str(json)?))
    }

    /// Insert or replace a user
    pub async fn add_user(&self, user: UserRecord) {
        let mut state = self.state.lock().await;
        state.users.insert(user.id, user);
    }

    /// Record a vote by `user_id` for `link_id`
    pub async fn add_vote(&self, link_id: i32, user_id: i32) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;
        if !state.links.contains_key(&link_id) {
            return Err(link_not_found(link_id));
        }
        if !state.users.contains_key(&user_id) {
            return Err(user_not_found(user_id));
        }
        state.votes.insert((link_id, user_id));
        Ok(())
    }

    /// Look up a link directly, bypassing the feed
    pub async fn get_link(&self, id: i32) -> Option<LinkRecord> {
        self.state.lock().await.links.get(&id).cloned()
    }

    /// Number of stored links
    pub async fn len(&self) -> usize {
        self.state.lock().await.links.len()
    }

    /// Whether no links are stored
    pub async fn is_empty(&self) -> bool {
        self.state.lock().await.links.is_empty()
    }
}

fn user_not_found(id: i32) -> StoreError {
    StoreError::NotFound(format!("No User found with id {}", id))
}

fn compare(a: &LinkRecord, b: &LinkRecord, order: &[(SortField, Sort)]) -> Ordering {
    order
        .iter()
        .map(|(field, sort)| {
            let ord = match field {
                SortField::Description => a.description.cmp(&b.description),
                SortField::Url => a.url.cmp(&b.url),
                SortField::CreatedAt => a.created_at.cmp(&b.created_at),
            };
            match sort {
                Sort::Asc => ord,
                Sort::Desc => ord.reverse(),
            }
        })
        .find(|ord| *ord != Ordering::Equal)
        .unwrap_or(Ordering::Equal)
}

#[async_trait]
impl LinkStore for MemoryStore {
    #[tracing::instrument(skip(self))]
    async fn find_links(&self, criteria: &FeedCriteria) -> Result<Vec<LinkRecord>, StoreError> {
        let state = self.state.lock().await;
        let mut links: Vec<LinkRecord> = state
            .links
            .values()
            .filter(|l| criteria.predicate.matches(&l.description, &l.url))
            .cloned()
            .collect();
        links.sort_by(|a, b| compare(a, b, &criteria.order));
        Ok(criteria.window.apply(links))
    }

    #[tracing::instrument(skip(self))]
    async fn count_links(&self, predicate: &LinkPredicate) -> Result<u64, StoreError> {
        let state = self.state.lock().await;
        let count = state
            .links
            .values()
            .filter(|l| predicate.matches(&l.description, &l.url))
            .count();
        Ok(count as u64)
    }

    #[tracing::instrument(skip(self))]
    async fn create_link(&self, new_link: NewLink) -> Result<LinkRecord, StoreError> {
        let mut state = self.state.lock().await;
        if !state.users.contains_key(&new_link.posted_by_id) {
            return Err(user_not_found(new_link.posted_by_id));
        }

        let id = state
            .next_link_id
            .checked_add(1)
            .ok_or_else(|| StoreError::Database(DbErr::Custom("link id space exhausted".to_string())))?;
        state.next_link_id = id;
        let link = LinkRecord {
            id,
            description: new_link.description,
            url: new_link.url,
            created_at: Utc::now(),
            posted_by_id: Some(new_link.posted_by_id),
        };
        state.links.insert(link.id, link.clone());
        Ok(link)
    }

    #[tracing::instrument(skip(self))]
    async fn update_link(&self, id: i32, changes: LinkChanges) -> Result<LinkRecord, StoreError> {
        let mut state = self.state.lock().await;
        let link = state.links.get_mut(&id).ok_or_else(|| link_not_found(id))?;
        if let Some(description) = changes.description {
            link.description = description;
        }
        if let Some(url) = changes.url {
            link.url = url;
        }
        Ok(link.clone())
    }

    #[tracing::instrument(skip(self))]
    async fn delete_link(&self, id: i32) -> Result<LinkRecord, StoreError> {
        let mut state = self.state.lock().await;
        let link = state.links.remove(&id).ok_or_else(|| link_not_found(id))?;
        state.votes.retain(|(link_id, _)| *link_id != id);
        Ok(link)
    }

    #[tracing::instrument(skip(self))]
    async fn link_posted_by(&self, id: i32) -> Result<Option<UserRecord>, StoreError> {
        let state = self.state.lock().await;
        let owner = state
            .links
            .get(&id)
            .and_then(|l| l.posted_by_id)
            .and_then(|user_id| state.users.get(&user_id))
            .cloned();
        Ok(owner)
    }

    #[tracing::instrument(skip(self))]
    async fn link_voters(&self, id: i32) -> Result<Vec<UserRecord>, StoreError> {
        let state = self.state.lock().await;
        let voters = state
            .votes
            .range((id, i32::MIN)..=(id, i32::MAX))
            .filter_map(|(_, user_id)| state.users.get(user_id).cloned())
            .collect();
        Ok(voters)
    }
}
