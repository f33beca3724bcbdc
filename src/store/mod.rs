//! Data access gateway
//!
//! Resolvers only talk to storage through [`LinkStore`]. Two backends ship
//! with the crate: [`SeaOrmLinkStore`] for a relational database and
//! [`MemoryStore`] for tests and local experiments.

mod memory;
mod seaorm;

pub use memory::{Fixture, MemoryStore};
pub use seaorm::{ensure_tables, SeaOrmLinkStore};

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::criteria::{FeedCriteria, LinkPredicate};

/// Storage errors
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("not found: {0}")]
    NotFound(String),
}

/// Stored link
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRecord {
    pub id: i32,
    pub description: String,
    pub url: String,
    pub created_at: DateTime<Utc>,
    pub posted_by_id: Option<i32>,
}

/// Stored user, without credentials
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: i32,
    pub name: String,
    pub email: String,
}

/// Values for a new link
#[derive(Debug, Clone)]
pub struct NewLink {
    pub description: String,
    pub url: String,
    pub posted_by_id: i32,
}

/// Field changes for an existing link. `None` leaves the column as is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkChanges {
    pub description: Option<String>,
    pub url: Option<String>,
}

impl LinkChanges {
    /// Whether applying these changes would touch any column
    pub fn is_empty(&self) -> bool {
        self.description.is_none() && self.url.is_none()
    }
}

/// Entity-scoped operations over links and their relations
#[async_trait]
pub trait LinkStore: Send + Sync {
    /// Links matching the criteria, ordered and windowed
    async fn find_links(&self, criteria: &FeedCriteria) -> Result<Vec<LinkRecord>, StoreError>;

    /// Number of links matching the predicate
    async fn count_links(&self, predicate: &LinkPredicate) -> Result<u64, StoreError>;

    /// Insert a link owned by an existing user
    async fn create_link(&self, link: NewLink) -> Result<LinkRecord, StoreError>;

    /// Apply changes to the link with the given id
    async fn update_link(&self, id: i32, changes: LinkChanges) -> Result<LinkRecord, StoreError>;

    /// Remove the link with the given id, returning it as it was
    async fn delete_link(&self, id: i32) -> Result<LinkRecord, StoreError>;

    /// Owner of the link, if both exist
    async fn link_posted_by(&self, id: i32) -> Result<Option<UserRecord>, StoreError>;

    /// Users who voted for the link
    async fn link_voters(&self, id: i32) -> Result<Vec<UserRecord>, StoreError>;
}

/// Store handle shared by the schema and every request
pub type SharedStore = Arc<dyn LinkStore>;

pub(crate) fn link_not_found(id: i32) -> StoreError {
    StoreError::NotFound(format!("No Link found with id {}", id))
}
