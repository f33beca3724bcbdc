//! SeaORM-backed link store

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::{Expr, LikeExpr};
use sea_orm::{
    ActiveModelTrait, Condition, ConnectionTrait, DatabaseConnection, DbErr,
    EntityTrait, ModelTrait, Order, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Schema,
    Set,
};

use super::{link_not_found, LinkChanges, LinkRecord, LinkStore, NewLink, StoreError, UserRecord};
use crate::criteria::{FeedCriteria, LinkPredicate, SortField};
use crate::entities::{link, user, vote};
use crate::types::Sort;

/// Link store over a SeaORM connection
#[derive(Debug, Clone)]
pub struct SeaOrmLinkStore {
    db: DatabaseConnection,
}

impl SeaOrmLinkStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Underlying connection
    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    async fn find_link(&self, id: i32) -> Result<Option<link::Model>, StoreError> {
        Ok(link::Entity::find_by_id(id).one(&self.db).await?)
    }

    async fn require_link(&self, id: i32) -> Result<link::Model, StoreError> {
        self.find_link(id).await?.ok_or_else(|| link_not_found(id))
    }
}

/// Create the `user`, `link` and `vote` tables if they are missing
pub async fn ensure_tables(db: &DatabaseConnection) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);

    let statements = [
        schema
            .create_table_from_entity(user::Entity)
            .if_not_exists()
            .to_owned(),
        schema
            .create_table_from_entity(link::Entity)
            .if_not_exists()
            .to_owned(),
        schema
            .create_table_from_entity(vote::Entity)
            .if_not_exists()
            .to_owned(),
    ];

    for statement in statements {
        db.execute(backend.build(&statement)).await?;
    }
    tracing::info!("Link tables ready");
    Ok(())
}

/// `LIKE` pattern matching `text` literally anywhere in the column
fn contains_pattern(text: &str) -> LikeExpr {
    let mut escaped = String::with_capacity(text.len() + 2);
    escaped.push('%');
    for c in text.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    LikeExpr::new(escaped).escape('\\')
}

fn condition(predicate: &LinkPredicate) -> Condition {
    match predicate {
        LinkPredicate::MatchAll => Condition::all(),
        LinkPredicate::TextContains(text) => Condition::any()
            .add(Expr::col(link::Column::Description).like(contains_pattern(text)))
            .add(Expr::col(link::Column::Url).like(contains_pattern(text))),
    }
}

/// The link can vanish between lookup and update
fn update_error(id: i32, err: DbErr) -> StoreError {
    match err {
        DbErr::RecordNotUpdated => link_not_found(id),
        other => StoreError::Database(other),
    }
}

fn column(field: SortField) -> link::Column {
    match field {
        SortField::Description => link::Column::Description,
        SortField::Url => link::Column::Url,
        SortField::CreatedAt => link::Column::CreatedAt,
    }
}

fn direction(sort: Sort) -> Order {
    match sort {
        Sort::Asc => Order::Asc,
        Sort::Desc => Order::Desc,
    }
}

#[async_trait]
impl LinkStore for SeaOrmLinkStore {
    #[tracing::instrument(skip(self))]
    async fn find_links(&self, criteria: &FeedCriteria) -> Result<Vec<LinkRecord>, StoreError> {
        let mut select = link::Entity::find().filter(condition(&criteria.predicate));

        if criteria.order.is_empty() {
            select = select.order_by_asc(link::Column::Id);
        }
        for (field, sort) in &criteria.order {
            select = select.order_by(column(*field), direction(*sort));
        }
        if let Some(skip) = criteria.window.skip {
            select = select.offset(skip);
        }
        if let Some(take) = criteria.window.take {
            select = select.limit(take);
        }

        let links = select.all(&self.db).await?;
        Ok(links.into_iter().map(LinkRecord::from).collect())
    }

    #[tracing::instrument(skip(self))]
    async fn count_links(&self, predicate: &LinkPredicate) -> Result<u64, StoreError> {
        Ok(link::Entity::find()
            .filter(condition(predicate))
            .count(&self.db)
            .await?)
    }

    #[tracing::instrument(skip(self))]
    async fn create_link(&self, new_link: NewLink) -> Result<LinkRecord, StoreError> {
        let model = link::ActiveModel {
            description: Set(new_link.description),
            url: Set(new_link.url),
            created_at: Set(Utc::now()),
            posted_by_id: Set(Some(new_link.posted_by_id)),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;
        Ok(model.into())
    }

    #[tracing::instrument(skip(self))]
    async fn update_link(&self, id: i32, changes: LinkChanges) -> Result<LinkRecord, StoreError> {
        let model = self.require_link(id).await?;
        if changes.is_empty() {
            return Ok(model.into());
        }

        let mut active: link::ActiveModel = model.into();
        if let Some(description) = changes.description {
            active.description = Set(description);
        }
        if let Some(url) = changes.url {
            active.url = Set(url);
        }
        match active.update(&self.db).await {
            Ok(model) => Ok(model.into()),
            Err(err) => Err(update_error(id, err)),
        }
    }

    #[tracing::instrument(skip(self))]
    async fn delete_link(&self, id: i32) -> Result<LinkRecord, StoreError> {
        let model = self.require_link(id).await?;
        model.clone().delete(&self.db).await?;
        Ok(model.into())
    }

    #[tracing::instrument(skip(self))]
    async fn link_posted_by(&self, id: i32) -> Result<Option<UserRecord>, StoreError> {
        let Some(model) = self.find_link(id).await? else {
            return Ok(None);
        };
        let owner = model.find_related(user::Entity).one(&self.db).await?;
        Ok(owner.map(UserRecord::from))
    }

    #[tracing::instrument(skip(self))]
    async fn link_voters(&self, id: i32) -> Result<Vec<UserRecord>, StoreError> {
        let Some(model) = self.find_link(id).await? else {
            return Ok(Vec::new());
        };
        let voters = model.find_linked(link::Voters).all(&self.db).await?;
        Ok(voters.into_iter().map(UserRecord::from).collect())
    }
}
