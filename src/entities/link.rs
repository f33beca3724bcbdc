use sea_orm::entity::prelude::*;

use crate::store::LinkRecord;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "link")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub description: String,
    pub url: String,
    pub created_at: DateTimeUtc,
    pub posted_by_id: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::PostedById",
        to = "super::user::Column::Id",
        on_delete = "SetNull"
    )]
    PostedBy,
    #[sea_orm(has_many = "super::vote::Entity")]
    Vote,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PostedBy.def()
    }
}

impl Related<super::vote::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Vote.def()
    }
}

/// link -> vote -> user
#[derive(Debug)]
pub struct Voters;

impl Linked for Voters {
    type FromEntity = Entity;
    type ToEntity = super::user::Entity;

    fn link(&self) -> Vec<RelationDef> {
        vec![
            super::vote::Relation::Link.def().rev(),
            super::vote::Relation::User.def(),
        ]
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for LinkRecord {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            description: model.description,
            url: model.url,
            created_at: model.created_at,
            posted_by_id: model.posted_by_id,
        }
    }
}
