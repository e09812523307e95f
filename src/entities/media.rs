use sea_orm::entity::prelude::*;

use crate::domain::MediaKind;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "media")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub media_type: MediaKind,
    pub title: String,
    pub local_title: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub score: f64,
    pub members: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::films::Entity")]
    Films,
    #[sea_orm(has_one = "super::series::Entity")]
    Series,
    #[sea_orm(has_one = "super::books::Entity")]
    Books,
    #[sea_orm(has_many = "super::list_entries::Entity")]
    ListEntries,
}

impl Related<super::films::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Films.def()
    }
}

impl Related<super::series::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Series.def()
    }
}

impl Related<super::books::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Books.def()
    }
}

impl Related<super::list_entries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ListEntries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
