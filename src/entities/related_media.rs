use sea_orm::entity::prelude::*;

use crate::domain::Relationship;

/// Directed edge between two media. See [`crate::domain::graph`] for how the
/// direction is read.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "related_media")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub media1_id: i32,
    pub media2_id: i32,
    pub relationship: Relationship,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::media::Entity",
        from = "Column::Media1Id",
        to = "super::media::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Media1,
    #[sea_orm(
        belongs_to = "super::media::Entity",
        from = "Column::Media2Id",
        to = "super::media::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Media2,
}

impl ActiveModelBehavior for ActiveModel {}
