use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, DbErr,
    EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use std::collections::BTreeSet;
use tracing::{debug, info};

use crate::db::error::{StoreError, StoreResult};
use crate::domain::{ConstraintViolation, Edge, MediaId, Relationship, related_ids};
use crate::entities::{media, related_media};

pub struct RelatedMediaRepository {
    conn: DatabaseConnection,
}

impl RelatedMediaRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Stores `edge` unless the two media are already linked in either
    /// direction. The existence check and the insert share a transaction and
    /// the unordered-pair unique index rejects any edge that slips past it.
    pub async fn add(&self, edge: Edge) -> StoreResult<Edge> {
        if edge.media1 == edge.media2 {
            return Err(ConstraintViolation::SelfRelationship(edge.media1).into());
        }

        let txn = self.conn.begin().await?;

        for id in [edge.media1, edge.media2] {
            if media::Entity::find_by_id(id.value()).one(&txn).await?.is_none() {
                return Err(StoreError::not_found("Media", id));
            }
        }

        if let Some(existing) = find_between(&txn, edge.media1, edge.media2).await? {
            debug!(
                media1 = existing.media1_id,
                media2 = existing.media2_id,
                "Relationship already exists"
            );
            return Err(duplicate(edge).into());
        }

        related_media::ActiveModel {
            media1_id: Set(edge.media1.value()),
            media2_id: Set(edge.media2.value()),
            relationship: Set(edge.relationship),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|err| match StoreError::from(err) {
            StoreError::Constraint(ConstraintViolation::Duplicate(_)) => duplicate(edge).into(),
            other => other,
        })?;

        txn.commit().await?;

        info!(
            media1 = edge.media1.value(),
            media2 = edge.media2.value(),
            relationship = ?edge.relationship,
            "Added relationship"
        );

        Ok(edge)
    }

    /// The stored edge between `a` and `b`, whichever way round it was saved.
    pub async fn find_between(&self, a: MediaId, b: MediaId) -> StoreResult<Option<Edge>> {
        Ok(find_between(&self.conn, a, b).await?.map(to_edge))
    }

    pub async fn delete_between(&self, a: MediaId, b: MediaId) -> StoreResult<Edge> {
        let txn = self.conn.begin().await?;

        let existing = find_between(&txn, a, b)
            .await?
            .ok_or_else(|| StoreError::not_found("Relationship", format!("{a}-{b}")))?;

        related_media::Entity::delete_by_id(existing.id)
            .exec(&txn)
            .await?;

        txn.commit().await?;

        info!(media1 = a.value(), media2 = b.value(), "Removed relationship");
        Ok(to_edge(existing))
    }

    /// Media stored as sequels of `id`: edges `(X -> id, Sequel)`.
    pub async fn sequels_of(&self, id: MediaId) -> StoreResult<BTreeSet<MediaId>> {
        let condition = Condition::all()
            .add(related_media::Column::Media2Id.eq(id.value()))
            .add(related_media::Column::Relationship.eq(Relationship::Sequel));
        self.ids_matching(id, condition).await
    }

    /// Media stored as prequels of `id`: edges `(id -> Y, Sequel)`.
    pub async fn prequels_of(&self, id: MediaId) -> StoreResult<BTreeSet<MediaId>> {
        let condition = Condition::all()
            .add(related_media::Column::Media1Id.eq(id.value()))
            .add(related_media::Column::Relationship.eq(Relationship::Sequel));
        self.ids_matching(id, condition).await
    }

    /// Media linked to `id` by a `Related` edge in either direction.
    pub async fn related_of(&self, id: MediaId) -> StoreResult<BTreeSet<MediaId>> {
        let condition = Condition::all()
            .add(touching(id))
            .add(related_media::Column::Relationship.eq(Relationship::Related));
        self.ids_matching(id, condition).await
    }

    /// Every edge with `id` on either end.
    pub async fn edges_of(&self, id: MediaId) -> StoreResult<Vec<Edge>> {
        let rows = related_media::Entity::find()
            .filter(touching(id))
            .order_by_asc(related_media::Column::Id)
            .all(&self.conn)
            .await?;

        Ok(rows.into_iter().map(to_edge).collect())
    }

    async fn ids_matching(
        &self,
        subject: MediaId,
        condition: Condition,
    ) -> StoreResult<BTreeSet<MediaId>> {
        let rows = related_media::Entity::find()
            .filter(condition)
            .all(&self.conn)
            .await?;

        Ok(related_ids(
            subject,
            rows.into_iter()
                .map(|row| (MediaId::new(row.media1_id), MediaId::new(row.media2_id))),
        ))
    }
}

fn touching(id: MediaId) -> Condition {
    Condition::any()
        .add(related_media::Column::Media1Id.eq(id.value()))
        .add(related_media::Column::Media2Id.eq(id.value()))
}

async fn find_between<C: ConnectionTrait>(
    db: &C,
    a: MediaId,
    b: MediaId,
) -> Result<Option<related_media::Model>, DbErr> {
    let forward = Condition::all()
        .add(related_media::Column::Media1Id.eq(a.value()))
        .add(related_media::Column::Media2Id.eq(b.value()));
    let backward = Condition::all()
        .add(related_media::Column::Media1Id.eq(b.value()))
        .add(related_media::Column::Media2Id.eq(a.value()));

    related_media::Entity::find()
        .filter(Condition::any().add(forward).add(backward))
        .one(db)
        .await
}

const fn duplicate(edge: Edge) -> ConstraintViolation {
    ConstraintViolation::DuplicateRelationship {
        media1: edge.media1,
        media2: edge.media2,
    }
}

fn to_edge(row: related_media::Model) -> Edge {
    Edge {
        media1: MediaId::new(row.media1_id),
        media2: MediaId::new(row.media2_id),
        relationship: row.relationship,
    }
}
