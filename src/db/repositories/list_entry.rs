use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

use crate::db::error::{StoreError, StoreResult};
use crate::domain::list::{validate_list_score, validate_progress};
use crate::domain::{ConstraintViolation, ListEntry, MediaId, MediaKind, MediaSummary, UserId};
use crate::entities::{list_entries, media, users};

/// Partial update of a list entry. `score: Some(None)` clears the score.
#[derive(Debug, Clone, Default)]
pub struct EntryChanges {
    pub score: Option<Option<f64>>,
    pub progress: Option<i32>,
}

pub struct ListEntryRepository {
    conn: DatabaseConnection,
}

impl ListEntryRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// A user's entries, optionally restricted to one media type, in the
    /// order they were added.
    pub async fn list_for(
        &self,
        user_id: UserId,
        kind: Option<MediaKind>,
    ) -> StoreResult<Vec<ListEntry>> {
        let mut select = list_entries::Entity::find()
            .find_also_related(media::Entity)
            .filter(list_entries::Column::UserId.eq(user_id.value()));

        if let Some(kind) = kind {
            select = select.filter(media::Column::MediaType.eq(kind));
        }

        let rows = select
            .order_by_asc(list_entries::Column::Id)
            .all(&self.conn)
            .await?;

        rows.into_iter()
            .map(|(entry, media)| {
                let media = media.ok_or_else(|| {
                    StoreError::Internal(format!("list entry {} has no media row", entry.id))
                })?;
                Ok(to_entry(entry, media))
            })
            .collect()
    }

    pub async fn get(&self, user_id: UserId, media_id: MediaId) -> StoreResult<Option<ListEntry>> {
        let row = list_entries::Entity::find()
            .find_also_related(media::Entity)
            .filter(list_entries::Column::UserId.eq(user_id.value()))
            .filter(list_entries::Column::MediaId.eq(media_id.value()))
            .one(&self.conn)
            .await?;

        Ok(row.and_then(|(entry, media)| media.map(|media| to_entry(entry, media))))
    }

    /// A user can track a media item at most once.
    pub async fn create(
        &self,
        user_id: UserId,
        media_id: MediaId,
        score: Option<f64>,
        progress: Option<i32>,
    ) -> StoreResult<ListEntry> {
        if let Some(score) = score {
            validate_list_score(score)?;
        }
        let progress = progress.unwrap_or(0);
        validate_progress(progress)?;

        let txn = self.conn.begin().await?;

        if users::Entity::find_by_id(user_id.value())
            .one(&txn)
            .await?
            .is_none()
        {
            return Err(StoreError::not_found("User", user_id));
        }

        let media_row = media::Entity::find_by_id(media_id.value())
            .one(&txn)
            .await?
            .ok_or_else(|| StoreError::not_found("Media", media_id))?;

        let existing = list_entries::Entity::find()
            .filter(list_entries::Column::UserId.eq(user_id.value()))
            .filter(list_entries::Column::MediaId.eq(media_id.value()))
            .one(&txn)
            .await?;
        if existing.is_some() {
            return Err(duplicate_entry(media_id).into());
        }

        let entry = list_entries::ActiveModel {
            user_id: Set(user_id.value()),
            media_id: Set(media_id.value()),
            score: Set(score),
            progress: Set(progress),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|err| match StoreError::from(err) {
            StoreError::Constraint(ConstraintViolation::Duplicate(_)) => {
                duplicate_entry(media_id).into()
            }
            other => other,
        })?;

        txn.commit().await?;

        Ok(to_entry(entry, media_row))
    }

    pub async fn update(
        &self,
        user_id: UserId,
        media_id: MediaId,
        changes: EntryChanges,
    ) -> StoreResult<ListEntry> {
        if let Some(Some(score)) = changes.score {
            validate_list_score(score)?;
        }
        if let Some(progress) = changes.progress {
            validate_progress(progress)?;
        }

        let (entry, media_row) = list_entries::Entity::find()
            .find_also_related(media::Entity)
            .filter(list_entries::Column::UserId.eq(user_id.value()))
            .filter(list_entries::Column::MediaId.eq(media_id.value()))
            .one(&self.conn)
            .await?
            .and_then(|(entry, media)| media.map(|media| (entry, media)))
            .ok_or_else(|| StoreError::not_found("List entry", media_id))?;

        let mut active: list_entries::ActiveModel = entry.into();
        if let Some(score) = changes.score {
            active.score = Set(score);
        }
        if let Some(progress) = changes.progress {
            active.progress = Set(progress);
        }
        let entry = active.update(&self.conn).await?;

        Ok(to_entry(entry, media_row))
    }

    pub async fn delete(&self, user_id: UserId, media_id: MediaId) -> StoreResult<()> {
        let result = list_entries::Entity::delete_many()
            .filter(list_entries::Column::UserId.eq(user_id.value()))
            .filter(list_entries::Column::MediaId.eq(media_id.value()))
            .exec(&self.conn)
            .await?;

        if result.rows_affected == 0 {
            return Err(StoreError::not_found("List entry", media_id));
        }
        Ok(())
    }
}

fn duplicate_entry(media_id: MediaId) -> ConstraintViolation {
    ConstraintViolation::Duplicate(format!("list entry for media {media_id}"))
}

fn to_entry(entry: list_entries::Model, media: media::Model) -> ListEntry {
    ListEntry {
        id: entry.id,
        user_id: UserId::new(entry.user_id),
        media: MediaSummary {
            id: MediaId::new(media.id),
            title: media.title,
            media_type: media.media_type,
            score: media.score,
        },
        score: entry.score,
        progress: entry.progress,
    }
}
