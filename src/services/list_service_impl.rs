//! `SeaORM` implementation of the `ListService` trait.

use async_trait::async_trait;
use tracing::info;

use crate::db::{EntryChanges, Store, StoreError};
use crate::domain::{ListEntry, MediaId, MediaKind, UserId};
use crate::services::list_service::{ListError, ListService, NewEntry, UserList};

pub struct SeaOrmListService {
    store: Store,
}

impl SeaOrmListService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ListService for SeaOrmListService {
    async fn list_for(
        &self,
        user_id: UserId,
        kind: Option<MediaKind>,
    ) -> Result<Vec<ListEntry>, ListError> {
        Ok(self.store.list_entries(user_id, kind).await?)
    }

    async fn user_list(
        &self,
        username: &str,
        kind: Option<MediaKind>,
    ) -> Result<UserList, ListError> {
        let user = self
            .store
            .get_user_by_username(username)
            .await?
            .ok_or_else(|| StoreError::not_found("User", username))?;

        let entries = self.list_for(user.id, kind).await?;
        Ok(UserList::new(&user.username, kind, entries))
    }

    async fn add_entry(&self, user_id: UserId, entry: NewEntry) -> Result<ListEntry, ListError> {
        let created = self
            .store
            .add_list_entry(user_id, entry.media_id, entry.score, entry.progress)
            .await?;

        info!(
            user_id = user_id.value(),
            media_id = entry.media_id.value(),
            "Added list entry"
        );
        metrics::counter!("list_entries_added_total").increment(1);

        Ok(created)
    }

    async fn update_entry(
        &self,
        user_id: UserId,
        media_id: MediaId,
        changes: EntryChanges,
    ) -> Result<ListEntry, ListError> {
        Ok(self
            .store
            .update_list_entry(user_id, media_id, changes)
            .await?)
    }

    async fn remove_entry(&self, user_id: UserId, media_id: MediaId) -> Result<(), ListError> {
        self.store.remove_list_entry(user_id, media_id).await?;
        info!(
            user_id = user_id.value(),
            media_id = media_id.value(),
            "Removed list entry"
        );
        Ok(())
    }
}
