//! Domain service for per-user media lists.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::db::{EntryChanges, StoreError};
use crate::domain::{ConstraintViolation, ListEntry, MediaId, MediaKind, UserId, possessive};

#[derive(Debug, Error)]
pub enum ListError {
    #[error(transparent)]
    Constraint(#[from] ConstraintViolation),

    #[error("{0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<StoreError> for ListError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Constraint(violation) => Self::Constraint(violation),
            StoreError::NotFound { .. } => Self::NotFound(err.to_string()),
            StoreError::Database(e) => Self::Database(e.to_string()),
            StoreError::Internal(msg) => Self::Internal(msg),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewEntry {
    pub media_id: MediaId,
    pub score: Option<f64>,
    pub progress: Option<i32>,
}

/// A user's list with its display title, e.g. "john_smith's Film List".
#[derive(Debug, Clone, Serialize)]
pub struct UserList {
    pub title: String,
    pub username: String,
    pub media_type: Option<MediaKind>,
    pub entries: Vec<ListEntry>,
}

impl UserList {
    #[must_use]
    pub fn new(username: &str, kind: Option<MediaKind>, entries: Vec<ListEntry>) -> Self {
        let name = kind.map_or("List", |k| k.list_name());
        Self {
            title: format!("{} {name}", possessive(username)),
            username: username.to_string(),
            media_type: kind,
            entries,
        }
    }
}

#[async_trait::async_trait]
pub trait ListService: Send + Sync {
    /// Every entry owned by `user_id` whose media matches `kind`, or all
    /// entries when `kind` is `None`.
    async fn list_for(
        &self,
        user_id: UserId,
        kind: Option<MediaKind>,
    ) -> Result<Vec<ListEntry>, ListError>;

    async fn film_list(&self, user_id: UserId) -> Result<Vec<ListEntry>, ListError> {
        self.list_for(user_id, Some(MediaKind::Film)).await
    }

    async fn series_list(&self, user_id: UserId) -> Result<Vec<ListEntry>, ListError> {
        self.list_for(user_id, Some(MediaKind::Series)).await
    }

    async fn book_list(&self, user_id: UserId) -> Result<Vec<ListEntry>, ListError> {
        self.list_for(user_id, Some(MediaKind::Book)).await
    }

    /// Public view of another user's list, looked up by username.
    async fn user_list(
        &self,
        username: &str,
        kind: Option<MediaKind>,
    ) -> Result<UserList, ListError>;

    /// # Errors
    ///
    /// Returns a `Duplicate` violation if the user already tracks the media.
    async fn add_entry(&self, user_id: UserId, entry: NewEntry) -> Result<ListEntry, ListError>;

    async fn update_entry(
        &self,
        user_id: UserId,
        media_id: MediaId,
        changes: EntryChanges,
    ) -> Result<ListEntry, ListError>;

    async fn remove_entry(&self, user_id: UserId, media_id: MediaId) -> Result<(), ListError>;
}
