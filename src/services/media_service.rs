//! Domain service for the media catalogue and the sequel/prequel graph.

use serde::Serialize;
use thiserror::Error;

use crate::db::{MediaPage, MediaQuery, StoreError};
use crate::domain::{
    ConstraintViolation, Edge, FieldMap, LinkKind, Media, MediaId, MediaKind, Relationship,
};

#[derive(Debug, Error)]
pub enum MediaError {
    #[error(transparent)]
    Constraint(#[from] ConstraintViolation),

    #[error("{0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<StoreError> for MediaError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Constraint(violation) => Self::Constraint(violation),
            StoreError::NotFound { .. } => Self::NotFound(err.to_string()),
            StoreError::Database(e) => Self::Database(e.to_string()),
            StoreError::Internal(msg) => Self::Internal(msg),
        }
    }
}

/// Everything linked to one media item, grouped for display.
#[derive(Debug, Clone, Serialize)]
pub struct MediaRelations {
    pub media: Media,
    pub sequels: Vec<Media>,
    pub prequels: Vec<Media>,
    pub related: Vec<Media>,
}

#[async_trait::async_trait]
pub trait MediaService: Send + Sync {
    /// Validates `fields` for `kind` and writes the base and subtype rows
    /// atomically.
    ///
    /// # Errors
    ///
    /// Returns [`MediaError::Constraint`] for missing or invalid fields. No
    /// rows are written in that case.
    async fn create_media(&self, kind: MediaKind, fields: FieldMap) -> Result<Media, MediaError>;

    async fn create_film(&self, fields: FieldMap) -> Result<Media, MediaError> {
        self.create_media(MediaKind::Film, fields).await
    }

    async fn create_series(&self, fields: FieldMap) -> Result<Media, MediaError> {
        self.create_media(MediaKind::Series, fields).await
    }

    async fn create_book(&self, fields: FieldMap) -> Result<Media, MediaError> {
        self.create_media(MediaKind::Book, fields).await
    }

    async fn get(&self, id: MediaId) -> Result<Media, MediaError>;

    async fn list(&self, query: MediaQuery) -> Result<MediaPage, MediaError>;

    /// Removes the media together with its subtype row, edges and list entries.
    async fn delete(&self, id: MediaId) -> Result<(), MediaError>;

    /// Stores the edge `a -> b` unless `a` and `b` are already linked.
    ///
    /// # Errors
    ///
    /// Returns a `DuplicateRelationship` violation when any edge exists
    /// between the pair, in either direction.
    async fn add_related(
        &self,
        a: MediaId,
        b: MediaId,
        relationship: Relationship,
    ) -> Result<Edge, MediaError>;

    /// Records `other` as a sequel, prequel or relative of `subject`.
    async fn link(
        &self,
        subject: MediaId,
        other: MediaId,
        kind: LinkKind,
    ) -> Result<Edge, MediaError> {
        let edge = kind.edge(subject, other);
        self.add_related(edge.media1, edge.media2, edge.relationship)
            .await
    }

    /// Marks `b` as a sequel of `a`.
    async fn add_sequel(&self, a: MediaId, b: MediaId) -> Result<Edge, MediaError> {
        self.link(a, b, LinkKind::Sequel).await
    }

    /// Marks `b` as a prequel of `a`.
    async fn add_prequel(&self, a: MediaId, b: MediaId) -> Result<Edge, MediaError> {
        self.link(a, b, LinkKind::Prequel).await
    }

    async fn get_sequels(&self, id: MediaId) -> Result<Vec<Media>, MediaError>;

    async fn get_prequels(&self, id: MediaId) -> Result<Vec<Media>, MediaError>;

    async fn get_related(&self, id: MediaId) -> Result<Vec<Media>, MediaError>;

    /// Deletes the edge between `a` and `b`, whichever direction it was stored.
    async fn delete_related(&self, a: MediaId, b: MediaId) -> Result<Edge, MediaError>;

    async fn relations(&self, id: MediaId) -> Result<MediaRelations, MediaError>;
}
