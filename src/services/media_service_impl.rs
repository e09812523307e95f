//! `SeaORM` implementation of the `MediaService` trait.

use async_trait::async_trait;
use std::collections::BTreeSet;

use crate::db::{MediaPage, MediaQuery, Store, StoreError};
use crate::domain::{Edge, FieldMap, Media, MediaId, MediaKind, Relationship, build_new_media};
use crate::services::media_service::{MediaError, MediaRelations, MediaService};

pub struct SeaOrmMediaService {
    store: Store,
}

impl SeaOrmMediaService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    async fn ensure_exists(&self, id: MediaId) -> Result<(), MediaError> {
        if self.store.media_exists(id).await? {
            Ok(())
        } else {
            Err(StoreError::not_found("Media", id).into())
        }
    }

    async fn load(&self, ids: BTreeSet<MediaId>) -> Result<Vec<Media>, MediaError> {
        let ids: Vec<MediaId> = ids.into_iter().collect();
        Ok(self.store.get_media_many(&ids).await?)
    }
}

#[async_trait]
impl MediaService for SeaOrmMediaService {
    async fn create_media(&self, kind: MediaKind, fields: FieldMap) -> Result<Media, MediaError> {
        let new_media = build_new_media(kind, fields)?;
        let media = self.store.create_media(&new_media).await?;

        metrics::counter!("media_created_total", "type" => kind.as_str()).increment(1);

        Ok(media)
    }

    async fn get(&self, id: MediaId) -> Result<Media, MediaError> {
        self.store
            .get_media(id)
            .await?
            .ok_or_else(|| StoreError::not_found("Media", id).into())
    }

    async fn list(&self, query: MediaQuery) -> Result<MediaPage, MediaError> {
        Ok(self.store.list_media(&query).await?)
    }

    async fn delete(&self, id: MediaId) -> Result<(), MediaError> {
        Ok(self.store.delete_media(id).await?)
    }

    async fn add_related(
        &self,
        a: MediaId,
        b: MediaId,
        relationship: Relationship,
    ) -> Result<Edge, MediaError> {
        let edge = Edge {
            media1: a,
            media2: b,
            relationship,
        };
        Ok(self.store.add_edge(edge).await?)
    }

    async fn get_sequels(&self, id: MediaId) -> Result<Vec<Media>, MediaError> {
        self.ensure_exists(id).await?;
        let ids = self.store.sequel_ids(id).await?;
        self.load(ids).await
    }

    async fn get_prequels(&self, id: MediaId) -> Result<Vec<Media>, MediaError> {
        self.ensure_exists(id).await?;
        let ids = self.store.prequel_ids(id).await?;
        self.load(ids).await
    }

    async fn get_related(&self, id: MediaId) -> Result<Vec<Media>, MediaError> {
        self.ensure_exists(id).await?;
        let ids = self.store.related_ids(id).await?;
        self.load(ids).await
    }

    async fn delete_related(&self, a: MediaId, b: MediaId) -> Result<Edge, MediaError> {
        Ok(self.store.delete_edge(a, b).await?)
    }

    async fn relations(&self, id: MediaId) -> Result<MediaRelations, MediaError> {
        let media = self.get(id).await?;

        let sequels = self.load(self.store.sequel_ids(id).await?).await?;
        let prequels = self.load(self.store.prequel_ids(id).await?).await?;
        let related = self.load(self.store.related_ids(id).await?).await?;

        Ok(MediaRelations {
            media,
            sequels,
            prequels,
            related,
        })
    }
}
