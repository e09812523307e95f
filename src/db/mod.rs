use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::collections::{BTreeSet, HashMap};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::config::SecurityConfig;
use crate::domain::{Edge, ListEntry, Media, MediaId, MediaKind, NewMedia, UserId};

pub mod error;
pub mod migrator;
pub mod repositories;

pub use error::{StoreError, StoreResult};
pub use repositories::list_entry::EntryChanges;
pub use repositories::media::{MediaPage, MediaQuery};
pub use repositories::user::{NewUser, User, UserPage};

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        let in_memory = db_url.contains(":memory:");

        if !in_memory {
            let path_str = db_url
                .trim_start_matches("sqlite://")
                .trim_start_matches("sqlite:");
            let path_str = path_str.split('?').next().unwrap_or(path_str);
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        if in_memory {
            // Every pooled connection to :memory: would see its own empty database
            opt.max_connections(1).min_connections(1);
        } else {
            opt.max_connections(max_connections)
                .min_connections(min_connections)
                .idle_timeout(Duration::from_secs(300))
                .max_lifetime(Duration::from_secs(600));
        }
        opt.connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    fn media_repo(&self) -> repositories::media::MediaRepository {
        repositories::media::MediaRepository::new(self.conn.clone())
    }

    fn related_repo(&self) -> repositories::related_media::RelatedMediaRepository {
        repositories::related_media::RelatedMediaRepository::new(self.conn.clone())
    }

    fn list_repo(&self) -> repositories::list_entry::ListEntryRepository {
        repositories::list_entry::ListEntryRepository::new(self.conn.clone())
    }

    // Users

    pub async fn create_user(
        &self,
        new_user: NewUser,
        security: &SecurityConfig,
    ) -> StoreResult<User> {
        self.user_repo().create(new_user, security).await
    }

    pub async fn get_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        self.user_repo().get_by_username(username).await
    }

    pub async fn get_user(&self, id: UserId) -> StoreResult<Option<User>> {
        self.user_repo().get_by_id(id).await
    }

    pub async fn verify_user_password(&self, username: &str, password: &str) -> StoreResult<bool> {
        self.user_repo().verify_password(username, password).await
    }

    pub async fn record_login(&self, id: UserId) -> StoreResult<()> {
        self.user_repo().record_login(id).await
    }

    pub async fn update_user_password(
        &self,
        id: UserId,
        new_password: &str,
        security: &SecurityConfig,
    ) -> StoreResult<()> {
        self.user_repo()
            .update_password(id, new_password, security)
            .await
    }

    pub async fn verify_api_key(&self, api_key: &str) -> StoreResult<Option<User>> {
        self.user_repo().verify_api_key(api_key).await
    }

    pub async fn regenerate_api_key(&self, id: UserId) -> StoreResult<String> {
        self.user_repo().regenerate_api_key(id).await
    }

    pub async fn search_users(&self, query: &str, page: u64, page_size: u64) -> StoreResult<UserPage> {
        self.user_repo().search(query, page, page_size).await
    }

    pub async fn count_users(&self) -> StoreResult<u64> {
        self.user_repo().count().await
    }

    // Media

    pub async fn create_media(&self, new_media: &NewMedia) -> StoreResult<Media> {
        self.media_repo().create(new_media).await
    }

    pub async fn get_media(&self, id: MediaId) -> StoreResult<Option<Media>> {
        self.media_repo().get(id).await
    }

    pub async fn get_media_many(&self, ids: &[MediaId]) -> StoreResult<Vec<Media>> {
        self.media_repo().get_many(ids).await
    }

    pub async fn media_exists(&self, id: MediaId) -> StoreResult<bool> {
        self.media_repo().exists(id).await
    }

    pub async fn list_media(&self, query: &MediaQuery) -> StoreResult<MediaPage> {
        self.media_repo().list(query).await
    }

    pub async fn delete_media(&self, id: MediaId) -> StoreResult<()> {
        self.media_repo().delete(id).await
    }

    pub async fn count_media_by_kind(&self) -> StoreResult<HashMap<MediaKind, u64>> {
        self.media_repo().count_by_kind().await
    }

    // Relationships

    pub async fn add_edge(&self, edge: Edge) -> StoreResult<Edge> {
        self.related_repo().add(edge).await
    }

    pub async fn find_edge(&self, a: MediaId, b: MediaId) -> StoreResult<Option<Edge>> {
        self.related_repo().find_between(a, b).await
    }

    pub async fn delete_edge(&self, a: MediaId, b: MediaId) -> StoreResult<Edge> {
        self.related_repo().delete_between(a, b).await
    }

    pub async fn edges_of(&self, id: MediaId) -> StoreResult<Vec<Edge>> {
        self.related_repo().edges_of(id).await
    }

    pub async fn sequel_ids(&self, id: MediaId) -> StoreResult<BTreeSet<MediaId>> {
        self.related_repo().sequels_of(id).await
    }

    pub async fn prequel_ids(&self, id: MediaId) -> StoreResult<BTreeSet<MediaId>> {
        self.related_repo().prequels_of(id).await
    }

    pub async fn related_ids(&self, id: MediaId) -> StoreResult<BTreeSet<MediaId>> {
        self.related_repo().related_of(id).await
    }

    // Lists

    pub async fn list_entries(
        &self,
        user_id: UserId,
        kind: Option<MediaKind>,
    ) -> StoreResult<Vec<ListEntry>> {
        self.list_repo().list_for(user_id, kind).await
    }

    pub async fn get_list_entry(
        &self,
        user_id: UserId,
        media_id: MediaId,
    ) -> StoreResult<Option<ListEntry>> {
        self.list_repo().get(user_id, media_id).await
    }

    pub async fn add_list_entry(
        &self,
        user_id: UserId,
        media_id: MediaId,
        score: Option<f64>,
        progress: Option<i32>,
    ) -> StoreResult<ListEntry> {
        self.list_repo()
            .create(user_id, media_id, score, progress)
            .await
    }

    pub async fn update_list_entry(
        &self,
        user_id: UserId,
        media_id: MediaId,
        changes: EntryChanges,
    ) -> StoreResult<ListEntry> {
        self.list_repo().update(user_id, media_id, changes).await
    }

    pub async fn remove_list_entry(&self, user_id: UserId, media_id: MediaId) -> StoreResult<()> {
        self.list_repo().delete(user_id, media_id).await
    }
}
