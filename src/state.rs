use std::sync::Arc;
use tokio::sync::RwLock;

use crate::config::Config;
use crate::db::Store;
use crate::services::{
    AuthService, ListService, MediaService, SeaOrmAuthService, SeaOrmListService,
    SeaOrmMediaService, SeaOrmUserService, UserService,
};

/// Services and the store shared by the HTTP server and the CLI.
#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<RwLock<Config>>,

    pub store: Store,

    pub auth_service: Arc<dyn AuthService>,

    pub media_service: Arc<dyn MediaService>,

    pub list_service: Arc<dyn ListService>,

    pub user_service: Arc<dyn UserService>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        Ok(Self::with_store(config, store))
    }

    /// Wires the services around an already opened store.
    #[must_use]
    pub fn with_store(config: Config, store: Store) -> Self {
        let auth_service = Arc::new(SeaOrmAuthService::new(
            store.clone(),
            config.security.clone(),
        )) as Arc<dyn AuthService>;

        let media_service = Arc::new(SeaOrmMediaService::new(store.clone())) as Arc<dyn MediaService>;

        let list_service = Arc::new(SeaOrmListService::new(store.clone())) as Arc<dyn ListService>;

        let user_service = Arc::new(SeaOrmUserService::new(
            store.clone(),
            config.search.clone(),
        )) as Arc<dyn UserService>;

        Self {
            config: Arc::new(RwLock::new(config)),
            store,
            auth_service,
            media_service,
            list_service,
            user_service,
        }
    }

    pub async fn config(&self) -> Config {
        self.config.read().await.clone()
    }
}
