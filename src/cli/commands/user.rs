//! Create user command handler

use crate::config::Config;
use crate::services::{AuthService, Registration, SeaOrmAuthService};
use crate::db::Store;

pub async fn cmd_create_user(config: &Config, registration: Registration) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;
    let auth = SeaOrmAuthService::new(store, config.security.clone());

    let user = auth.register(registration).await?;
    let api_key = auth.get_api_key(user.id).await?;

    println!("Created user '{}' (ID: {})", user.username, user.id);
    println!("  API key: {api_key}");

    Ok(())
}
