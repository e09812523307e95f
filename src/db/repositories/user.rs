use anyhow::Context;
use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use serde::Serialize;
use tokio::task;

use super::{check_page, contains_literal};
use crate::config::SecurityConfig;
use crate::db::error::{StoreError, StoreResult};
use crate::domain::{ConstraintViolation, UserId};
use crate::entities::users;

/// User data returned from the repository, without the password hash.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip)]
    pub api_key: String,
    pub date_joined: String,
    pub last_login: Option<String>,
}

impl From<users::Model> for User {
    fn from(model: users::Model) -> Self {
        Self {
            id: UserId::new(model.id),
            username: model.username,
            email: model.email,
            first_name: model.first_name,
            last_name: model.last_name,
            api_key: model.api_key,
            date_joined: model.date_joined,
            last_login: model.last_login,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
}

/// One page of a user search plus the total number of matches.
#[derive(Debug, Clone)]
pub struct UserPage {
    pub users: Vec<User>,
    pub total: u64,
}

pub struct UserRepository {
    conn: DatabaseConnection,
}

impl UserRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn create(&self, new_user: NewUser, security: &SecurityConfig) -> StoreResult<User> {
        let username = new_user.username.trim().to_string();
        if username.is_empty() {
            return Err(ConstraintViolation::MissingField("username".to_string()).into());
        }

        if self.get_by_username(&username).await?.is_some() {
            return Err(ConstraintViolation::Duplicate(format!("username '{username}'")).into());
        }

        let password = new_user.password;
        let config = security.clone();
        let password_hash = task::spawn_blocking(move || hash_password(&password, Some(&config)))
            .await
            .context("Password hashing task panicked")??;

        let model = users::ActiveModel {
            username: Set(username),
            email: Set(new_user.email),
            first_name: Set(new_user.first_name),
            last_name: Set(new_user.last_name),
            password_hash: Set(password_hash),
            api_key: Set(generate_api_key()),
            date_joined: Set(chrono::Utc::now().to_rfc3339()),
            last_login: Set(None),
            ..Default::default()
        }
        .insert(&self.conn)
        .await?;

        Ok(User::from(model))
    }

    pub async fn get_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let user = users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.conn)
            .await?;

        Ok(user.map(User::from))
    }

    pub async fn get_by_id(&self, id: UserId) -> StoreResult<Option<User>> {
        let user = users::Entity::find_by_id(id.value()).one(&self.conn).await?;
        Ok(user.map(User::from))
    }

    /// Checks `password` against the stored hash. Unknown users verify as false.
    pub async fn verify_password(&self, username: &str, password: &str) -> StoreResult<bool> {
        let user = users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.conn)
            .await?;

        let Some(user) = user else {
            return Ok(false);
        };

        let password_hash = user.password_hash;
        let password = password.to_string();

        // Argon2 is CPU-bound
        let is_valid = task::spawn_blocking(move || {
            let parsed_hash = PasswordHash::new(&password_hash)
                .map_err(|e| anyhow::anyhow!("Invalid password hash format: {e}"))?;

            Ok::<bool, anyhow::Error>(
                Argon2::default()
                    .verify_password(password.as_bytes(), &parsed_hash)
                    .is_ok(),
            )
        })
        .await
        .context("Password verification task panicked")??;

        Ok(is_valid)
    }

    pub async fn record_login(&self, id: UserId) -> StoreResult<()> {
        let user = self.find_model(id).await?;
        let mut active: users::ActiveModel = user.into();
        active.last_login = Set(Some(chrono::Utc::now().to_rfc3339()));
        active.update(&self.conn).await?;
        Ok(())
    }

    pub async fn update_password(
        &self,
        id: UserId,
        new_password: &str,
        security: &SecurityConfig,
    ) -> StoreResult<()> {
        let user = self.find_model(id).await?;

        let password = new_password.to_string();
        let config = security.clone();
        let new_hash = task::spawn_blocking(move || hash_password(&password, Some(&config)))
            .await
            .context("Password hashing task panicked")??;

        let mut active: users::ActiveModel = user.into();
        active.password_hash = Set(new_hash);
        active.update(&self.conn).await?;

        Ok(())
    }

    pub async fn verify_api_key(&self, api_key: &str) -> StoreResult<Option<User>> {
        let user = users::Entity::find()
            .filter(users::Column::ApiKey.eq(api_key))
            .one(&self.conn)
            .await?;

        Ok(user.map(User::from))
    }

    pub async fn regenerate_api_key(&self, id: UserId) -> StoreResult<String> {
        let user = self.find_model(id).await?;

        let new_api_key = generate_api_key();
        let mut active: users::ActiveModel = user.into();
        active.api_key = Set(new_api_key.clone());
        active.update(&self.conn).await?;

        Ok(new_api_key)
    }

    /// Case-insensitive substring search over username, first and last name,
    /// most recently active users first. `page` is zero-based.
    pub async fn search(&self, query: &str, page: u64, page_size: u64) -> StoreResult<UserPage> {
        let page_size = page_size.max(1);
        check_page(page, page_size)?;

        let condition = Condition::any()
            .add(contains_literal(users::Column::Username, query))
            .add(contains_literal(users::Column::FirstName, query))
            .add(contains_literal(users::Column::LastName, query));

        let paginator = users::Entity::find()
            .filter(condition)
            .order_by_desc(users::Column::LastLogin)
            .order_by_asc(users::Column::Id)
            .paginate(&self.conn, page_size);

        let total = paginator.num_items().await?;
        let users = paginator.fetch_page(page).await?;

        Ok(UserPage {
            users: users.into_iter().map(User::from).collect(),
            total,
        })
    }

    pub async fn count(&self) -> StoreResult<u64> {
        Ok(users::Entity::find().count(&self.conn).await?)
    }

    async fn find_model(&self, id: UserId) -> StoreResult<users::Model> {
        users::Entity::find_by_id(id.value())
            .one(&self.conn)
            .await?
            .ok_or_else(|| StoreError::not_found("User", id))
    }
}

/// Hash a password using Argon2id. Without a config the crate defaults are used.
pub fn hash_password(password: &str, config: Option<&SecurityConfig>) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    let argon2 = if let Some(cfg) = config {
        let params = Params::new(
            cfg.argon2_memory_cost_kib,
            cfg.argon2_time_cost,
            cfg.argon2_parallelism,
            None,
        )
        .map_err(|e| anyhow::anyhow!("Invalid Argon2 params: {e}"))?;
        Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
    } else {
        Argon2::default()
    };

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {e}"))?;

    Ok(hash.to_string())
}

/// Random API key, 64 hex characters.
#[must_use]
pub fn generate_api_key() -> String {
    use rand::Rng;

    let bytes: [u8; 32] = rand::rng().random();

    bytes.iter().fold(String::with_capacity(64), |mut acc, b| {
        use std::fmt::Write;
        let _ = write!(acc, "{b:02x}");
        acc
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_keys_are_64_hex_chars() {
        let key = generate_api_key();
        assert_eq!(key.len(), 64);
        assert!(key.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(key, generate_api_key());
    }

    #[test]
    fn hashed_passwords_verify() {
        let config = SecurityConfig {
            argon2_memory_cost_kib: 1024,
            argon2_time_cost: 1,
            argon2_parallelism: 1,
            ..SecurityConfig::default()
        };
        let hash = hash_password("hunter22", Some(&config)).unwrap();
        let parsed = PasswordHash::new(&hash).unwrap();
        assert!(Argon2::default().verify_password(b"hunter22", &parsed).is_ok());
        assert!(Argon2::default().verify_password(b"wrong", &parsed).is_err());
    }
}
