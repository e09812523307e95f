//! `SeaORM` implementation of the `AuthService` trait.

use async_trait::async_trait;
use tracing::info;

use crate::config::SecurityConfig;
use crate::db::{NewUser, Store};
use crate::domain::UserId;
use crate::services::auth_service::{AuthError, AuthService, LoginResult, Registration, UserInfo};

const USERNAME_MAX_LEN: usize = 150;

pub struct SeaOrmAuthService {
    store: Store,
    security: SecurityConfig,
}

impl SeaOrmAuthService {
    #[must_use]
    pub const fn new(store: Store, security: SecurityConfig) -> Self {
        Self { store, security }
    }

    fn check_password(&self, password: &str) -> Result<(), AuthError> {
        if password.chars().count() < self.security.min_password_length {
            return Err(AuthError::Validation(format!(
                "Password must be at least {} characters",
                self.security.min_password_length
            )));
        }
        Ok(())
    }
}

/// Letters, digits and `@ . + - _`, at most 150 characters.
pub fn validate_username(username: &str) -> Result<(), AuthError> {
    if username.is_empty() {
        return Err(AuthError::Validation("Username is required".to_string()));
    }
    if username.chars().count() > USERNAME_MAX_LEN {
        return Err(AuthError::Validation(format!(
            "Username must be {USERNAME_MAX_LEN} characters or fewer"
        )));
    }
    if !username
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
    {
        return Err(AuthError::Validation(
            "Username may only contain letters, digits and @/./+/-/_".to_string(),
        ));
    }
    Ok(())
}

#[async_trait]
impl AuthService for SeaOrmAuthService {
    async fn register(&self, registration: Registration) -> Result<UserInfo, AuthError> {
        let username = registration.username.trim().to_string();
        validate_username(&username)?;
        self.check_password(&registration.password)?;

        if self.store.get_user_by_username(&username).await?.is_some() {
            return Err(AuthError::UsernameTaken(username));
        }

        let user = self
            .store
            .create_user(
                NewUser {
                    username,
                    email: registration.email.trim().to_string(),
                    first_name: registration.first_name.trim().to_string(),
                    last_name: registration.last_name.trim().to_string(),
                    password: registration.password,
                },
                &self.security,
            )
            .await?;

        info!(user_id = user.id.value(), "Registered user {}", user.username);
        metrics::counter!("users_registered_total").increment(1);

        Ok(UserInfo::from(user))
    }

    async fn login(&self, username: &str, password: &str) -> Result<LoginResult, AuthError> {
        let is_valid = self.store.verify_user_password(username, password).await?;

        if !is_valid {
            return Err(AuthError::InvalidCredentials);
        }

        let user = self
            .store
            .get_user_by_username(username)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        self.store.record_login(user.id).await?;

        let api_key = user.api_key.clone();
        let mut info = UserInfo::from(user);
        info.last_login = Some(chrono::Utc::now().to_rfc3339());

        Ok(LoginResult { user: info, api_key })
    }

    async fn verify_api_key(&self, api_key: &str) -> Result<Option<UserInfo>, AuthError> {
        let user = self.store.verify_api_key(api_key).await?;
        Ok(user.map(UserInfo::from))
    }

    async fn get_user_info(&self, id: UserId) -> Result<UserInfo, AuthError> {
        let user = self
            .store
            .get_user(id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        Ok(UserInfo::from(user))
    }

    async fn change_password(
        &self,
        id: UserId,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        self.check_password(new_password)?;

        if current_password == new_password {
            return Err(AuthError::Validation(
                "New password must be different from current password".to_string(),
            ));
        }

        let user = self
            .store
            .get_user(id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        let is_valid = self
            .store
            .verify_user_password(&user.username, current_password)
            .await?;

        if !is_valid {
            return Err(AuthError::Validation(
                "Current password is incorrect".to_string(),
            ));
        }

        self.store
            .update_user_password(id, new_password, &self.security)
            .await?;

        info!("Password changed for user: {}", user.username);
        Ok(())
    }

    async fn get_api_key(&self, id: UserId) -> Result<String, AuthError> {
        let user = self
            .store
            .get_user(id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        Ok(user.api_key)
    }

    async fn regenerate_api_key(&self, id: UserId) -> Result<String, AuthError> {
        let api_key = self.store.regenerate_api_key(id).await?;
        info!(user_id = id.value(), "API key regenerated");
        Ok(api_key)
    }
}
