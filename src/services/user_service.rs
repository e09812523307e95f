//! Domain service for public profiles and user/media search.

use serde::Serialize;
use std::str::FromStr;
use thiserror::Error;

use crate::db::StoreError;
use crate::domain::Media;
use crate::services::auth_service::UserInfo;

#[derive(Debug, Error)]
pub enum UserError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<StoreError> for UserError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Constraint(violation) => Self::Validation(violation.to_string()),
            StoreError::NotFound { .. } => Self::NotFound(err.to_string()),
            StoreError::Database(e) => Self::Database(e.to_string()),
            StoreError::Internal(msg) => Self::Internal(msg),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchType {
    Users,
    Media,
}

impl SearchType {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::Media => "media",
        }
    }
}

impl FromStr for SearchType {
    type Err = UserError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "users" => Ok(Self::Users),
            "media" => Ok(Self::Media),
            _ => Err(UserError::Validation("Invalid search type".to_string())),
        }
    }
}

/// Number of entries per list type shown on a profile.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ListCounts {
    pub films: usize,
    pub series: usize,
    pub books: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct Profile {
    /// "james' profile", "john_smith's profile".
    pub title: String,
    pub user: UserInfo,
    pub lists: ListCounts,
}

/// One page of search results. `page` is one-based.
#[derive(Debug, Clone, Serialize)]
pub struct SearchPage<T> {
    pub query: String,
    pub page: u64,
    pub page_size: u64,
    pub total: u64,
    pub results: Vec<T>,
}

#[async_trait::async_trait]
pub trait UserService: Send + Sync {
    /// # Errors
    ///
    /// Returns [`UserError::NotFound`] if no user has this username.
    async fn profile(&self, username: &str) -> Result<Profile, UserError>;

    /// Users whose username, first or last name contains `query`, most
    /// recently active first.
    ///
    /// # Errors
    ///
    /// Returns [`UserError::Validation`] when `query` is too short.
    async fn search_users(&self, query: &str, page: u64)
    -> Result<SearchPage<UserInfo>, UserError>;

    /// Media whose title or local title contains `query`.
    async fn search_media(&self, query: &str, page: u64) -> Result<SearchPage<Media>, UserError>;
}
