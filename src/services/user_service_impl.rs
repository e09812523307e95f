//! `SeaORM` implementation of the `UserService` trait.

use async_trait::async_trait;

use crate::config::SearchConfig;
use crate::db::{MediaQuery, Store, StoreError};
use crate::domain::{Media, MediaKind, possessive};
use crate::services::auth_service::UserInfo;
use crate::services::user_service::{ListCounts, Profile, SearchPage, UserError, UserService};

pub struct SeaOrmUserService {
    store: Store,
    search: SearchConfig,
}

impl SeaOrmUserService {
    #[must_use]
    pub const fn new(store: Store, search: SearchConfig) -> Self {
        Self { store, search }
    }

    fn check_query<'a>(&self, query: &'a str) -> Result<&'a str, UserError> {
        if query.chars().count() < self.search.min_query_length {
            return Err(UserError::Validation(format!(
                "Search query must be at least {} characters",
                self.search.min_query_length
            )));
        }
        Ok(query)
    }
}

#[async_trait]
impl UserService for SeaOrmUserService {
    async fn profile(&self, username: &str) -> Result<Profile, UserError> {
        let user = self
            .store
            .get_user_by_username(username)
            .await?
            .ok_or_else(|| StoreError::not_found("User", username))?;

        let entries = self.store.list_entries(user.id, None).await?;
        let lists = entries
            .iter()
            .fold(ListCounts::default(), |mut counts, entry| {
                match entry.media.media_type {
                    MediaKind::Film => counts.films += 1,
                    MediaKind::Series => counts.series += 1,
                    MediaKind::Book => counts.books += 1,
                }
                counts
            });

        Ok(Profile {
            title: format!("{} profile", possessive(&user.username)),
            user: UserInfo::from(user),
            lists,
        })
    }

    async fn search_users(
        &self,
        query: &str,
        page: u64,
    ) -> Result<SearchPage<UserInfo>, UserError> {
        let query = self.check_query(query)?;
        let page = page.max(1);

        let found = self
            .store
            .search_users(query, page - 1, self.search.page_size)
            .await?;

        metrics::counter!("searches_total", "type" => "users").increment(1);

        Ok(SearchPage {
            query: query.to_string(),
            page,
            page_size: self.search.page_size,
            total: found.total,
            results: found.users.into_iter().map(UserInfo::from).collect(),
        })
    }

    async fn search_media(&self, query: &str, page: u64) -> Result<SearchPage<Media>, UserError> {
        let query = self.check_query(query)?;
        let page = page.max(1);

        let found = self
            .store
            .list_media(&MediaQuery {
                kind: None,
                title: Some(query.to_string()),
                page: page - 1,
                page_size: self.search.page_size,
            })
            .await?;

        metrics::counter!("searches_total", "type" => "media").increment(1);

        Ok(SearchPage {
            query: query.to_string(),
            page,
            page_size: self.search.page_size,
            total: found.total,
            results: found.items,
        })
    }
}
