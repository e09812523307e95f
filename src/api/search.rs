//! User and media search.
//!
//! `GET /api/search?type=users&query=...` validates its input and redirects
//! to the type-specific endpoint.

use axum::{
    Json,
    extract::{Query, State},
    response::Redirect,
};
use std::sync::Arc;

use super::validation::validate_page;
use super::{ApiError, ApiResponse, AppState, SearchQuery};
use crate::domain::Media;
use crate::services::{SearchPage, SearchType, UserError, UserInfo};

fn check_query(query: &str, min_len: usize) -> Result<(), ApiError> {
    if query.chars().count() < min_len {
        return Err(ApiError::validation(format!(
            "Search query must be at least {min_len} characters"
        )));
    }
    Ok(())
}

/// `GET /api/search`
pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchQuery>,
) -> Result<Redirect, ApiError> {
    let min_len = state.config().read().await.search.min_query_length;
    check_query(&params.query, min_len)?;

    let search_type: SearchType = params
        .search_type
        .as_deref()
        .unwrap_or_default()
        .parse()
        .map_err(|e: UserError| ApiError::validation(e.to_string()))?;

    let mut target = format!(
        "/api/search/{}?query={}",
        search_type.as_str(),
        urlencoding::encode(&params.query)
    );
    if let Some(page) = params.page {
        let page = validate_page(Some(page))?;
        target.push_str(&format!("&page={page}"));
    }

    Ok(Redirect::to(&target))
}

/// `GET /api/search/users`
pub async fn search_users(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchQuery>,
) -> Result<Json<ApiResponse<SearchPage<UserInfo>>>, ApiError> {
    let page = state
        .user_service()
        .search_users(&params.query, validate_page(params.page)?)
        .await?;
    Ok(Json(ApiResponse::success(page)))
}

/// `GET /api/search/media`
pub async fn search_media(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchQuery>,
) -> Result<Json<ApiResponse<SearchPage<Media>>>, ApiError> {
    let page = state
        .user_service()
        .search_media(&params.query, validate_page(params.page)?)
        .await?;
    Ok(Json(ApiResponse::success(page)))
}
