//! Personal media lists.

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use std::sync::Arc;

use super::auth::CurrentUser;
use super::validation::{parse_list_kind, validate_media_id};
use super::{ApiError, ApiResponse, AppState, UpdateEntryRequest};
use crate::db::EntryChanges;
use crate::domain::ListEntry;
use crate::services::{ListError, NewEntry, UserList};

impl From<ListError> for ApiError {
    fn from(err: ListError) -> Self {
        match err {
            ListError::Constraint(violation) => violation.into(),
            ListError::NotFound(msg) => Self::NotFound(msg),
            ListError::Database(msg) => Self::DatabaseError(msg),
            ListError::Internal(msg) => Self::internal(msg),
        }
    }
}

/// `GET /api/lists/{kind}`: the caller's own list. `kind` is `films`,
/// `series`, `books` or `all`.
pub async fn get_own_list(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Path(kind): Path<String>,
) -> Result<Json<ApiResponse<UserList>>, ApiError> {
    let kind = parse_list_kind(&kind)?;
    let entries = state.list_service().list_for(current.id, kind).await?;
    Ok(Json(ApiResponse::success(UserList::new(
        &current.username,
        kind,
        entries,
    ))))
}

/// `GET /api/users/{username}/lists/{kind}`
pub async fn get_user_list(
    State(state): State<Arc<AppState>>,
    Path((username, kind)): Path<(String, String)>,
) -> Result<Json<ApiResponse<UserList>>, ApiError> {
    let kind = parse_list_kind(&kind)?;
    let list = state.list_service().user_list(&username, kind).await?;
    Ok(Json(ApiResponse::success(list)))
}

/// `POST /api/lists`
pub async fn add_entry(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Json(payload): Json<NewEntry>,
) -> Result<(StatusCode, Json<ApiResponse<ListEntry>>), ApiError> {
    validate_media_id(payload.media_id.value())?;
    let entry = state.list_service().add_entry(current.id, payload).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(entry))))
}

/// `PUT /api/lists/{media_id}`
pub async fn update_entry(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Path(media_id): Path<i32>,
    Json(payload): Json<UpdateEntryRequest>,
) -> Result<Json<ApiResponse<ListEntry>>, ApiError> {
    let media_id = validate_media_id(media_id)?;
    let entry = state
        .list_service()
        .update_entry(
            current.id,
            media_id,
            EntryChanges {
                score: payload.score,
                progress: payload.progress,
            },
        )
        .await?;
    Ok(Json(ApiResponse::success(entry)))
}

/// `DELETE /api/lists/{media_id}`
pub async fn remove_entry(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Path(media_id): Path<i32>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let media_id = validate_media_id(media_id)?;
    state
        .list_service()
        .remove_entry(current.id, media_id)
        .await?;
    Ok(Json(ApiResponse::success(())))
}
