//! Media catalogue and relationship endpoints.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use std::sync::Arc;

use super::validation::{parse_media_kind, validate_media_id, validate_page, validate_page_size};
use super::{ApiError, ApiResponse, AppState, LinkRequest, MediaListQuery, Paginated};
use crate::db::MediaQuery;
use crate::domain::{Edge, FieldMap, Media, MediaKind};
use crate::services::{MediaError, MediaRelations};

const DEFAULT_PAGE_SIZE: u64 = 25;

impl From<MediaError> for ApiError {
    fn from(err: MediaError) -> Self {
        match err {
            MediaError::Constraint(violation) => violation.into(),
            MediaError::NotFound(msg) => Self::NotFound(msg),
            MediaError::Database(msg) => Self::DatabaseError(msg),
            MediaError::Internal(msg) => Self::internal(msg),
        }
    }
}

/// `GET /api/media?type=&query=&page=&page_size=`
pub async fn list_media(
    State(state): State<Arc<AppState>>,
    Query(params): Query<MediaListQuery>,
) -> Result<Json<ApiResponse<Paginated<Media>>>, ApiError> {
    let kind = parse_media_kind(params.media_type.as_deref())?;
    let page = validate_page(params.page)?;
    let page_size = validate_page_size(params.page_size.unwrap_or(DEFAULT_PAGE_SIZE))?;

    let result = state
        .media_service()
        .list(MediaQuery {
            kind,
            title: params.query,
            page: page - 1,
            page_size,
        })
        .await?;

    Ok(Json(ApiResponse::success(Paginated {
        page,
        page_size,
        total: result.total,
        items: result.items,
    })))
}

/// `GET /api/media/{id}`: the item with its sequels, prequels and relatives.
pub async fn get_media(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<MediaRelations>>, ApiError> {
    let id = validate_media_id(id)?;
    let relations = state.media_service().relations(id).await?;
    Ok(Json(ApiResponse::success(relations)))
}

pub async fn get_sequels(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<Vec<Media>>>, ApiError> {
    let id = validate_media_id(id)?;
    let media = state.media_service().get_sequels(id).await?;
    Ok(Json(ApiResponse::success(media)))
}

pub async fn get_prequels(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<Vec<Media>>>, ApiError> {
    let id = validate_media_id(id)?;
    let media = state.media_service().get_prequels(id).await?;
    Ok(Json(ApiResponse::success(media)))
}

pub async fn get_related(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<Vec<Media>>>, ApiError> {
    let id = validate_media_id(id)?;
    let media = state.media_service().get_related(id).await?;
    Ok(Json(ApiResponse::success(media)))
}

async fn create(
    state: &AppState,
    kind: MediaKind,
    fields: FieldMap,
) -> Result<(StatusCode, Json<ApiResponse<Media>>), ApiError> {
    let media = state.media_service().create_media(kind, fields).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(media))))
}

/// `POST /api/media/films`
pub async fn create_film(
    State(state): State<Arc<AppState>>,
    Json(fields): Json<FieldMap>,
) -> Result<(StatusCode, Json<ApiResponse<Media>>), ApiError> {
    create(&state, MediaKind::Film, fields).await
}

/// `POST /api/media/series`
pub async fn create_series(
    State(state): State<Arc<AppState>>,
    Json(fields): Json<FieldMap>,
) -> Result<(StatusCode, Json<ApiResponse<Media>>), ApiError> {
    create(&state, MediaKind::Series, fields).await
}

/// `POST /api/media/books`
pub async fn create_book(
    State(state): State<Arc<AppState>>,
    Json(fields): Json<FieldMap>,
) -> Result<(StatusCode, Json<ApiResponse<Media>>), ApiError> {
    create(&state, MediaKind::Book, fields).await
}

/// `DELETE /api/media/{id}`
pub async fn delete_media(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let id = validate_media_id(id)?;
    state.media_service().delete(id).await?;
    Ok(Json(ApiResponse::success(())))
}

/// `POST /api/media/{id}/relations` with `{"other_id": 2, "kind": "sequel"}`
/// records media 2 as a sequel of `id`.
pub async fn add_relation(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(payload): Json<LinkRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Edge>>), ApiError> {
    let id = validate_media_id(id)?;
    let other = validate_media_id(payload.other_id.value())?;

    let edge = state
        .media_service()
        .link(id, other, payload.kind)
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(edge))))
}

/// `DELETE /api/media/{id}/relations/{other}`
pub async fn delete_relation(
    State(state): State<Arc<AppState>>,
    Path((id, other)): Path<(i32, i32)>,
) -> Result<Json<ApiResponse<Edge>>, ApiError> {
    let id = validate_media_id(id)?;
    let other = validate_media_id(other)?;

    let edge = state.media_service().delete_related(id, other).await?;
    Ok(Json(ApiResponse::success(edge)))
}
