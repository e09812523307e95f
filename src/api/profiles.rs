use axum::{
    Extension, Json,
    extract::{Path, State},
};
use std::sync::Arc;

use super::auth::CurrentUser;
use super::{ApiError, ApiResponse, AppState};
use crate::services::{Profile, UserError};

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound(msg) => Self::NotFound(msg),
            UserError::Validation(msg) => Self::validation(msg),
            UserError::Database(msg) => Self::DatabaseError(msg),
            UserError::Internal(msg) => Self::internal(msg),
        }
    }
}

/// `GET /api/profile`
pub async fn get_own_profile(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Json<ApiResponse<Profile>>, ApiError> {
    let profile = state.user_service().profile(&current.username).await?;
    Ok(Json(ApiResponse::success(profile)))
}

/// `GET /api/users/{username}`
pub async fn get_profile(
    State(state): State<Arc<AppState>>,
    Path(username): Path<String>,
) -> Result<Json<ApiResponse<Profile>>, ApiError> {
    let profile = state.user_service().profile(&username).await?;
    Ok(Json(ApiResponse::success(profile)))
}
