use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use sqlx::SqlitePool;

use crate::models::{FriendRequestRow, UserProfileRow, UserPublic};
use crate::services::error::ServiceError;
use crate::services::{friend_service, recommendation_service};
use crate::web::error::ApiResult;
use crate::web::middleware::auth::CurrentUser;

pub async fn recommended_users_handler(
    Extension(current): Extension<CurrentUser>,
    State(pool): State<SqlitePool>,
) -> ApiResult<Json<Vec<UserPublic>>> {
    let users = recommendation_service::get_recommended_users(&pool, &current.user.id).await?;
    Ok(Json(users.into_iter().map(UserPublic::from).collect()))
}

pub async fn my_friends_handler(
    Extension(current): Extension<CurrentUser>,
    State(pool): State<SqlitePool>,
) -> ApiResult<Json<Vec<UserProfileRow>>> {
    let friends = friend_service::get_my_friends(&pool, &current.user.id).await?;
    Ok(Json(friends))
}

pub async fn send_friend_request_handler(
    Extension(current): Extension<CurrentUser>,
    State(pool): State<SqlitePool>,
    Path(recipient_id): Path<String>,
) -> ApiResult<(StatusCode, Json<FriendRequestRow>)> {
    // On this route the wire contract reports already-friends and
    // duplicate-request refusals as plain 400s.
    let request = friend_service::send_friend_request(&pool, &current.user.id, &recipient_id)
        .await
        .map_err(|e| match e {
            ServiceError::Conflict(msg) => ServiceError::Validation(msg),
            other => other,
        })?;
    Ok((StatusCode::CREATED, Json(request)))
}

pub async fn accept_friend_request_handler(
    Extension(current): Extension<CurrentUser>,
    State(pool): State<SqlitePool>,
    Path(request_id): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    friend_service::accept_friend_request(&pool, &current.user.id, &request_id).await?;
    Ok(Json(serde_json::json!({
        "message": "Friend request accepted"
    })))
}

pub async fn friend_requests_handler(
    Extension(current): Extension<CurrentUser>,
    State(pool): State<SqlitePool>,
) -> ApiResult<Json<friend_service::FriendRequestsView>> {
    let view = friend_service::get_friend_requests(&pool, &current.user.id).await?;
    Ok(Json(view))
}

pub async fn outgoing_friend_requests_handler(
    Extension(current): Extension<CurrentUser>,
    State(pool): State<SqlitePool>,
) -> ApiResult<Json<Vec<friend_service::RequestView>>> {
    let outgoing = friend_service::get_outgoing_friend_reqs(&pool, &current.user.id).await?;
    Ok(Json(outgoing))
}
