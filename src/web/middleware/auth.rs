use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use sqlx::SqlitePool;
use tracing::error;

use crate::database::user_repo;
use crate::models::UserRow;
use crate::services::auth_service;

/// Full user record for the authenticated caller, attached to the request
/// extensions before any protected handler runs.
#[derive(Clone, Debug)]
pub struct CurrentUser {
    pub user: UserRow,
}

fn unauthorized(message: &str) -> Response {
    (StatusCode::UNAUTHORIZED, Json(json!({ "message": message }))).into_response()
}

pub async fn require_auth(
    State(pool): State<SqlitePool>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = request
        .headers()
        .get(header::COOKIE)
        .and_then(|hv| hv.to_str().ok())
        .and_then(|cookies| {
            cookies
                .split("; ")
                .find_map(|c| c.strip_prefix("token=").map(|t| t.to_string()))
        });

    let Some(token) = token else {
        return unauthorized("Unauthorized - No token provided");
    };

    let user_id = match auth_service::verify_token(&token) {
        Ok(id) => id,
        Err(_) => return unauthorized("Unauthorized - Invalid token"),
    };

    let user = match user_repo::find_by_id(&pool, &user_id).await {
        Ok(Some(user)) => user,
        Ok(None) => return unauthorized("Unauthorized - User not found"),
        Err(e) => {
            error!(error = %e, "user lookup failed in auth middleware");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "message": "Internal Server Error" })),
            )
                .into_response();
        }
    };

    request.extensions_mut().insert(CurrentUser { user });
    next.run(request).await
}
