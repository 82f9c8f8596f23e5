use axum::{Extension, Json};
use serde_json::json;

use crate::services::chat_service;
use crate::web::error::ApiResult;
use crate::web::middleware::auth::CurrentUser;

/// Issues the provider-signed token the client uses to open its chat
/// session. Channel setup itself happens client-side against the provider.
pub async fn chat_token_handler(
    Extension(current): Extension<CurrentUser>,
) -> ApiResult<Json<serde_json::Value>> {
    let token = chat_service::provider_token(&current.user.id)?;
    Ok(Json(json!({ "token": token })))
}
