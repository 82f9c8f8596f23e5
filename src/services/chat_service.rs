use jsonwebtoken::{encode, EncodingKey, Header};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::models::UserRow;
use crate::services::error::ServiceError;

// The chat provider authenticates clients with a JWT signed by the shared
// API secret, carrying the provider-side `user_id` claim.
#[derive(Serialize)]
struct ChatClaims<'a> {
    user_id: &'a str,
}

fn chat_api_url() -> String {
    std::env::var("CHAT_API_URL").unwrap_or_else(|_| "http://127.0.0.1:8090".to_string())
}

fn chat_api_key() -> Option<String> {
    std::env::var("CHAT_API_KEY").ok().filter(|v| !v.is_empty())
}

fn chat_api_secret() -> Option<String> {
    std::env::var("CHAT_API_SECRET")
        .ok()
        .filter(|v| !v.is_empty())
}

fn sign_chat_token(secret: &str, user_id: &str) -> Result<String, ServiceError> {
    encode(
        &Header::default(),
        &ChatClaims { user_id },
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| ServiceError::internal(format!("failed to sign chat token: {e}")))
}

/// Token the client uses to open its chat session with the provider.
pub fn provider_token(user_id: &str) -> Result<String, ServiceError> {
    let secret = chat_api_secret()
        .ok_or_else(|| ServiceError::internal("chat provider is not configured"))?;
    sign_chat_token(&secret, user_id)
}

/// Mirrors the user into the external chat directory, on signup and again
/// after onboarding. Best effort: every failure is logged and swallowed so
/// the primary operation never fails on the chat provider's account.
pub async fn upsert_chat_user(user: &UserRow) {
    let (Some(key), Some(secret)) = (chat_api_key(), chat_api_secret()) else {
        debug!("chat directory sync skipped: provider not configured");
        return;
    };

    let server_token = match sign_chat_token(&secret, "server") {
        Ok(token) => token,
        Err(e) => {
            warn!(error = %e, "chat directory upsert skipped: could not sign server token");
            return;
        }
    };

    let url = format!(
        "{}/users?api_key={}",
        chat_api_url().trim_end_matches('/'),
        key
    );
    let body = serde_json::json!({
        "id": user.id,
        "name": user.full_name,
        "image": user.avatar_url,
    });

    let client = reqwest::Client::new();
    match client
        .post(&url)
        .bearer_auth(server_token)
        .json(&body)
        .send()
        .await
    {
        Ok(resp) if resp.status().is_success() => {
            info!(user_id = %user.id, "chat directory user upserted");
        }
        Ok(resp) => {
            warn!(user_id = %user.id, status = %resp.status(), "chat directory upsert rejected");
        }
        Err(e) => {
            warn!(user_id = %user.id, error = %e, "chat directory upsert failed");
        }
    }
}
