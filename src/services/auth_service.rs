use std::sync::OnceLock;
use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use rand::Rng;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::database::user_repo;
use crate::models::UserRow;
use crate::services::chat_service;
use crate::services::error::ServiceError;

pub const TOKEN_TTL_SECONDS: u64 = 7 * 24 * 60 * 60;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub iat: u64,
    pub exp: u64,
}

fn jwt_secret() -> String {
    std::env::var("JWT_SECRET").unwrap_or_else(|_| "dev-secret-change-me".to_string())
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Session token: HS256, `sub` = user id, valid for seven days.
pub fn generate_token(user_id: &str) -> Result<String, ServiceError> {
    let now = unix_now();
    let claims = Claims {
        sub: user_id.to_string(),
        iat: now,
        exp: now + TOKEN_TTL_SECONDS,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_secret().as_bytes()),
    )
    .map_err(|e| ServiceError::internal(format!("failed to sign session token: {e}")))
}

/// Verifies signature and expiry, returns the user id carried in `sub`.
pub fn verify_token(token: &str) -> Result<String, ServiceError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_secret().as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims.sub)
    .map_err(|_| ServiceError::unauthorized("Unauthorized - Invalid token"))
}

// Same pattern the web client enforces: something@something.tld, no
// whitespace. Deliberately loose beyond that.
fn email_regex() -> &'static Regex {
    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    EMAIL_REGEX.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex"))
}

fn is_valid_email(email: &str) -> bool {
    email_regex().is_match(email)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupInput {
    pub full_name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingInput {
    pub full_name: Option<String>,
    pub bio: Option<String>,
    pub native_language: Option<String>,
    pub learning_language: Option<String>,
    pub location: Option<String>,
}

/// Creates the account, mirrors it into the chat directory (best effort)
/// and returns the stored row. The caller mints the session cookie.
pub async fn signup(pool: &SqlitePool, input: SignupInput) -> Result<UserRow, ServiceError> {
    let full_name = input.full_name.trim();
    let email = input.email.trim().to_lowercase();
    let password = input.password.as_str();

    if full_name.is_empty() {
        return Err(ServiceError::validation("Full name is required"));
    }
    if !is_valid_email(&email) {
        return Err(ServiceError::validation("Invalid email format"));
    }
    if password.len() < 6 || password.len() > 100 {
        return Err(ServiceError::validation(
            "Password must be between 6 and 100 characters",
        ));
    }

    if user_repo::find_by_email(pool, &email).await?.is_some() {
        return Err(ServiceError::conflict(
            "User with this email already exists",
        ));
    }

    let password_hash = bcrypt::hash(password, bcrypt::DEFAULT_COST)
        .map_err(|e| ServiceError::internal(format!("failed to hash password: {e}")))?;

    let idx = rand::thread_rng().gen_range(1..=100);
    let avatar_url = format!("https://avatar.iran.liara.run/public/{idx}.png");

    let id = Uuid::new_v4().to_string();
    user_repo::insert_user(
        pool,
        user_repo::NewUser {
            id: &id,
            full_name,
            email: &email,
            password_hash: &password_hash,
            avatar_url: &avatar_url,
        },
    )
    .await?;

    let user = user_repo::find_by_id(pool, &id)
        .await?
        .ok_or_else(|| ServiceError::internal("user missing after insert"))?;

    chat_service::upsert_chat_user(&user).await;

    Ok(user)
}

/// One failure message for unknown email and wrong password, so login
/// never confirms whether an account exists.
pub async fn login(pool: &SqlitePool, input: LoginInput) -> Result<UserRow, ServiceError> {
    let email = input.email.trim().to_lowercase();

    if !is_valid_email(&email) {
        return Err(ServiceError::validation("Invalid email format"));
    }
    if input.password.is_empty() {
        return Err(ServiceError::validation("Password is required"));
    }

    let Some(user) = user_repo::find_by_email(pool, &email).await? else {
        return Err(ServiceError::unauthorized("Invalid email or password"));
    };

    let valid = bcrypt::verify(&input.password, &user.password_hash)
        .map_err(|e| ServiceError::internal(format!("failed to verify password: {e}")))?;
    if !valid {
        return Err(ServiceError::unauthorized("Invalid email or password"));
    }

    Ok(user)
}

/// Completes the profile and flips `is_onboarded`. All five fields are
/// required; the response names the ones that were missing.
pub async fn onboard(
    pool: &SqlitePool,
    user_id: &str,
    input: OnboardingInput,
) -> Result<UserRow, ServiceError> {
    fn required<'a>(
        value: &'a Option<String>,
        name: &str,
        missing: &mut Vec<String>,
    ) -> &'a str {
        match value.as_deref().map(str::trim) {
            Some(v) if !v.is_empty() => v,
            _ => {
                missing.push(name.to_string());
                ""
            }
        }
    }

    let mut missing = Vec::new();
    let full_name = required(&input.full_name, "fullName", &mut missing);
    let bio = required(&input.bio, "bio", &mut missing);
    let native_language = required(&input.native_language, "nativeLanguage", &mut missing);
    let learning_language = required(&input.learning_language, "learningLanguage", &mut missing);
    let location = required(&input.location, "location", &mut missing);

    if !missing.is_empty() {
        return Err(ServiceError::MissingFields(missing));
    }

    let touched = user_repo::mark_onboarded(
        pool,
        user_id,
        user_repo::OnboardingUpdate {
            full_name,
            bio,
            native_language,
            learning_language,
            location,
        },
    )
    .await?;
    if touched == 0 {
        return Err(ServiceError::not_found("User not found"));
    }

    let user = user_repo::find_by_id(pool, user_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("User not found"))?;

    chat_service::upsert_chat_user(&user).await;

    Ok(user)
}
