use sqlx::{sqlite::SqliteArguments, Arguments, SqlitePool};

use crate::models::{UserProfileRow, UserRow};

pub struct NewUser<'a> {
    pub id: &'a str,
    pub full_name: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub avatar_url: &'a str,
}

pub struct OnboardingUpdate<'a> {
    pub full_name: &'a str,
    pub bio: &'a str,
    pub native_language: &'a str,
    pub learning_language: &'a str,
    pub location: &'a str,
}

pub const SQL_INSERT_USER: &str = r#"
INSERT INTO users (
  id,
  full_name,
  email,
  password_hash,
  avatar_url
) VALUES (?1, ?2, ?3, ?4, ?5)
"#;

pub const SQL_FIND_USER_BY_ID: &str = r#"
SELECT
    id, full_name, email, password_hash, bio,
    native_language, learning_language, location,
    avatar_url, is_onboarded, created_at
FROM users
WHERE id = ?1
LIMIT 1
"#;

pub const SQL_FIND_USER_BY_EMAIL: &str = r#"
SELECT
    id, full_name, email, password_hash, bio,
    native_language, learning_language, location,
    avatar_url, is_onboarded, created_at
FROM users
WHERE email = ?1
LIMIT 1
"#;

pub const SQL_MARK_ONBOARDED: &str = r#"
UPDATE users
SET full_name = ?2,
    bio = ?3,
    native_language = ?4,
    learning_language = ?5,
    location = ?6,
    is_onboarded = 1
WHERE id = ?1
"#;

pub const SQL_ONBOARDED_USERS_BASE: &str = r#"
SELECT
    id, full_name, email, password_hash, bio,
    native_language, learning_language, location,
    avatar_url, is_onboarded, created_at
FROM users
WHERE is_onboarded = 1
"#;

pub const SQL_PROFILES_BASE: &str = r#"
SELECT
    id, full_name, avatar_url, native_language, learning_language
FROM users
"#;

pub async fn insert_user(pool: &SqlitePool, user: NewUser<'_>) -> sqlx::Result<()> {
    sqlx::query(SQL_INSERT_USER)
        .bind(user.id)
        .bind(user.full_name)
        .bind(user.email)
        .bind(user.password_hash)
        .bind(user.avatar_url)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn find_by_id(pool: &SqlitePool, user_id: &str) -> sqlx::Result<Option<UserRow>> {
    sqlx::query_as::<_, UserRow>(SQL_FIND_USER_BY_ID)
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

pub async fn find_by_email(pool: &SqlitePool, email: &str) -> sqlx::Result<Option<UserRow>> {
    sqlx::query_as::<_, UserRow>(SQL_FIND_USER_BY_EMAIL)
        .bind(email)
        .fetch_optional(pool)
        .await
}

/// Applies the onboarding profile fields and flips `is_onboarded`. Returns
/// the number of rows touched (0 when the user does not exist).
pub async fn mark_onboarded(
    pool: &SqlitePool,
    user_id: &str,
    update: OnboardingUpdate<'_>,
) -> sqlx::Result<u64> {
    let result = sqlx::query(SQL_MARK_ONBOARDED)
        .bind(user_id)
        .bind(update.full_name)
        .bind(update.bio)
        .bind(update.native_language)
        .bind(update.learning_language)
        .bind(update.location)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

/// All onboarded users whose id is not in `exclude`.
pub async fn list_onboarded_excluding(
    pool: &SqlitePool,
    exclude: &[String],
) -> sqlx::Result<Vec<UserRow>> {
    let mut sql = String::from(SQL_ONBOARDED_USERS_BASE);
    let mut args = SqliteArguments::default();

    if !exclude.is_empty() {
        sql.push_str(" AND id NOT IN (");
        sql.push_str(&vec!["?"; exclude.len()].join(", "));
        sql.push(')');
        for id in exclude {
            args.add(id);
        }
    }

    sqlx::query_as_with::<_, UserRow, _>(&sql, args)
        .fetch_all(pool)
        .await
}

/// Public profiles for the given ids, in no particular order.
pub async fn list_profiles_by_ids(
    pool: &SqlitePool,
    ids: &[String],
) -> sqlx::Result<Vec<UserProfileRow>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let mut sql = String::from(SQL_PROFILES_BASE);
    sql.push_str(" WHERE id IN (");
    sql.push_str(&vec!["?"; ids.len()].join(", "));
    sql.push(')');

    let mut args = SqliteArguments::default();
    for id in ids {
        args.add(id);
    }

    sqlx::query_as_with::<_, UserProfileRow, _>(&sql, args)
        .fetch_all(pool)
        .await
}
