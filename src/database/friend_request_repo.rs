use sqlx::{SqliteConnection, SqlitePool};

use crate::models::{pair_key, FriendRequestRow, RequestStatus, RequestWithProfileRow};

pub struct NewFriendRequest<'a> {
    pub id: &'a str,
    pub sender_id: &'a str,
    pub recipient_id: &'a str,
}

pub const SQL_INSERT_FRIEND_REQUEST: &str = r#"
INSERT INTO friend_requests (
  id,
  sender_id,
  recipient_id,
  status,
  pair_key
) VALUES (?1, ?2, ?3, ?4, ?5)
"#;

pub const SQL_FIND_REQUEST_BY_ID: &str = r#"
SELECT id, sender_id, recipient_id, status, created_at
FROM friend_requests
WHERE id = ?1
LIMIT 1
"#;

pub const SQL_COUNT_REQUESTS_FOR_PAIR: &str = r#"
SELECT COUNT(*)
FROM friend_requests
WHERE pair_key = ?1
"#;

pub const SQL_INCOMING_PENDING: &str = r#"
SELECT
    r.id, r.sender_id, r.recipient_id, r.status, r.created_at,
    u.id AS profile_id,
    u.full_name AS profile_full_name,
    u.avatar_url AS profile_avatar_url,
    u.native_language AS profile_native_language,
    u.learning_language AS profile_learning_language
FROM friend_requests r
JOIN users u ON u.id = r.sender_id
WHERE r.recipient_id = ?1
  AND r.status = 'PENDING'
ORDER BY r.created_at DESC
"#;

pub const SQL_ACCEPTED_FOR_SENDER: &str = r#"
SELECT
    r.id, r.sender_id, r.recipient_id, r.status, r.created_at,
    u.id AS profile_id,
    u.full_name AS profile_full_name,
    u.avatar_url AS profile_avatar_url,
    u.native_language AS profile_native_language,
    u.learning_language AS profile_learning_language
FROM friend_requests r
JOIN users u ON u.id = r.recipient_id
WHERE r.sender_id = ?1
  AND r.status = 'ACCEPTED'
ORDER BY r.created_at DESC
"#;

pub const SQL_OUTGOING_PENDING: &str = r#"
SELECT
    r.id, r.sender_id, r.recipient_id, r.status, r.created_at,
    u.id AS profile_id,
    u.full_name AS profile_full_name,
    u.avatar_url AS profile_avatar_url,
    u.native_language AS profile_native_language,
    u.learning_language AS profile_learning_language
FROM friend_requests r
JOIN users u ON u.id = r.recipient_id
WHERE r.sender_id = ?1
  AND r.status = 'PENDING'
ORDER BY r.created_at DESC
"#;

pub const SQL_COUNTERPARTY_IDS: &str = r#"
SELECT CASE WHEN sender_id = ?1 THEN recipient_id ELSE sender_id END
FROM friend_requests
WHERE sender_id = ?1 OR recipient_id = ?1
"#;

pub const SQL_MARK_ACCEPTED: &str = r#"
UPDATE friend_requests
SET status = 'ACCEPTED'
WHERE id = ?1 AND status = 'PENDING'
"#;

pub async fn insert_pending(pool: &SqlitePool, request: NewFriendRequest<'_>) -> sqlx::Result<()> {
    sqlx::query(SQL_INSERT_FRIEND_REQUEST)
        .bind(request.id)
        .bind(request.sender_id)
        .bind(request.recipient_id)
        .bind(RequestStatus::Pending)
        .bind(pair_key(request.sender_id, request.recipient_id))
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn find_by_id(pool: &SqlitePool, request_id: &str) -> sqlx::Result<Option<FriendRequestRow>> {
    sqlx::query_as::<_, FriendRequestRow>(SQL_FIND_REQUEST_BY_ID)
        .bind(request_id)
        .fetch_optional(pool)
        .await
}

/// True when any request row exists between the two users, in either
/// direction and in any status.
pub async fn exists_for_pair(pool: &SqlitePool, a: &str, b: &str) -> sqlx::Result<bool> {
    let count = sqlx::query_scalar::<_, i64>(SQL_COUNT_REQUESTS_FOR_PAIR)
        .bind(pair_key(a, b))
        .fetch_one(pool)
        .await?;
    Ok(count > 0)
}

pub async fn list_pending_for_recipient(
    pool: &SqlitePool,
    user_id: &str,
) -> sqlx::Result<Vec<RequestWithProfileRow>> {
    sqlx::query_as::<_, RequestWithProfileRow>(SQL_INCOMING_PENDING)
        .bind(user_id)
        .fetch_all(pool)
        .await
}

pub async fn list_accepted_for_sender(
    pool: &SqlitePool,
    user_id: &str,
) -> sqlx::Result<Vec<RequestWithProfileRow>> {
    sqlx::query_as::<_, RequestWithProfileRow>(SQL_ACCEPTED_FOR_SENDER)
        .bind(user_id)
        .fetch_all(pool)
        .await
}

pub async fn list_pending_for_sender(
    pool: &SqlitePool,
    user_id: &str,
) -> sqlx::Result<Vec<RequestWithProfileRow>> {
    sqlx::query_as::<_, RequestWithProfileRow>(SQL_OUTGOING_PENDING)
        .bind(user_id)
        .fetch_all(pool)
        .await
}

/// Ids of every user on the other side of a request involving `user_id`,
/// whatever the direction or status. Feeds the recommendation exclusion set.
pub async fn counterparty_ids(pool: &SqlitePool, user_id: &str) -> sqlx::Result<Vec<String>> {
    sqlx::query_scalar::<_, String>(SQL_COUNTERPARTY_IDS)
        .bind(user_id)
        .fetch_all(pool)
        .await
}

/// Flips a PENDING request to ACCEPTED. Returns the number of rows touched:
/// 0 means the request was already resolved by someone else. Runs on a
/// transaction handle so the caller can commit it together with the
/// friendship edge.
pub async fn mark_accepted(conn: &mut SqliteConnection, request_id: &str) -> sqlx::Result<u64> {
    let result = sqlx::query(SQL_MARK_ACCEPTED)
        .bind(request_id)
        .execute(&mut *conn)
        .await?;
    Ok(result.rows_affected())
}
