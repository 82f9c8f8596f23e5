use sqlx::{SqliteConnection, SqlitePool};

use crate::models::{pair_key, FriendshipRow};

pub const SQL_FIND_FRIENDSHIP: &str = r#"
SELECT pair_key, user_a, user_b, created_at
FROM friendships
WHERE pair_key = ?1
LIMIT 1
"#;

pub const SQL_FRIENDSHIPS_OF_USER: &str = r#"
SELECT pair_key, user_a, user_b, created_at
FROM friendships
WHERE user_a = ?1 OR user_b = ?1
"#;

pub const SQL_INSERT_FRIENDSHIP: &str = r#"
INSERT INTO friendships (
  pair_key,
  user_a,
  user_b
) VALUES (?1, ?2, ?3)
"#;

pub async fn are_friends(pool: &SqlitePool, a: &str, b: &str) -> sqlx::Result<bool> {
    let row = sqlx::query_as::<_, FriendshipRow>(SQL_FIND_FRIENDSHIP)
        .bind(pair_key(a, b))
        .fetch_optional(pool)
        .await?;
    Ok(row.is_some())
}

/// Ids of everyone sharing a friendship edge with `user_id`.
pub async fn partner_ids(pool: &SqlitePool, user_id: &str) -> sqlx::Result<Vec<String>> {
    let rows = sqlx::query_as::<_, FriendshipRow>(SQL_FRIENDSHIPS_OF_USER)
        .bind(user_id)
        .fetch_all(pool)
        .await?;
    Ok(rows
        .into_iter()
        .map(|row| {
            if row.user_a == user_id {
                row.user_b
            } else {
                row.user_a
            }
        })
        .collect())
}

/// Inserts the edge for the unordered pair. Runs on a transaction handle so
/// acceptance commits the request-status change and the edge as one unit.
pub async fn insert_friendship(conn: &mut SqliteConnection, a: &str, b: &str) -> sqlx::Result<()> {
    let (user_a, user_b) = if a <= b { (a, b) } else { (b, a) };
    sqlx::query(SQL_INSERT_FRIENDSHIP)
        .bind(pair_key(a, b))
        .bind(user_a)
        .bind(user_b)
        .execute(&mut *conn)
        .await?;
    Ok(())
}
