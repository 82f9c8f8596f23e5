use sqlx::SqlitePool;

// `pair_key` is the sorted "a:b" form of the two user ids. The UNIQUE
// constraint on friend_requests keeps at most one request per unordered
// pair, whichever side sent it; the same key is the primary key of the
// friendships edge table.
pub const SCHEMA_STATEMENTS: &[&str] = &[
    r#"
CREATE TABLE IF NOT EXISTS users (
  id TEXT PRIMARY KEY,
  full_name TEXT NOT NULL,
  email TEXT NOT NULL UNIQUE,
  password_hash TEXT NOT NULL,
  bio TEXT,
  native_language TEXT,
  learning_language TEXT,
  location TEXT,
  avatar_url TEXT,
  is_onboarded INTEGER NOT NULL DEFAULT 0,
  created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
)
"#,
    r#"
CREATE TABLE IF NOT EXISTS friend_requests (
  id TEXT PRIMARY KEY,
  sender_id TEXT NOT NULL REFERENCES users(id),
  recipient_id TEXT NOT NULL REFERENCES users(id),
  status TEXT NOT NULL DEFAULT 'PENDING',
  pair_key TEXT NOT NULL UNIQUE,
  created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
)
"#,
    "CREATE INDEX IF NOT EXISTS idx_friend_requests_recipient ON friend_requests(recipient_id, status)",
    "CREATE INDEX IF NOT EXISTS idx_friend_requests_sender ON friend_requests(sender_id, status)",
    r#"
CREATE TABLE IF NOT EXISTS friendships (
  pair_key TEXT PRIMARY KEY,
  user_a TEXT NOT NULL REFERENCES users(id),
  user_b TEXT NOT NULL REFERENCES users(id),
  created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
)
"#,
    "CREATE INDEX IF NOT EXISTS idx_friendships_user_a ON friendships(user_a)",
    "CREATE INDEX IF NOT EXISTS idx_friendships_user_b ON friendships(user_b)",
];

/// Creates the schema if missing. Safe to run on every startup.
pub async fn ensure_schema(pool: &SqlitePool) -> sqlx::Result<()> {
    for statement in SCHEMA_STATEMENTS {
        sqlx::query(statement).execute(pool).await?;
    }
    Ok(())
}
