use serde::Serialize;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRow {
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub password_hash: String,
    pub bio: Option<String>,
    pub native_language: Option<String>,
    pub learning_language: Option<String>,
    pub location: Option<String>,
    pub avatar_url: Option<String>,
    pub is_onboarded: bool,
    pub created_at: String,
}

// The full record minus the password hash. This is the shape handed back
// to the account's own client (signup/login/me/onboarding) and used for
// recommendation cards.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPublic {
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub bio: Option<String>,
    pub native_language: Option<String>,
    pub learning_language: Option<String>,
    pub location: Option<String>,
    #[serde(rename = "profilePic")]
    pub avatar_url: Option<String>,
    pub is_onboarded: bool,
    pub created_at: String,
}

impl From<UserRow> for UserPublic {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            full_name: row.full_name,
            email: row.email,
            bio: row.bio,
            native_language: row.native_language,
            learning_language: row.learning_language,
            location: row.location,
            avatar_url: row.avatar_url,
            is_onboarded: row.is_onboarded,
            created_at: row.created_at,
        }
    }
}

// Public slice of a user shown to other users (friend cards, request
// annotations). Never carries the password hash.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserProfileRow {
    pub id: String,
    pub full_name: String,
    #[serde(rename = "profilePic")]
    pub avatar_url: Option<String>,
    pub native_language: Option<String>,
    pub learning_language: Option<String>,
}
