use serde::{Deserialize, Serialize};

/// Lifecycle of a friend request: PENDING -> ACCEPTED, one direction, no
/// rejection or cancellation states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum RequestStatus {
    Pending,
    Accepted,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct FriendRequestRow {
    pub id: String,
    pub sender_id: String,
    pub recipient_id: String,
    pub status: RequestStatus,
    pub created_at: String,
}

// Ledger row joined with the profile of the user on the other side of the
// request: the sender for incoming listings, the recipient for outgoing and
// accepted ones.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RequestWithProfileRow {
    pub id: String,
    pub sender_id: String,
    pub recipient_id: String,
    pub status: RequestStatus,
    pub created_at: String,
    pub profile_id: String,
    pub profile_full_name: String,
    pub profile_avatar_url: Option<String>,
    pub profile_native_language: Option<String>,
    pub profile_learning_language: Option<String>,
}
