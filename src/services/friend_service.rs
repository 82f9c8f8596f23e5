use serde::Serialize;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::database::{friend_request_repo, friendship_repo, user_repo};
use crate::models::{FriendRequestRow, RequestStatus, RequestWithProfileRow, UserProfileRow};
use crate::services::error::{is_unique_violation, ServiceError};

/// Ledger row annotated with the profile of the other party. Incoming
/// listings carry the sender, outgoing and accepted ones the recipient.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestView {
    pub id: String,
    pub sender_id: String,
    pub recipient_id: String,
    pub status: RequestStatus,
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender: Option<UserProfileRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipient: Option<UserProfileRow>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FriendRequestsView {
    pub incoming_reqs: Vec<RequestView>,
    pub accepted_requests: Vec<RequestView>,
}

fn profile_of(row: &RequestWithProfileRow) -> UserProfileRow {
    UserProfileRow {
        id: row.profile_id.clone(),
        full_name: row.profile_full_name.clone(),
        avatar_url: row.profile_avatar_url.clone(),
        native_language: row.profile_native_language.clone(),
        learning_language: row.profile_learning_language.clone(),
    }
}

fn with_sender(row: RequestWithProfileRow) -> RequestView {
    let sender = Some(profile_of(&row));
    RequestView {
        id: row.id,
        sender_id: row.sender_id,
        recipient_id: row.recipient_id,
        status: row.status,
        created_at: row.created_at,
        sender,
        recipient: None,
    }
}

fn with_recipient(row: RequestWithProfileRow) -> RequestView {
    let recipient = Some(profile_of(&row));
    RequestView {
        id: row.id,
        sender_id: row.sender_id,
        recipient_id: row.recipient_id,
        status: row.status,
        created_at: row.created_at,
        sender: None,
        recipient,
    }
}

/// Creates a PENDING request from `actor_id` to `recipient_id`.
///
/// Rejected when the two ids are equal, the recipient does not exist, the
/// pair is already friends, or any request row already exists between the
/// pair in either direction. The `pair_key` UNIQUE constraint backs the
/// duplicate check, so a lost race between two concurrent sends surfaces as
/// the same Conflict instead of a second row.
pub async fn send_friend_request(
    pool: &SqlitePool,
    actor_id: &str,
    recipient_id: &str,
) -> Result<FriendRequestRow, ServiceError> {
    if actor_id == recipient_id {
        return Err(ServiceError::validation(
            "You can't send a friend request to yourself",
        ));
    }

    if user_repo::find_by_id(pool, recipient_id).await?.is_none() {
        return Err(ServiceError::not_found("Recipient not found"));
    }

    if friendship_repo::are_friends(pool, actor_id, recipient_id).await? {
        return Err(ServiceError::conflict(
            "You are already friends with this user",
        ));
    }

    if friend_request_repo::exists_for_pair(pool, actor_id, recipient_id).await? {
        return Err(ServiceError::conflict(
            "A friend request already exists between you and this user",
        ));
    }

    let id = Uuid::new_v4().to_string();
    let insert = friend_request_repo::insert_pending(
        pool,
        friend_request_repo::NewFriendRequest {
            id: &id,
            sender_id: actor_id,
            recipient_id,
        },
    )
    .await;

    match insert {
        Ok(()) => {}
        Err(e) if is_unique_violation(&e) => {
            return Err(ServiceError::conflict(
                "A friend request already exists between you and this user",
            ));
        }
        Err(e) => return Err(e.into()),
    }

    friend_request_repo::find_by_id(pool, &id)
        .await?
        .ok_or_else(|| ServiceError::internal("friend request missing after insert"))
}

/// Accepts a request addressed to `actor_id`.
///
/// Only legal from PENDING; re-accepting resolves to Conflict so the
/// friendship is never applied twice. The status flip and the friendship
/// edge are committed in one transaction: no reader ever sees one without
/// the other.
pub async fn accept_friend_request(
    pool: &SqlitePool,
    actor_id: &str,
    request_id: &str,
) -> Result<(), ServiceError> {
    let request = friend_request_repo::find_by_id(pool, request_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("Friend request not found"))?;

    if request.recipient_id != actor_id {
        return Err(ServiceError::forbidden(
            "You are not authorized to accept this request",
        ));
    }

    if request.status != RequestStatus::Pending {
        return Err(ServiceError::conflict(
            "Friend request has already been accepted",
        ));
    }

    let mut tx = pool.begin().await?;

    // The UPDATE is status-guarded, so a concurrent accept that committed
    // between our read and this write touches zero rows.
    let touched = friend_request_repo::mark_accepted(&mut tx, &request.id).await?;
    if touched == 0 {
        tx.rollback().await?;
        return Err(ServiceError::conflict(
            "Friend request has already been accepted",
        ));
    }

    friendship_repo::insert_friendship(&mut tx, &request.sender_id, &request.recipient_id).await?;
    tx.commit().await?;
    Ok(())
}

/// Incoming PENDING requests plus the user's own requests that got
/// accepted. The accepted half is sender-side on purpose: it is how the
/// original requester learns their request went through.
pub async fn get_friend_requests(
    pool: &SqlitePool,
    user_id: &str,
) -> Result<FriendRequestsView, ServiceError> {
    let incoming = friend_request_repo::list_pending_for_recipient(pool, user_id).await?;
    let accepted = friend_request_repo::list_accepted_for_sender(pool, user_id).await?;

    Ok(FriendRequestsView {
        incoming_reqs: incoming.into_iter().map(with_sender).collect(),
        accepted_requests: accepted.into_iter().map(with_recipient).collect(),
    })
}

/// PENDING requests the user has sent, for "request already sent" UI state.
pub async fn get_outgoing_friend_reqs(
    pool: &SqlitePool,
    user_id: &str,
) -> Result<Vec<RequestView>, ServiceError> {
    let outgoing = friend_request_repo::list_pending_for_sender(pool, user_id).await?;
    Ok(outgoing.into_iter().map(with_recipient).collect())
}

/// Public profiles of everyone sharing a friendship edge with the user.
pub async fn get_my_friends(
    pool: &SqlitePool,
    user_id: &str,
) -> Result<Vec<UserProfileRow>, ServiceError> {
    let partner_ids = friendship_repo::partner_ids(pool, user_id).await?;
    Ok(user_repo::list_profiles_by_ids(pool, &partner_ids).await?)
}
