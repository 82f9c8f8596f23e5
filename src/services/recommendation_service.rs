use std::collections::HashSet;

use sqlx::SqlitePool;

use crate::database::{friend_request_repo, friendship_repo, user_repo};
use crate::models::UserRow;
use crate::services::error::ServiceError;

/// Onboarded users the given user could still connect with.
///
/// The exclusion set is the user themself, every friendship partner, and
/// the counterparty of every request the user appears in, in either
/// direction and whatever its status. Someone you already have history
/// with is never recommended again.
pub async fn get_recommended_users(
    pool: &SqlitePool,
    user_id: &str,
) -> Result<Vec<UserRow>, ServiceError> {
    let mut exclude: HashSet<String> = HashSet::new();
    exclude.insert(user_id.to_string());
    exclude.extend(friendship_repo::partner_ids(pool, user_id).await?);
    exclude.extend(friend_request_repo::counterparty_ids(pool, user_id).await?);

    let exclude: Vec<String> = exclude.into_iter().collect();
    Ok(user_repo::list_onboarded_excluding(pool, &exclude).await?)
}
