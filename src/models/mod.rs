pub mod friend_requests;
pub mod friendships;
pub mod users;

pub use friend_requests::{FriendRequestRow, RequestStatus, RequestWithProfileRow};
pub use friendships::{pair_key, FriendshipRow};
pub use users::{UserProfileRow, UserPublic, UserRow};
