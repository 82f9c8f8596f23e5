pub mod friend_request_repo;
pub mod friendship_repo;
pub mod schema;
pub mod user_repo;
