pub mod auth_service;
pub mod chat_service;
pub mod error;
pub mod friend_service;
pub mod recommendation_service;
