pub mod error;
pub mod middleware;
pub mod routes;

use axum::{
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use http::header::CONTENT_TYPE;
use http::{HeaderValue, Method};
use sqlx::SqlitePool;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::web::middleware::auth as auth_middleware;
use crate::web::routes::{auth, chat, users};

fn cors_layer() -> CorsLayer {
    let origin =
        std::env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:5173".to_string());
    let mut layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT])
        .allow_headers([CONTENT_TYPE])
        .allow_credentials(true);
    if let Ok(origin) = origin.parse::<HeaderValue>() {
        layer = layer.allow_origin(origin);
    }
    layer
}

/// Full application router. Separate from `main` so the integration tests
/// can serve the same app on an ephemeral port.
pub fn app(pool: SqlitePool) -> Router {
    let protected = Router::new()
        .route("/api/auth/onboarding", post(auth::onboarding_handler))
        .route("/api/auth/me", get(auth::me_handler))
        .route("/api/users", get(users::recommended_users_handler))
        .route("/api/users/friends", get(users::my_friends_handler))
        .route(
            "/api/users/friend-request/:id",
            post(users::send_friend_request_handler),
        )
        .route(
            "/api/users/friend-request/:id/accept",
            put(users::accept_friend_request_handler),
        )
        .route(
            "/api/users/friend-requests",
            get(users::friend_requests_handler),
        )
        .route(
            "/api/users/outgoing-friend-requests",
            get(users::outgoing_friend_requests_handler),
        )
        .route("/api/chat/token", get(chat::chat_token_handler))
        .layer(axum_middleware::from_fn_with_state(
            pool.clone(),
            auth_middleware::require_auth,
        ));

    Router::new()
        .route("/", get(|| async { "Welcome to the server!" }))
        .route("/api/auth/signup", post(auth::signup_handler))
        .route("/api/auth/login", post(auth::login_handler))
        .route("/api/auth/logout", post(auth::logout_handler))
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
        .layer(CatchPanicLayer::new())
        .with_state(pool)
}
