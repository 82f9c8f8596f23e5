use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Extension, Json,
};
use cookie::Cookie;
use serde_json::json;
use sqlx::SqlitePool;

use crate::models::UserPublic;
use crate::services::auth_service;
use crate::web::error::ApiResult;
use crate::web::middleware::auth::CurrentUser;

const TOKEN_COOKIE: &str = "token";

fn session_cookie(token: String) -> Cookie<'static> {
    let mut cookie = Cookie::new(TOKEN_COOKIE, token);
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_same_site(cookie::SameSite::Strict);
    cookie.set_max_age(cookie::time::Duration::seconds(
        auth_service::TOKEN_TTL_SECONDS as i64,
    ));
    if std::env::var("APP_ENV").as_deref() == Ok("production") {
        cookie.set_secure(true);
    }
    cookie
}

fn expired_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::new(TOKEN_COOKIE, "");
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_same_site(cookie::SameSite::Strict);
    cookie.set_max_age(cookie::time::Duration::ZERO);
    cookie
}

fn with_session(mut response: Response, cookie: Cookie<'static>) -> Response {
    if let Ok(value) = cookie.to_string().parse() {
        response.headers_mut().append(header::SET_COOKIE, value);
    }
    response
}

pub async fn signup_handler(
    State(pool): State<SqlitePool>,
    Json(input): Json<auth_service::SignupInput>,
) -> ApiResult<Response> {
    let user = auth_service::signup(&pool, input).await?;
    let token = auth_service::generate_token(&user.id)?;

    let body = json!({
        "message": "User created successfully",
        "user": UserPublic::from(user),
    });
    let response = (StatusCode::CREATED, Json(body)).into_response();
    Ok(with_session(response, session_cookie(token)))
}

pub async fn login_handler(
    State(pool): State<SqlitePool>,
    Json(input): Json<auth_service::LoginInput>,
) -> ApiResult<Response> {
    let user = auth_service::login(&pool, input).await?;
    let token = auth_service::generate_token(&user.id)?;

    let body = json!({
        "message": "User login successfully",
        "user": UserPublic::from(user),
    });
    let response = (StatusCode::OK, Json(body)).into_response();
    Ok(with_session(response, session_cookie(token)))
}

pub async fn logout_handler() -> Response {
    let response = Json(json!({ "message": "Logged out successfully" })).into_response();
    with_session(response, expired_cookie())
}

pub async fn onboarding_handler(
    Extension(current): Extension<CurrentUser>,
    State(pool): State<SqlitePool>,
    Json(input): Json<auth_service::OnboardingInput>,
) -> ApiResult<Json<serde_json::Value>> {
    let user = auth_service::onboard(&pool, &current.user.id, input).await?;
    Ok(Json(json!({
        "success": true,
        "user": UserPublic::from(user),
    })))
}

pub async fn me_handler(Extension(current): Extension<CurrentUser>) -> Json<serde_json::Value> {
    Json(json!({
        "success": true,
        "user": UserPublic::from(current.user),
    }))
}
