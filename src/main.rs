use dotenvy::dotenv;
use sqlx::sqlite::SqlitePoolOptions;
use std::env;
use std::net::SocketAddr;
use tracing::info;

use lingopal::database::schema;
use lingopal::web;

#[tokio::main]
async fn main() {
    dotenv().ok();

    tracing_subscriber::fmt::init();

    let db_url =
        env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://lingopal.db?mode=rwc".to_string());
    let pool = SqlitePoolOptions::new()
        .connect(&db_url)
        .await
        .expect("could not connect to database");

    schema::ensure_schema(&pool)
        .await
        .expect("could not initialize database schema");

    let app = web::app(pool);

    let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(5000);
    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .expect("invalid HOST/PORT");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("could not bind listener");
    info!(
        "server running on http://{}",
        listener.local_addr().expect("listener addr")
    );

    axum::serve(listener, app).await.expect("server error");
}
