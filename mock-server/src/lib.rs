use axum::{
    extract::RawQuery,
    http::{header, StatusCode},
    routing::get,
    Form, Router,
};
use tokio::net::TcpListener;
use url::form_urlencoded;

pub const GREETING: &str = "hello";

/// Deterministic echo server: every route answers purely from its input.
pub fn app() -> Router {
    Router::new()
        .route("/", get(hello))
        .route("/hello", get(hello))
        .route("/echo", get(echo_query).post(echo_form))
        .fallback(not_found)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn hello() -> &'static str {
    GREETING
}

async fn echo_query(RawQuery(query): RawQuery) -> String {
    query.unwrap_or_default()
}

async fn echo_form(
    Form(pairs): Form<Vec<(String, String)>>,
) -> ([(header::HeaderName, &'static str); 1], String) {
    let body = form_urlencoded::Serializer::new(String::new())
        .extend_pairs(&pairs)
        .finish();
    (
        [(header::CONTENT_TYPE, "application/x-www-form-urlencoded")],
        body,
    )
}

async fn not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "not found")
}
