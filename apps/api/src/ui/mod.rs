//! The single-page front end. All rendering happens in the browser; the page
//! keeps the extracted text, diagnosis and generated markdown in memory and
//! talks to the JSON endpoints.

use axum::response::Html;

const INDEX_HTML: &str = include_str!("index.html");

/// GET /
pub async fn handle_index() -> Html<&'static str> {
    Html(INDEX_HTML)
}
