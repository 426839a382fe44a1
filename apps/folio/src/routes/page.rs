use axum::{
    extract::State,
    http::{header, HeaderMap},
    response::{Html, IntoResponse, Redirect},
};
use tracing::info;

use crate::dom::serialize;
use crate::errors::AppError;
use crate::presentation::{print_view, theme::PREFERS_COLOR_SCHEME_HEADER, Theme};
use crate::state::AppState;

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

fn request_theme(state: &AppState, headers: &HeaderMap) -> Theme {
    state.themes.resolve(
        header_str(headers, header::COOKIE.as_str()),
        header_str(headers, PREFERS_COLOR_SCHEME_HEADER),
    )
}

/// GET / and GET /index.html
/// Renders the resume into the page. Without data the static markup is served.
pub async fn handle_index(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    let theme = request_theme(&state, &headers);
    let page = state.load_page(theme).await;
    (state.themes.hint_headers(), Html(serialize(&page)))
}

/// GET /print
/// Printable view: the rendered resume content only, without interactive chrome.
pub async fn handle_print(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    let theme = request_theme(&state, &headers);
    let page = state.load_page(theme).await;
    let view = print_view(&page)
        .ok_or_else(|| AppError::NotFound("Page has no printable resume content".to_string()))?;
    Ok((state.themes.hint_headers(), Html(serialize(&view))))
}

/// POST /theme/toggle
/// Flips the saved theme preference and sends the browser back to the page.
pub async fn handle_theme_toggle(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let next = state.themes.toggle(request_theme(&state, &headers));
    info!("Theme preference switched to {next}");
    (
        [(header::SET_COOKIE, state.themes.preference_cookie(next))],
        Redirect::to("/"),
    )
}
