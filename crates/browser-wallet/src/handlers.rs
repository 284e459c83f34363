use axum::{
    Json,
    extract::State,
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{Html, IntoResponse},
};

use crate::{
    app::render_index,
    router::ServerState,
    types::{
        BrowserApiResponse, ProviderStatus, SubscriptionMessage, ViewResponse, WalletRequest,
        WalletResponse, WaveForm,
    },
};

const NO_APP: &str = "Portal page is not enabled";

pub(crate) async fn serve_index(
    State(state): State<ServerState>,
) -> Result<impl IntoResponse, StatusCode> {
    let token = state.wallet.session_token();
    let page = render_index(&token, state.app.as_deref()).map_err(|err| {
        error!(target: "browser_wallet", %err, "failed to render page");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("text/html; charset=utf-8"));
    Ok((headers, Html(page)))
}

/// The page reports whether `window.ethereum` exists. Every report of an available wallet
/// (re)mounts the portal, since a reloaded page has lost its subscriptions.
pub(crate) async fn post_provider_status(
    State(state): State<ServerState>,
    Json(status): Json<ProviderStatus>,
) -> Json<BrowserApiResponse> {
    let previous = state.wallet.set_provider_status(status);
    debug!(target: "browser_wallet", ?status, ?previous, "provider status");

    if let Some(app) = state.app.clone() {
        if status.available {
            tokio::spawn(async move { app.mount().await });
        } else if previous.is_some_and(|previous| previous.available) {
            tokio::spawn(async move { app.unmount().await });
        }
    }

    Json(BrowserApiResponse::ok())
}

pub(crate) async fn get_next_request(
    State(state): State<ServerState>,
) -> Json<BrowserApiResponse<WalletRequest>> {
    match state.wallet.read_next_request() {
        Some(request) => Json(BrowserApiResponse::Ok(request)),
        None => Json(BrowserApiResponse::error("No pending request")),
    }
}

pub(crate) async fn post_response(
    State(state): State<ServerState>,
    Json(response): Json<WalletResponse>,
) -> Json<BrowserApiResponse> {
    let id = response.id;
    if !state.wallet.add_response(response) {
        warn!(target: "browser_wallet", %id, "response for unknown request");
        return Json(BrowserApiResponse::error("Unknown request id"));
    }
    Json(BrowserApiResponse::ok())
}

pub(crate) async fn post_subscription(
    State(state): State<ServerState>,
    Json(message): Json<SubscriptionMessage>,
) -> Json<BrowserApiResponse> {
    if !state.wallet.dispatch(message) {
        return Json(BrowserApiResponse::error("Unknown subscription"));
    }
    Json(BrowserApiResponse::ok())
}

pub(crate) async fn get_view(
    State(state): State<ServerState>,
) -> Json<BrowserApiResponse<ViewResponse>> {
    render_view(&state)
}

pub(crate) async fn post_connect(
    State(state): State<ServerState>,
) -> Json<BrowserApiResponse<ViewResponse>> {
    if let Some(app) = &state.app {
        app.session().connect().await;
    }
    render_view(&state)
}

pub(crate) async fn post_wave(
    State(state): State<ServerState>,
    Json(form): Json<WaveForm>,
) -> Json<BrowserApiResponse<ViewResponse>> {
    if let Some(app) = &state.app {
        app.session().set_draft(form.message);
        app.session().submit_draft().await;
    }
    render_view(&state)
}

/// Current view of the app, as an API response.
fn render_view(state: &ServerState) -> Json<BrowserApiResponse<ViewResponse>> {
    let Some(app) = &state.app else {
        return Json(BrowserApiResponse::error(NO_APP));
    };
    match app.view() {
        Ok(view) => Json(BrowserApiResponse::Ok(view)),
        Err(err) => {
            error!(target: "browser_wallet", %err, "failed to render view");
            Json(BrowserApiResponse::error(err.to_string()))
        }
    }
}
