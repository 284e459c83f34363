use std::sync::Arc;

use axum::{
    Router,
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
};

use crate::{app::PortalApp, handlers, state::BrowserWalletState};

/// Shared by all handlers.
#[derive(Clone, Debug)]
pub(crate) struct ServerState {
    pub(crate) wallet: Arc<BrowserWalletState>,
    pub(crate) app: Option<Arc<PortalApp>>,
}

pub(crate) fn build_router(state: ServerState) -> Router {
    let api = Router::new()
        .route("/wallet/provider", post(handlers::post_provider_status))
        .route("/wallet/request", get(handlers::get_next_request))
        .route("/wallet/response", post(handlers::post_response))
        .route("/wallet/subscription", post(handlers::post_subscription))
        .route("/view", get(handlers::get_view))
        .route("/ui/connect", post(handlers::post_connect))
        .route("/ui/wave", post(handlers::post_wave))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_session_token))
        .with_state(state.clone());

    Router::new().route("/", get(handlers::serve_index)).nest("/api", api).with_state(state)
}

async fn require_session_token(
    State(state): State<ServerState>,
    req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let expected = state.wallet.session_token();
    let ok = req
        .headers()
        .get("X-Session-Token")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == expected.as_str());

    if !ok {
        return Err(StatusCode::FORBIDDEN);
    }

    Ok(next.run(req).await)
}
