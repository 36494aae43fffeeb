// ABOUTME: The request dispatcher behind `GET /`: token check, tags preference, then action dispatch.
// ABOUTME: Answers with the address listing or reloads the token and extras stores.

use std::net::SocketAddr;

use axum::extract::{ConnectInfo, Query, State};
use axum::http::{Extensions, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use myipd_core::{Action, parse_tag_switch, render_listing};
use tracing::Instrument;

use crate::app_state::SharedState;
use crate::client_addr::client_address;
use crate::resolver::resolve;

pub const OK_BODY: &str = "200 OK";
pub const BAD_REQUEST_BODY: &str = "400 BadRequest";
pub const UNAUTHORIZED_BODY: &str = "401 Unauthorized";
pub const FORBIDDEN_BODY: &str = "403 Forbidden";

/// Query parameters in arrival order. Repeated keys resolve to their first
/// occurrence.
#[derive(Debug, Default)]
struct Params(Vec<(String, String)>);

impl Params {
    fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// GET / - Authenticate the token and run the requested action.
pub async fn handle_request(
    State(state): State<SharedState>,
    Query(params): Query<Vec<(String, String)>>,
    headers: HeaderMap,
    extensions: Extensions,
) -> Response {
    let peer = extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    let client = client_address(&headers, peer);
    let span = tracing::info_span!("request", client = %client);

    dispatch(state, Params(params)).instrument(span).await
}

async fn dispatch(state: SharedState, params: Params) -> Response {
    let token = params.get("token").unwrap_or("");
    if token.is_empty() {
        tracing::warn!("rejected request without token");
        return (StatusCode::UNAUTHORIZED, UNAUTHORIZED_BODY).into_response();
    }
    if !state.tokens.contains(token).await {
        tracing::warn!("rejected request with unknown token");
        return (StatusCode::FORBIDDEN, FORBIDDEN_BODY).into_response();
    }

    let show_tags = tag_switch(params.get("tags")) && !state.config.no_tags;

    let raw_action = params.get("action");
    let Some(action) = Action::parse(raw_action) else {
        tracing::warn!(action = raw_action.unwrap_or(""), "rejected unknown action");
        return (StatusCode::BAD_REQUEST, BAD_REQUEST_BODY).into_response();
    };

    match action {
        Action::GetIp => listing(&state, show_tags).await,
        _ => reload(&state, action).await,
    }
}

/// Resolve the `tags` parameter. Absent or unrecognized values keep tags on.
fn tag_switch(value: Option<&str>) -> bool {
    let Some(value) = value else {
        return true;
    };
    parse_tag_switch(value).unwrap_or_else(|| {
        tracing::debug!(tags = value, "ignoring unrecognized tags value");
        true
    })
}

async fn listing(state: &SharedState, show_tags: bool) -> Response {
    let config = &state.config;
    let (ipv4, ipv6) = resolve(&*state.lookup, config.enable_ipv4, config.enable_ipv6).await;
    let extras = state.extras.snapshot().await;

    let body = render_listing(&ipv4, &ipv6, &extras, show_tags);
    tracing::info!(?ipv4, ?ipv6, extras = extras.len(), "served address listing");
    (StatusCode::OK, body).into_response()
}

/// Reload the stores the action names. The reply is 200 whether or not the
/// files could be read; failures only show up in the log.
async fn reload(state: &SharedState, action: Action) -> Response {
    if action.reloads_tokens() {
        match state.tokens.reload().await {
            Ok(count) => tracing::info!(action = action.as_str(), "reloaded {} token(s)", count),
            Err(e) => tracing::error!(action = action.as_str(), "token reload failed: {}", e),
        }
    }

    if action.reloads_extras() {
        match state.extras.reload().await {
            Ok(count) if state.extras.is_enabled() => {
                tracing::info!(action = action.as_str(), "reloaded {} extra address(es)", count)
            }
            Ok(_) => tracing::info!(action = action.as_str(), "extras are not configured"),
            Err(e) => tracing::error!(action = action.as_str(), "extras reload failed: {}", e),
        }
    }

    (StatusCode::OK, OK_BODY).into_response()
}
