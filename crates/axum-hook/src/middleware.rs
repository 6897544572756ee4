//! Request/response middleware — cookie-based visitor resolution and
//! opt-in page-view tracking.

use std::net::SocketAddr;

use axum::extract::{ConnectInfo, Request, State};
use axum::http::header::{HOST, REFERER, USER_AGENT};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use time::Duration;
use tracing::debug;

use siteline_tracker::hooks::{
    RequestMeta, ResolvedSession, SESSION_COOKIE_MAX_AGE_SECS, VISITOR_COOKIE_MAX_AGE_SECS,
};
use siteline_tracker::{HookState, PageView};

/// Resolve visitor/session identity for the request and set the identity
/// cookies on the response. Fires `session.start` before the inner handler
/// runs when the session cookie is absent.
pub async fn resolve_visitor(
    State(state): State<HookState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let meta = request_meta(&request);
    let visitor_cookie = jar
        .get(&state.visitor_cookie_name())
        .map(|c| c.value().to_string());
    let session_cookie = jar
        .get(&state.session_cookie_name())
        .map(|c| c.value().to_string());

    let session = state
        .tracker()
        .resolve_request(visitor_cookie, session_cookie, &meta)
        .await;

    debug!(
        visitor_id = %session.visitor_id,
        session_id = %session.session_id,
        is_new_session = session.is_new_session,
        "visitor resolved"
    );

    request.extensions_mut().insert(session.clone());
    let response = next.run(request).await;

    let jar = jar
        .add(identity_cookie(
            state.visitor_cookie_name(),
            session.visitor_id,
            VISITOR_COOKIE_MAX_AGE_SECS,
        ))
        .add(identity_cookie(
            state.session_cookie_name(),
            session.session_id,
            SESSION_COOKIE_MAX_AGE_SECS,
        ));

    (jar, response).into_response()
}

/// Track a page view for the route this layer wraps. Apply with
/// `route_layer` so instrumentation stays an explicit per-route decision.
pub async fn track_page_view(
    State(state): State<HookState>,
    request: Request,
    next: Next,
) -> Response {
    if let Some(session) = request.extensions().get::<ResolvedSession>().cloned() {
        let meta = request_meta(&request);
        state
            .tracker()
            .track_page_view(PageView {
                visitor_id: session.visitor_id,
                session_id: session.session_id,
                url: meta.full_url,
                referrer: meta.referrer,
                ..Default::default()
            })
            .await;
    }
    next.run(request).await
}

fn identity_cookie(name: String, value: String, max_age_secs: i64) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .max_age(Duration::seconds(max_age_secs))
        .build()
}

fn request_meta(request: &Request) -> RequestMeta {
    let headers = request.headers();
    let user_agent = headers
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let referrer = headers
        .get(REFERER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    RequestMeta {
        user_agent,
        remote_ip: client_ip(request),
        referrer,
        full_url: full_url(request),
        query: request.uri().query().map(str::to_string),
    }
}

/// Prefer the first `X-Forwarded-For` hop; fall back to the socket address
/// when the server was built with `into_make_service_with_connect_info`.
fn client_ip(request: &Request) -> String {
    if let Some(forwarded) = request
        .headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
    {
        if let Some(first) = forwarded.split(',').next() {
            let first = first.trim();
            if !first.is_empty() {
                return first.to_string();
            }
        }
    }
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0.ip().to_string())
        .unwrap_or_default()
}

/// Reconstruct an absolute URL. The scheme is not visible behind the
/// listener, so origin-form URIs assume `http`.
fn full_url(request: &Request) -> String {
    let uri = request.uri();
    if uri.scheme().is_some() {
        return uri.to_string();
    }
    let host = request
        .headers()
        .get(HOST)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("localhost");
    format!("http://{host}{uri}")
}
