//! Actix-Web middleware — resolves visitor/session identity from cookies,
//! tracks a page view for every request, and refreshes the identity
//! cookies on the response.

use std::future::{ready, Ready};
use std::rc::Rc;

use actix_web::cookie::time::Duration;
use actix_web::cookie::Cookie;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header;
use actix_web::{Error, HttpMessage};
use futures_util::future::LocalBoxFuture;
use tracing::{debug, warn};

use siteline_tracker::hooks::{
    RequestMeta, SESSION_COOKIE_MAX_AGE_SECS, VISITOR_COOKIE_MAX_AGE_SECS,
};
use siteline_tracker::{HookState, PageView};

/// Middleware factory. Wrap the `App` with this for site-wide tracking.
pub struct VisitorTracking {
    state: HookState,
}

impl VisitorTracking {
    pub fn new(state: HookState) -> Self {
        Self { state }
    }
}

impl<S, B> Transform<S, ServiceRequest> for VisitorTracking
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = VisitorTrackingMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(VisitorTrackingMiddleware {
            service: Rc::new(service),
            state: self.state.clone(),
        }))
    }
}

pub struct VisitorTrackingMiddleware<S> {
    service: Rc<S>,
    state: HookState,
}

impl<S, B> Service<ServiceRequest> for VisitorTrackingMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let state = self.state.clone();
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            let meta = request_meta(&req);
            let visitor_cookie = req
                .cookie(&state.visitor_cookie_name())
                .map(|c| c.value().to_string());
            let session_cookie = req
                .cookie(&state.session_cookie_name())
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

            // Every request counts as a page view under this middleware.
            state
                .tracker()
                .track_page_view(PageView {
                    visitor_id: session.visitor_id.clone(),
                    session_id: session.session_id.clone(),
                    url: meta.full_url.clone(),
                    referrer: meta.referrer.clone(),
                    ..Default::default()
                })
                .await;

            req.extensions_mut().insert(session.clone());

            let mut res = service.call(req).await?;

            set_identity_cookie(
                &mut res,
                state.visitor_cookie_name(),
                &session.visitor_id,
                VISITOR_COOKIE_MAX_AGE_SECS,
            );
            set_identity_cookie(
                &mut res,
                state.session_cookie_name(),
                &session.session_id,
                SESSION_COOKIE_MAX_AGE_SECS,
            );

            Ok(res)
        })
    }
}

fn set_identity_cookie<B>(
    res: &mut ServiceResponse<B>,
    name: String,
    value: &str,
    max_age_secs: i64,
) {
    let cookie = Cookie::build(name, value.to_string())
        .path("/")
        .max_age(Duration::seconds(max_age_secs))
        .finish();
    // A cookie that fails to encode must not fail the response.
    if let Err(err) = res.response_mut().add_cookie(&cookie) {
        warn!(error = %err, "failed to set tracking cookie");
    }
}

fn request_meta(req: &ServiceRequest) -> RequestMeta {
    let headers = req.headers();
    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let referrer = headers
        .get(header::REFERER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let connection = req.connection_info().clone();
    let remote_ip = connection
        .realip_remote_addr()
        .map(str::to_string)
        .unwrap_or_default();
    let full_url = format!("{}://{}{}", connection.scheme(), connection.host(), req.uri());

    RequestMeta {
        user_agent,
        remote_ip,
        referrer,
        full_url,
        query: Some(req.query_string().to_string()).filter(|q| !q.is_empty()),
    }
}
