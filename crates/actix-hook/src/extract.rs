//! Handler-side extractor for the resolved visitor session.

use std::future::{ready, Ready};

use actix_web::dev::Payload;
use actix_web::{error, Error, FromRequest, HttpMessage, HttpRequest};

use siteline_tracker::ResolvedSession;

/// Extractor wrapping the [`ResolvedSession`] stored on the request by the
/// tracking middleware. Rejects with a 500 when the middleware is missing.
#[derive(Debug, Clone)]
pub struct TrackedVisitor(pub ResolvedSession);

impl FromRequest for TrackedVisitor {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let session = req.extensions().get::<ResolvedSession>().cloned();
        ready(session.map(TrackedVisitor).ok_or_else(|| {
            error::ErrorInternalServerError("visitor tracking middleware not installed")
        }))
    }
}
