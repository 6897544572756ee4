//! Actix-Web integration for the Siteline tracking SDK.
//!
//! Wrapping an `App` in [`VisitorTracking`] resolves visitor and session
//! identity from cookies, fires `session.start` for new sessions, tracks a
//! page view for every request (site-wide instrumentation, unlike the
//! opt-in axum layer), and refreshes the identity cookies on each
//! response. Handlers receive the resolved identifiers through the
//! [`TrackedVisitor`] extractor and can attach identity traits via
//! [`HookState::identify`](siteline_tracker::HookState::identify).
//!
//! ```no_run
//! use actix_web::{web, App, HttpResponse, HttpServer};
//! use siteline_actix::VisitorTracking;
//! use siteline_tracker::{HookState, Tracker, TrackerConfig};
//!
//! #[actix_web::main]
//! async fn main() -> std::io::Result<()> {
//!     let tracker = Tracker::new(TrackerConfig::new("your-api-key")).expect("api key");
//!     let state = HookState::new(tracker);
//!
//!     HttpServer::new(move || {
//!         App::new()
//!             .wrap(VisitorTracking::new(state.clone()))
//!             .route("/", web::get().to(HttpResponse::Ok))
//!     })
//!     .bind(("127.0.0.1", 8080))?
//!     .run()
//!     .await
//! }
//! ```

pub mod extract;
pub mod middleware;

pub use extract::TrackedVisitor;
pub use middleware::VisitorTracking;
