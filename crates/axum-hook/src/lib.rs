//! Axum integration for the Siteline tracking SDK.
//!
//! [`resolve_visitor`] runs for every request: it reads the identity
//! cookies, derives a visitor id from the request fingerprint when none is
//! present, fires `session.start` for new sessions, and refreshes the
//! cookies on the response. Page views are opt-in per route — apply
//! [`track_page_view`] with `route_layer` to the routes worth counting.
//!
//! Handlers reach the resolved identifiers through the
//! [`ResolvedSession`](siteline_tracker::ResolvedSession) request extension
//! and can attach identity traits via
//! [`HookState::identify`](siteline_tracker::HookState::identify).
//!
//! ```no_run
//! use axum::middleware::from_fn_with_state;
//! use axum::routing::get;
//! use axum::Router;
//! use siteline_tracker::{HookState, Tracker, TrackerConfig};
//!
//! let tracker = Tracker::new(TrackerConfig::new("your-api-key")).expect("api key");
//! let state = HookState::new(tracker);
//!
//! let app: Router = Router::new()
//!     .route("/products", get(|| async { "products" }))
//!     .route_layer(from_fn_with_state(state.clone(), siteline_axum::track_page_view))
//!     .layer(from_fn_with_state(state, siteline_axum::resolve_visitor));
//! ```

pub mod middleware;

pub use middleware::{resolve_visitor, track_page_view};
