//! JSON API over axum with cookie sessions.

pub mod auth;
pub mod handlers;
pub mod session_store;

use std::sync::Arc;
use std::time::Instant;

use axum::Router;
use axum::extract::Request;
use axum::middleware::{Next, from_fn};
use axum::response::Response;
use axum::routing::{get, post};
use paddy::sources::{EarthSource, SolarSource, WeatherSource};
use tower_sessions::cookie::time::Duration;
use tower_sessions::{Expiry, SessionManagerLayer};

use crate::services::Farm;

pub use auth::CurrentUser;
pub use session_store::DbSessionStore;

/// Idle time after which a login session expires.
pub const SESSION_IDLE_HOURS: i64 = 12;

pub fn router<W, S, E>(farm: Arc<Farm<W, S, E>>) -> Router
where
    W: WeatherSource + 'static,
    S: SolarSource + 'static,
    E: EarthSource + 'static,
{
    // local dev serves plain http, so the cookie must not be Secure-only
    let sessions = SessionManagerLayer::new(DbSessionStore::new(farm.db.clone()))
        .with_secure(false)
        .with_expiry(Expiry::OnInactivity(Duration::hours(SESSION_IDLE_HOURS)));

    Router::new()
        .route("/health", get(handlers::health::<W, S, E>))
        .route("/register", post(handlers::register::<W, S, E>))
        .route("/login", post(handlers::login::<W, S, E>))
        .route("/logout", post(handlers::logout))
        .route("/settings", get(handlers::settings::<W, S, E>))
        .route("/templates", get(handlers::list_templates::<W, S, E>))
        .route(
            "/sessions",
            get(handlers::list_sessions::<W, S, E>).post(handlers::create_session::<W, S, E>),
        )
        .route(
            "/sessions/{id}",
            get(handlers::session_dashboard::<W, S, E>)
                .put(handlers::update_session::<W, S, E>)
                .delete(handlers::delete_session::<W, S, E>),
        )
        .route("/steps/{id}", post(handlers::update_step::<W, S, E>))
        .layer(sessions)
        .layer(from_fn(trace_request))
        .with_state(farm)
}

async fn trace_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let started = Instant::now();
    let response = next.run(request).await;
    tracing::info!(
        %method,
        path = %path,
        status = response.status().as_u16(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "request"
    );
    response
}
