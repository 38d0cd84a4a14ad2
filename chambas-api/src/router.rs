use axum::{
    http::{header, HeaderValue, Method},
    routing::get,
    Router,
};
use time::Duration;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, TraceLayer},
};
use tower_sessions::{cookie::SameSite, Expiry, SessionManagerLayer};
use tower_sessions_moka_store::MokaStore;

use crate::{app_state::AppState, auth, config::Settings, routes};

pub fn create(app_state: AppState, config: &Settings) -> Router<()> {
    let session_store = MokaStore::new(Some(2_000));
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(!config.application.client_origin.starts_with("http://localhost"))
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(Duration::days(7)));

    let cors = CorsLayer::new()
        .allow_origin(
            config
                .application
                .client_origin
                .parse::<HeaderValue>()
                .expect("Invalid client origin"),
        )
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true);

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .nest("/listings", routes::listings::router())
        .nest("/profile", routes::profile::router())
        .merge(auth::router())
        .layer(session_layer)
        .layer(cors)
        .layer(TraceLayer::new_for_http().make_span_with(DefaultMakeSpan::new()))
        .with_state(app_state)
}
