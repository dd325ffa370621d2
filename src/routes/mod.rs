use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tower_http::LatencyUnit;
use tracing::Level;

use crate::config::{create_cors_layer, with_security_headers, Config};
use crate::handlers::events::{create_event, delete_event, get_event, list_events, update_event};
use crate::handlers::health_check;
use crate::handlers::speakers::{add_speaker, list_speakers};
use crate::state::AppState;

fn build_event_routers() -> Router<AppState> {
    let event_routers = Router::new()
        .route("/", get(list_events).post(create_event))
        .route(
            "/:id",
            get(get_event).put(update_event).delete(delete_event),
        )
        .route("/:id/speakers", post(add_speaker));

    Router::new().nest("/api/dev-events", event_routers)
}

pub fn create_routes(state: AppState, config: &Config) -> Router {
    let router = Router::new()
        .route("/health", get(health_check))
        .merge(build_event_routers())
        .route("/speakers", get(list_speakers))
        .with_state(state);

    with_security_headers(router, config.production)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .latency_unit(LatencyUnit::Millis),
                ),
        )
        .layer(create_cors_layer(&config.cors_allowed_origins))
}
