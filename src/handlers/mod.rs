use axum::response::Response;
use serde::Serialize;

use crate::utils::response::success;

pub mod events;
pub mod speakers;

#[derive(Serialize)]
struct HealthPayload {
    status: &'static str,
    service: &'static str,
}

pub async fn health_check() -> Response {
    let payload = HealthPayload {
        status: "ok",
        service: "dev-events-api",
    };

    success(payload, "Health check successful")
}
