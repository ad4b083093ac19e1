//! Liveness probe for orchestration and load balancers.

use actix_web::{HttpResponse, get};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Health probe payload.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StatusResponse {
    /// Always `"ok"` while the process serves traffic.
    pub status: String,
}

/// Liveness probe. Returns 200 while the process can serve traffic.
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Server is alive", body = StatusResponse)),
    tags = ["health"],
    operation_id = "health"
)]
#[get("/health")]
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(StatusResponse {
        status: "ok".to_owned(),
    })
}
