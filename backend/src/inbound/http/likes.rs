//! Like engine HTTP handlers.
//!
//! ```text
//! PUT    /api/quotes/{id}/like
//! GET    /api/quotes/{id}/is-liked
//! DELETE /api/quotes/likes/reset
//! ```

use actix_web::{HttpRequest, HttpResponse, delete, get, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::inbound::http::client_identity;
use crate::inbound::http::error::{ApiResult, ErrorBody};
use crate::inbound::http::quotes::{QuoteResponse, parse_quote_id};
use crate::inbound::http::state::HttpState;

/// Response payload for the engagement-status probe.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct IsLikedResponse {
    /// Whether the calling client already liked the quote.
    pub is_liked: bool,
}

/// Confirmation payload for the bulk reset.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    /// Human-readable confirmation.
    pub message: String,
}

/// Register one like from the calling client.
///
/// Exactly one of any number of concurrent identical requests succeeds;
/// the rest receive the duplicate error.
#[utoipa::path(
    put,
    path = "/api/quotes/{id}/like",
    params(("id" = String, Path, description = "Quote identifier")),
    responses(
        (status = 200, description = "Quote with the incremented counter", body = QuoteResponse),
        (status = 400, description = "Client already liked this quote", body = ErrorBody),
        (status = 404, description = "Unknown quote", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tags = ["likes"],
    operation_id = "likeQuote"
)]
#[put("/quotes/{id}/like")]
pub async fn like(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    req: HttpRequest,
) -> ApiResult<HttpResponse> {
    let id = parse_quote_id(&path.into_inner())?;
    let client = client_identity::extract(&req);
    let liked = state.likes.like(id, &client).await?;
    Ok(HttpResponse::Ok().json(QuoteResponse::from(liked)))
}

/// Probe whether the calling client already liked a quote.
#[utoipa::path(
    get,
    path = "/api/quotes/{id}/is-liked",
    params(("id" = String, Path, description = "Quote identifier")),
    responses(
        (status = 200, description = "Engagement status", body = IsLikedResponse),
        (status = 404, description = "Unknown quote", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tags = ["likes"],
    operation_id = "isQuoteLiked"
)]
#[get("/quotes/{id}/is-liked")]
pub async fn is_liked(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    req: HttpRequest,
) -> ApiResult<HttpResponse> {
    let id = parse_quote_id(&path.into_inner())?;
    let ip = client_identity::extract_ip(&req);
    let is_liked = state.likes.is_liked(id, &ip).await?;
    Ok(HttpResponse::Ok().json(IsLikedResponse { is_liked }))
}

/// Zero every counter and clear the ledger.
#[utoipa::path(
    delete,
    path = "/api/quotes/likes/reset",
    responses(
        (status = 200, description = "All likes reset", body = MessageResponse),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tags = ["likes"],
    operation_id = "resetLikes"
)]
#[delete("/quotes/likes/reset")]
pub async fn reset(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    state.likes.reset_all().await?;
    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "all likes have been reset".to_owned(),
    }))
}
