//! OpenAPI document assembled from the HTTP handler annotations.

use utoipa::OpenApi;

use crate::inbound::http::error::ErrorBody;
use crate::inbound::http::health::StatusResponse;
use crate::inbound::http::likes::{IsLikedResponse, MessageResponse};
use crate::inbound::http::quotes::{
    CreateQuoteRequest, PaginatedQuotesResponse, QuoteResponse, UpdateQuoteRequest,
};

/// Top-level OpenAPI description of the service.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Quote Service API",
        description = "Quotes with per-client deduplicated likes."
    ),
    paths(
        crate::inbound::http::quotes::list,
        crate::inbound::http::quotes::create,
        crate::inbound::http::quotes::random,
        crate::inbound::http::quotes::top_weekly,
        crate::inbound::http::quotes::top_all_time,
        crate::inbound::http::quotes::get_by_id,
        crate::inbound::http::quotes::update,
        crate::inbound::http::quotes::delete_quote,
        crate::inbound::http::likes::like,
        crate::inbound::http::likes::is_liked,
        crate::inbound::http::likes::reset,
        crate::inbound::http::health::health,
    ),
    components(schemas(
        QuoteResponse,
        PaginatedQuotesResponse,
        CreateQuoteRequest,
        UpdateQuoteRequest,
        IsLikedResponse,
        MessageResponse,
        StatusResponse,
        ErrorBody,
    )),
    tags(
        (name = "quotes", description = "Quote CRUD and query endpoints"),
        (name = "likes", description = "Deduplicated like engine"),
        (name = "health", description = "Liveness probe"),
    )
)]
pub struct ApiDoc;
