//! Quote CRUD and query HTTP handlers.
//!
//! ```text
//! GET    /api/quotes
//! POST   /api/quotes
//! GET    /api/quotes/random
//! GET    /api/quotes/top/weekly
//! GET    /api/quotes/top/alltime
//! GET    /api/quotes/{id}
//! PUT    /api/quotes/{id}
//! DELETE /api/quotes/{id}
//! ```

use actix_web::{HttpRequest, HttpResponse, delete, get, post, put, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::domain::{Error, LikedQuote, ListParams, QuotePage};
use crate::inbound::http::client_identity;
use crate::inbound::http::error::{ApiResult, ErrorBody};
use crate::inbound::http::state::HttpState;

/// Quote payload returned by every quote-bearing endpoint.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct QuoteResponse {
    /// Opaque quote identifier.
    pub id: Uuid,
    /// Quote body.
    pub text: String,
    /// Attribution.
    pub author: String,
    /// Deduplicated like counter.
    pub likes_count: i32,
    /// Creation timestamp, RFC 3339.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp, RFC 3339.
    pub updated_at: DateTime<Utc>,
    /// Whether the calling client already liked this quote.
    pub liked: bool,
}

impl From<LikedQuote> for QuoteResponse {
    fn from(value: LikedQuote) -> Self {
        Self {
            id: value.quote.id,
            text: value.quote.text,
            author: value.quote.author,
            likes_count: value.quote.likes_count,
            created_at: value.quote.created_at,
            updated_at: value.quote.updated_at,
            liked: value.liked,
        }
    }
}

/// Paginated list envelope.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PaginatedQuotesResponse {
    /// One page of quotes, newest first.
    pub quotes: Vec<QuoteResponse>,
    /// Total records matching the search.
    pub total: i64,
    /// Normalised page number.
    pub page: i64,
    /// Normalised page size.
    pub page_size: i64,
    /// `ceil(total / page_size)`.
    pub total_pages: i64,
}

impl From<QuotePage> for PaginatedQuotesResponse {
    fn from(value: QuotePage) -> Self {
        Self {
            quotes: value.quotes.into_iter().map(QuoteResponse::from).collect(),
            total: value.total,
            page: value.page,
            page_size: value.page_size,
            total_pages: value.total_pages,
        }
    }
}

/// Request payload for creating a quote.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateQuoteRequest {
    /// Quote body, required and non-blank.
    pub text: String,
    /// Attribution, required and non-blank.
    pub author: String,
}

/// Request payload for updating a quote. Blank or absent fields keep the
/// stored value.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateQuoteRequest {
    /// Replacement body, when present and non-blank.
    pub text: Option<String>,
    /// Replacement attribution, when present and non-blank.
    pub author: Option<String>,
}

/// Pagination and search query parameters.
#[derive(Debug, Deserialize, IntoParams)]
pub struct ListQuery {
    /// One-based page number, floored at 1.
    pub page: Option<i64>,
    /// Rows per page; out-of-range values fall back to 10.
    pub page_size: Option<i64>,
    /// Case-insensitive substring matched against text and author.
    pub search: Option<String>,
}

/// Parse a path identifier, reading unparseable ids as missing quotes.
pub(crate) fn parse_quote_id(raw: &str) -> Result<Uuid, Error> {
    Uuid::parse_str(raw).map_err(|_| Error::not_found("quote not found"))
}

/// List quotes with pagination and optional search.
#[utoipa::path(
    get,
    path = "/api/quotes",
    params(ListQuery),
    responses(
        (status = 200, description = "One page of quotes", body = PaginatedQuotesResponse),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tags = ["quotes"],
    operation_id = "listQuotes"
)]
#[get("/quotes")]
pub async fn list(
    state: web::Data<HttpState>,
    query: web::Query<ListQuery>,
    req: HttpRequest,
) -> ApiResult<HttpResponse> {
    let query = query.into_inner();
    let params = ListParams::new(query.page, query.page_size, query.search);
    let ip = client_identity::extract_ip(&req);
    let page = state.quotes.list(&params, &ip).await?;
    Ok(HttpResponse::Ok().json(PaginatedQuotesResponse::from(page)))
}

/// Create a quote.
#[utoipa::path(
    post,
    path = "/api/quotes",
    request_body = CreateQuoteRequest,
    responses(
        (status = 201, description = "Created quote", body = QuoteResponse),
        (status = 400, description = "Validation failure", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tags = ["quotes"],
    operation_id = "createQuote"
)]
#[post("/quotes")]
pub async fn create(
    state: web::Data<HttpState>,
    payload: web::Json<CreateQuoteRequest>,
) -> ApiResult<HttpResponse> {
    let payload = payload.into_inner();
    let created = state.quotes.create(payload.text, payload.author).await?;
    Ok(HttpResponse::Created().json(QuoteResponse::from(created)))
}

/// Fetch one random quote.
#[utoipa::path(
    get,
    path = "/api/quotes/random",
    responses(
        (status = 200, description = "A random quote", body = QuoteResponse),
        (status = 404, description = "No quotes exist", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tags = ["quotes"],
    operation_id = "getRandomQuote"
)]
#[get("/quotes/random")]
pub async fn random(state: web::Data<HttpState>, req: HttpRequest) -> ApiResult<HttpResponse> {
    let ip = client_identity::extract_ip(&req);
    let quote = state.quotes.get_random(&ip).await?;
    Ok(HttpResponse::Ok().json(QuoteResponse::from(quote)))
}

/// Top quote of the trailing seven days.
#[utoipa::path(
    get,
    path = "/api/quotes/top/weekly",
    responses(
        (status = 200, description = "Most liked quote of the week", body = QuoteResponse),
        (status = 404, description = "No quotes in the window", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tags = ["quotes"],
    operation_id = "getTopWeeklyQuote"
)]
#[get("/quotes/top/weekly")]
pub async fn top_weekly(state: web::Data<HttpState>, req: HttpRequest) -> ApiResult<HttpResponse> {
    let ip = client_identity::extract_ip(&req);
    let quote = state.quotes.top_weekly(&ip).await?;
    Ok(HttpResponse::Ok().json(QuoteResponse::from(quote)))
}

/// All-time top quote.
#[utoipa::path(
    get,
    path = "/api/quotes/top/alltime",
    responses(
        (status = 200, description = "Most liked quote of all time", body = QuoteResponse),
        (status = 404, description = "No quotes exist", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tags = ["quotes"],
    operation_id = "getTopAllTimeQuote"
)]
#[get("/quotes/top/alltime")]
pub async fn top_all_time(
    state: web::Data<HttpState>,
    req: HttpRequest,
) -> ApiResult<HttpResponse> {
    let ip = client_identity::extract_ip(&req);
    let quote = state.quotes.top_all_time(&ip).await?;
    Ok(HttpResponse::Ok().json(QuoteResponse::from(quote)))
}

/// Fetch a quote by id.
#[utoipa::path(
    get,
    path = "/api/quotes/{id}",
    params(("id" = String, Path, description = "Quote identifier")),
    responses(
        (status = 200, description = "The quote", body = QuoteResponse),
        (status = 404, description = "Unknown quote", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tags = ["quotes"],
    operation_id = "getQuoteById"
)]
#[get("/quotes/{id}")]
pub async fn get_by_id(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    req: HttpRequest,
) -> ApiResult<HttpResponse> {
    let id = parse_quote_id(&path.into_inner())?;
    let ip = client_identity::extract_ip(&req);
    let quote = state.quotes.get_by_id(id, &ip).await?;
    Ok(HttpResponse::Ok().json(QuoteResponse::from(quote)))
}

/// Update a quote's text and/or author.
#[utoipa::path(
    put,
    path = "/api/quotes/{id}",
    params(("id" = String, Path, description = "Quote identifier")),
    request_body = UpdateQuoteRequest,
    responses(
        (status = 200, description = "Updated quote", body = QuoteResponse),
        (status = 400, description = "Malformed payload", body = ErrorBody),
        (status = 404, description = "Unknown quote", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tags = ["quotes"],
    operation_id = "updateQuote"
)]
#[put("/quotes/{id}")]
pub async fn update(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<UpdateQuoteRequest>,
    req: HttpRequest,
) -> ApiResult<HttpResponse> {
    let id = parse_quote_id(&path.into_inner())?;
    let payload = payload.into_inner();
    let ip = client_identity::extract_ip(&req);
    let updated = state
        .quotes
        .update(id, payload.text, payload.author, &ip)
        .await?;
    Ok(HttpResponse::Ok().json(QuoteResponse::from(updated)))
}

/// Delete a quote, cascading removal of its likes.
#[utoipa::path(
    delete,
    path = "/api/quotes/{id}",
    params(("id" = String, Path, description = "Quote identifier")),
    responses(
        (status = 204, description = "Quote deleted"),
        (status = 404, description = "Unknown quote", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tags = ["quotes"],
    operation_id = "deleteQuote"
)]
#[delete("/quotes/{id}")]
pub async fn delete_quote(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_quote_id(&path.into_inner())?;
    state.quotes.delete(id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    fn unparseable_ids_read_as_missing_quotes() {
        let err = parse_quote_id("not-a-uuid").expect_err("invalid id");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[rstest]
    fn valid_ids_parse() {
        let id = Uuid::new_v4();
        assert_eq!(parse_quote_id(&id.to_string()).expect("valid"), id);
    }
}
