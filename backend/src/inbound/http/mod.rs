//! HTTP handlers, DTOs, and route registration.
//!
//! Handlers translate requests into domain service calls and domain errors
//! into the `{"error": ...}` envelope, keeping actix details at the edge.

use actix_web::web;

pub mod client_identity;
pub mod error;
pub mod health;
pub mod likes;
pub mod quotes;
pub mod state;

pub use error::{ApiError, ApiResult, ErrorBody};
pub use state::HttpState;

/// Register all routes.
///
/// Literal segments are registered before parameterised ones so
/// `/quotes/random` and `/quotes/likes/reset` never fall into the
/// `/quotes/{id}` handlers.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .service(quotes::random)
            .service(quotes::top_weekly)
            .service(quotes::top_all_time)
            .service(likes::reset)
            .service(quotes::list)
            .service(quotes::create)
            .service(likes::like)
            .service(likes::is_liked)
            .service(quotes::get_by_id)
            .service(quotes::update)
            .service(quotes::delete_quote),
    );
    cfg.service(health::health);
}
