//! Server assembly: configuration and cross-origin policy.

use actix_cors::Cors;
use actix_web::http::header;

pub mod config;

pub use config::AppConfig;

/// Build the CORS policy for the configured origin.
///
/// A literal `*` allows any origin without credentials; any other value is
/// treated as the single allowed origin with credential support, matching
/// a browser frontend served from a fixed host.
pub fn cors(origin: &str) -> Cors {
    let cors = Cors::default()
        .allowed_methods(["GET", "POST", "PUT", "DELETE", "OPTIONS"])
        .allowed_headers([header::ORIGIN, header::CONTENT_TYPE, header::ACCEPT])
        .max_age(3600);

    if origin == "*" {
        cors.allow_any_origin()
    } else {
        cors.allowed_origin(origin).supports_credentials()
    }
}
