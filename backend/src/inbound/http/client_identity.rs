//! Client identity extraction from request network origin.
//!
//! The dedup token prefers the first entry of `X-Forwarded-For` so the
//! service sees the original client through reverse proxies, falling back
//! to the direct peer address. It is a coarse, spoofable token by design —
//! no validation or authentication happens here or anywhere downstream.

use actix_web::HttpRequest;
use actix_web::http::header;

use crate::domain::ClientIdentity;

/// Placeholder identity for requests with no discernible origin (e.g. unit
/// test requests without a peer address). Such callers share one dedup slot.
const UNKNOWN_CLIENT: &str = "unknown";

/// Longest identity token the ledger stores (`likes.user_ip VARCHAR(64)`).
/// Both headers are attacker-controlled, so oversized values are clamped to
/// the column limits instead of surfacing as storage errors.
const MAX_IP_LEN: usize = 64;
/// Longest agent string the ledger stores (`likes.user_agent VARCHAR(512)`).
const MAX_USER_AGENT_LEN: usize = 512;

/// Derive the calling client's identity from the request.
pub fn extract(req: &HttpRequest) -> ClientIdentity {
    let ip = forwarded_for_first(req)
        .or_else(|| peer_ip(req))
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_owned());
    let ip = clamp(ip, MAX_IP_LEN);
    let user_agent = req
        .headers()
        .get(header::USER_AGENT)
        .and_then(|value| value.to_str().ok())
        .map(|value| clamp(value.to_owned(), MAX_USER_AGENT_LEN));

    // `ip` is never blank here, but the fallback keeps this total.
    ClientIdentity::new(ip, user_agent).unwrap_or_else(|_| ClientIdentity::unknown())
}

/// Only the dedup key, for read paths that ignore the agent string.
pub fn extract_ip(req: &HttpRequest) -> String {
    extract(req).ip().to_owned()
}

fn forwarded_for_first(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_owned)
}

fn peer_ip(req: &HttpRequest) -> Option<String> {
    req.peer_addr().map(|addr| addr.ip().to_string())
}

fn clamp(mut value: String, max: usize) -> String {
    if value.len() > max {
        let mut end = max;
        while !value.is_char_boundary(end) {
            end -= 1;
        }
        value.truncate(end);
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;
    use rstest::rstest;

    #[rstest]
    fn forwarded_for_takes_the_first_entry() {
        let req = TestRequest::default()
            .insert_header(("X-Forwarded-For", "203.0.113.9, 10.0.0.1, 10.0.0.2"))
            .to_http_request();

        assert_eq!(extract(&req).ip(), "203.0.113.9");
    }

    #[rstest]
    fn forwarded_for_entries_are_trimmed() {
        let req = TestRequest::default()
            .insert_header(("X-Forwarded-For", "  198.51.100.7 , 10.0.0.1"))
            .to_http_request();

        assert_eq!(extract(&req).ip(), "198.51.100.7");
    }

    #[rstest]
    fn peer_address_is_the_fallback() {
        let req = TestRequest::default()
            .peer_addr("192.0.2.4:51234".parse().expect("socket addr"))
            .to_http_request();

        assert_eq!(extract(&req).ip(), "192.0.2.4");
    }

    #[rstest]
    fn blank_forwarded_for_falls_through_to_peer() {
        let req = TestRequest::default()
            .insert_header(("X-Forwarded-For", "   "))
            .peer_addr("192.0.2.4:51234".parse().expect("socket addr"))
            .to_http_request();

        assert_eq!(extract(&req).ip(), "192.0.2.4");
    }

    #[rstest]
    fn originless_requests_share_the_unknown_slot() {
        let req = TestRequest::default().to_http_request();
        assert_eq!(extract(&req).ip(), UNKNOWN_CLIENT);
    }

    #[rstest]
    fn oversized_forwarded_for_entries_are_clamped_to_the_column_limit() {
        let spoofed = "a".repeat(200);
        let req = TestRequest::default()
            .insert_header(("X-Forwarded-For", spoofed.as_str()))
            .to_http_request();

        let client = extract(&req);
        assert_eq!(client.ip().len(), MAX_IP_LEN);
        assert_eq!(client.ip(), &spoofed[..MAX_IP_LEN]);
    }

    #[rstest]
    fn oversized_user_agents_are_clamped_to_the_column_limit() {
        let agent = "x".repeat(600);
        let req = TestRequest::default()
            .insert_header(("User-Agent", agent.as_str()))
            .to_http_request();

        let client = extract(&req);
        assert_eq!(client.user_agent().map(str::len), Some(MAX_USER_AGENT_LEN));
    }

    #[rstest]
    fn clamp_respects_char_boundaries() {
        // 2-byte chars straddling the cut point must not split.
        let value = "é".repeat(40);
        let clamped = clamp(value, 63);
        assert_eq!(clamped.len(), 62);
        assert!(clamped.is_char_boundary(clamped.len()));
    }

    #[rstest]
    fn user_agent_is_captured_verbatim() {
        let req = TestRequest::default()
            .insert_header(("User-Agent", "quotes-admin/1.2"))
            .to_http_request();

        assert_eq!(extract(&req).user_agent(), Some("quotes-admin/1.2"));
    }
}
