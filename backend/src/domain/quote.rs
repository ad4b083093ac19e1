//! Quote aggregate and the client identity attached to engagements.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::Error;

/// A short text item with an engagement counter.
///
/// `likes_count` is mutated only by the like engine (or a bulk reset) and
/// always equals the number of ledger rows referencing this quote at
/// quiescent points. `created_at` is immutable; `updated_at` is refreshed on
/// every mutation, like increments included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quote {
    /// Opaque unique identifier, generated at creation.
    pub id: Uuid,
    /// Quote body. Required, non-blank.
    pub text: String,
    /// Attribution. Required, non-blank.
    pub author: String,
    /// Deduplicated engagement counter, never negative.
    pub likes_count: i32,
    /// Set once at creation.
    pub created_at: DateTime<Utc>,
    /// Refreshed on any field mutation, including counter increments.
    pub updated_at: DateTime<Utc>,
}

impl Quote {
    /// Build a fresh quote from validated fields with a zero counter.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorCode::InvalidRequest`] when `text` or `author` is blank.
    pub fn new(text: impl Into<String>, author: impl Into<String>) -> Result<Self, Error> {
        let text = text.into();
        let author = author.into();
        if text.trim().is_empty() {
            return Err(Error::invalid_request("text must not be empty"));
        }
        if author.trim().is_empty() {
            return Err(Error::invalid_request("author must not be empty"));
        }
        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            text,
            author,
            likes_count: 0,
            created_at: now,
            updated_at: now,
        })
    }
}

/// Coarse client identity derived from the network origin of a request.
///
/// This is a spoofable dedup token, not an authenticated principal. The
/// domain treats both fields as opaque strings and never validates them
/// beyond non-emptiness of the address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIdentity {
    ip: String,
    user_agent: Option<String>,
}

impl ClientIdentity {
    /// Construct an identity from a non-empty address token.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorCode::InvalidRequest`] when the address is blank.
    pub fn new(ip: impl Into<String>, user_agent: Option<String>) -> Result<Self, Error> {
        let ip = ip.into();
        if ip.trim().is_empty() {
            return Err(Error::invalid_request("client address must not be empty"));
        }
        Ok(Self { ip, user_agent })
    }

    /// Shared identity for requests whose origin cannot be determined.
    ///
    /// Such callers all occupy one dedup slot, which is the conservative
    /// choice for an anti-abuse counter.
    pub fn unknown() -> Self {
        Self {
            ip: "unknown".to_owned(),
            user_agent: None,
        }
    }

    /// The dedup key: one like per (quote, ip) pair.
    pub fn ip(&self) -> &str {
        self.ip.as_str()
    }

    /// Declared agent string, non-authoritative metadata only.
    pub fn user_agent(&self) -> Option<&str> {
        self.user_agent.as_deref()
    }
}
